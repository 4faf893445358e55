//! HTTP API request/response DTOs.

use serde::{Deserialize, Serialize};

use hearth_shared::time::timestamp_to_rfc3339;

use crate::domain::HouseSnapshot;

use super::websocket::IdentityDto;

/// House summary for the list and create endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HouseSummaryDto {
    pub id: String,
    pub name: String,
    pub private: bool,
    pub members: Vec<IdentityDto>,
    pub message_count: usize,
    pub created_at: String, // ISO 8601
}

impl From<&HouseSnapshot> for HouseSummaryDto {
    fn from(snapshot: &HouseSnapshot) -> Self {
        Self {
            id: snapshot.id.as_str().to_string(),
            name: snapshot.name.as_str().to_string(),
            private: snapshot.private,
            members: snapshot.members.iter().map(IdentityDto::from).collect(),
            message_count: snapshot.messages.len(),
            created_at: timestamp_to_rfc3339(snapshot.created_at.value()),
        }
    }
}

/// Request body for the house create endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateHouseRequest {
    pub name: String,
    #[serde(default)]
    pub private: bool,
}
