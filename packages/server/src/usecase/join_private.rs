//! UseCase: join an existing private house by id.

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, HouseId, HouseRegistry, UserIdentity},
    infrastructure::dto::websocket::{HouseDto, ServerEvent},
};

use super::error::ActionError;

/// Join-by-id: never creates a house, and never fans out `user-join`
/// (private membership changes stay quiet).
pub struct JoinPrivateHouseUseCase {
    registry: Arc<dyn HouseRegistry>,
}

impl JoinPrivateHouseUseCase {
    pub fn new(registry: Arc<dyn HouseRegistry>) -> Self {
        Self { registry }
    }

    /// Execute the join. An unknown id surfaces as `room-not-found` to the
    /// sender only; the connection stays open.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        identity: &UserIdentity,
        raw_id: String,
    ) -> Result<ServerEvent, ActionError> {
        let house_id = HouseId::new(raw_id)?;

        let outcome = self.registry.join_private(connection_id, house_id).await?;

        tracing::info!(
            "'{}' joined private house '{}'",
            identity.name,
            outcome.house.id
        );

        Ok(ServerEvent::HouseJoined {
            house: HouseDto::from(&outcome.house),
        })
    }
}
