//! UseCase: leave a house by id.

use std::sync::Arc;

use crate::{
    domain::{ConnectionId, HouseId, HouseRegistry, UserIdentity},
    infrastructure::dto::websocket::{IdentityDto, ServerEvent},
};

use super::error::ActionError;

/// Leave: detaches the connection and notifies the remaining members.
pub struct LeaveHouseUseCase {
    registry: Arc<dyn HouseRegistry>,
}

impl LeaveHouseUseCase {
    pub fn new(registry: Arc<dyn HouseRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        identity: &UserIdentity,
        raw_id: String,
    ) -> Result<(), ActionError> {
        let house_id = HouseId::new(raw_id)?;

        let user_left = ServerEvent::UserLeft {
            sender: IdentityDto::from(identity),
        };
        self.registry
            .leave(connection_id, house_id.clone(), user_left.to_frame())
            .await?;

        tracing::info!("'{}' left house '{}'", identity.name, house_id);
        Ok(())
    }
}
