//! UseCase layer error definitions.

use thiserror::Error;

use crate::{
    domain::{RelayError, ValueObjectError},
    infrastructure::dto::websocket::{ErrorCode, ServerEvent},
};

/// Failure of a dispatched action.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// A payload field failed validation
    #[error(transparent)]
    InvalidField(#[from] ValueObjectError),

    /// The registry rejected the operation
    #[error(transparent)]
    Relay(#[from] RelayError),
}

impl ActionError {
    /// The `error` event to surface to the sender, if this failure is
    /// user-visible. `None` means drop-and-log (invalid payload fields
    /// are treated like malformed envelopes).
    pub fn to_event(&self) -> Option<ServerEvent> {
        let (code, message) = match self {
            // An id that is not even a UUID cannot name any house.
            ActionError::InvalidField(ValueObjectError::HouseIdInvalidFormat(id)) => (
                ErrorCode::RoomNotFound,
                format!("house not found: {id}"),
            ),
            ActionError::Relay(RelayError::HouseNotFound(id)) => {
                (ErrorCode::RoomNotFound, format!("house not found: {id}"))
            }
            ActionError::Relay(RelayError::NotAMember(id)) => (
                ErrorCode::NotAMember,
                format!("not a member of house {id}"),
            ),
            _ => return None,
        };
        Some(ServerEvent::Error { code, message })
    }
}
