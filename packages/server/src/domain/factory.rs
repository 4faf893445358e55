//! Domain factories for generating identifiers and identities.

use uuid::Uuid;

use super::{
    entity::UserIdentity,
    value_object::{ConnectionId, DisplayName, HouseId, UserId},
};

/// Factory for generating HouseId instances.
pub struct HouseIdFactory;

impl HouseIdFactory {
    /// Generate a new HouseId backed by a random UUID v4.
    pub fn generate() -> HouseId {
        HouseId::from_uuid(Uuid::new_v4())
    }
}

/// Factory for generating ConnectionId instances.
pub struct ConnectionIdFactory;

impl ConnectionIdFactory {
    /// Generate a new ConnectionId backed by a random UUID v4.
    pub fn generate() -> ConnectionId {
        ConnectionId::from_uuid(Uuid::new_v4())
    }
}

/// Factory for identities.
pub struct IdentityFactory;

impl IdentityFactory {
    /// Synthesize an ephemeral identity for a name-only connection.
    ///
    /// The user id is freshly generated and scoped to this connection.
    pub fn ephemeral(name: DisplayName) -> UserIdentity {
        UserIdentity::new(UserId::from_uuid(Uuid::new_v4()), name)
    }
}
