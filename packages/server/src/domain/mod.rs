//! Domain layer for the chat relay.
//!
//! Business rules for houses, membership and messages, independent of
//! transport framing and infrastructure concerns.

pub mod entity;
pub mod error;
pub mod factory;
pub mod registry;
pub mod value_object;

pub use entity::{ChatMessage, House, HouseSnapshot, Member, UserIdentity};
pub use error::{RelayError, ValueObjectError};
pub use factory::{ConnectionIdFactory, HouseIdFactory, IdentityFactory};
pub use registry::{HouseRegistry, JoinOutcome};
pub use value_object::{
    ConnectionId, DisplayName, HouseId, HouseName, MessageContent, Timestamp, UserId,
};
