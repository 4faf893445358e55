//! Infrastructure layer: concrete registry, identity resolution, fanout
//! and wire DTOs.

pub mod auth;
pub mod broadcast;
pub mod dto;
pub mod registry;

pub use auth::{AuthError, IdentityResolver};
pub use registry::InMemoryHouseRegistry;
