//! Shared application state.

use std::sync::Arc;

use serde::Deserialize;

use crate::{
    config::ServerConfig,
    domain::HouseRegistry,
    infrastructure::{IdentityResolver, InMemoryHouseRegistry},
};

/// Query parameters of the WebSocket connect request.
///
/// Exactly one of the two credentials is expected; when both are present
/// the bearer token wins.
#[derive(Debug, Deserialize)]
pub struct ConnectQuery {
    pub bearer: Option<String>,
    pub name: Option<String>,
}

/// Shared application state, one per server process.
pub struct AppState {
    pub registry: Arc<dyn HouseRegistry>,
    pub resolver: IdentityResolver,
    pub config: ServerConfig,
}

impl AppState {
    pub fn new(config: ServerConfig) -> Self {
        let registry = Arc::new(InMemoryHouseRegistry::new(config.message_capacity));
        let resolver = IdentityResolver::new(config.jwt_secret.as_deref());
        Self {
            registry,
            resolver,
            config,
        }
    }
}
