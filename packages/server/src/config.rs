//! Server configuration.

use crate::domain::entity::DEFAULT_MESSAGE_CAPACITY;

/// Outbound frames queued per connection before the relay starts
/// dropping frames for that connection.
pub const DEFAULT_OUTBOUND_CAPACITY: usize = 256;

/// Malformed frames tolerated on a connection before it is closed.
pub const DEFAULT_MALFORMED_LIMIT: u32 = 10;

/// Runtime configuration, assembled from CLI flags by the binary.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-connection outbound queue capacity
    pub outbound_capacity: usize,
    /// Buffered messages kept per house
    pub message_capacity: usize,
    /// Malformed frames tolerated before the connection is closed
    pub malformed_limit: u32,
    /// HS256 secret for bearer tokens. Without it, bearer connects are
    /// refused and only name-based identities work.
    pub jwt_secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            outbound_capacity: DEFAULT_OUTBOUND_CAPACITY,
            message_capacity: DEFAULT_MESSAGE_CAPACITY,
            malformed_limit: DEFAULT_MALFORMED_LIMIT,
            jwt_secret: None,
        }
    }
}

impl ServerConfig {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
