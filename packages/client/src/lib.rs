//! Hearth relay client library.
//!
//! A thin connection wrapper over `tokio-tungstenite` plus the
//! exponential-backoff reconnection policy. The REPL binary drives both.

pub mod connection;
pub mod reconnect;

pub use connection::{ClientConnection, ClientError, Credential};
pub use reconnect::ReconnectPolicy;
