//! Shared utilities for the Hearth chat relay.
//!
//! Logging setup and time helpers used by both the server and the client.

pub mod logger;
pub mod time;

pub use logger::setup_logger;
pub use time::{timestamp_to_rfc3339, unix_timestamp_millis};
