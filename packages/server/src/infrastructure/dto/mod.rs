//! Data transfer objects for the wire protocol and the HTTP surface.

pub mod http;
pub mod websocket;
