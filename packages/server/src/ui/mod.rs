//! UI layer: HTTP/WebSocket endpoints and the server runner.

mod handler;
mod runner;
mod signal;
pub mod state;

pub use runner::{router, run};
