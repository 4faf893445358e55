//! Hearth relay server library.
//!
//! Layered: `domain` holds the house/membership model, `usecase` the
//! relay operations, `infrastructure` the in-memory registry, identity
//! resolution and wire DTOs, and `ui` the axum endpoints and runner.

pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod ui;
pub mod usecase;
