//! Registry implementations.
//!
//! The usecase layer depends on the `HouseRegistry` trait from the domain
//! layer; this module provides the concrete implementation (dependency
//! inversion).

pub mod inmemory;

pub use inmemory::InMemoryHouseRegistry;
