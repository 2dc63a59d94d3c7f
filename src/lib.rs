//! # Garage: Capability Registry for Cars
//!
//! Garage is a small capability-dispatch system: an abstract car contract
//! ([`car::car::Car`]), a fixed set of concrete implementations, and a
//! registry that discovers them from configuration at startup and resolves
//! them by strongly-typed identity keys.
//!
//! ## Architecture
//!
//! - Capability contract and implementations ([`car`])
//! - Identity-keyed discovery and lookup ([`car::registry`])
//! - Event-based observability ([`event_bus`])
//! - Lifecycle facade ([`system`])
//!
//! ## Startup Pipeline
//!
//! ```text
//! SystemConfig → System::new → initialize → resolve → drive
//! ```
//!
//! The registry is populated exactly once during [`system::System::initialize`];
//! afterwards lookups are read-only and every resolve of the same key returns
//! the same shared instance.

pub mod car;
pub mod config;
pub mod error;
pub mod event_bus;
pub mod system;
pub mod timestamp;

// Re-exports
pub use error::*;

pub use error::Error as GarageError;
