//! Application Layer - Use cases and port definitions.
//!
//! This layer contains the application services and port interfaces
//! that define how the domain interacts with external systems.

/// Port interfaces for external systems (upstream quote source, cache).
pub mod ports;

/// Application services for quote lookup.
pub mod services;
