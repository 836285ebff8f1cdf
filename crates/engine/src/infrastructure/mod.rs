//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies, plus the
//! process-level setup (configuration, logging) done once in `main`.

pub mod clock;
pub mod config;
pub mod logging;
pub mod ports;
pub mod rate_limit;
pub mod sqlite;
