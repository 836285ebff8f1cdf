//! Use cases - request orchestration.
//!
//! Use cases sit between the HTTP handlers and the store ports. They own
//! validation order and turn storage outcomes into `ManagementError`s.

pub mod management;

pub use management::{ManagementError, ManagementUseCases, PropertyCrud};
