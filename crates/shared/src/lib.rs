//! Realtor Shared - wire types for the listings HTTP API
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and the domain crate
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Stable field names** - these shapes are what browser clients parse

pub mod requests;
pub mod responses;

pub use requests::ListPropertiesQuery;
pub use responses::{ErrorResponse, HealthResponse, PropertyPageResponse};
