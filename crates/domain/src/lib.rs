//! Realtor Domain - the property listing record and the rules around it.
//!
//! - `entities/` - `Property`, its creation draft, and its partial update
//! - `validation` - required-field presence checks on raw JSON payloads
//! - `pagination` - page arithmetic for list responses
//!
//! Nothing in this crate performs I/O.

pub mod entities;
pub mod error;
pub mod ids;
pub mod pagination;
pub mod validation;

pub use entities::{NewProperty, Property, PropertyUpdate};
pub use error::DomainError;
pub use ids::PropertyId;
pub use pagination::{Page, PageRequest, DEFAULT_PER_PAGE};
pub use validation::REQUIRED_FIELDS;
