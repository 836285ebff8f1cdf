//! Domain entities

mod property;

pub use property::{NewProperty, Property, PropertyUpdate};
