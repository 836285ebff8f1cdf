//! Unified error types for the domain layer

use thiserror::Error;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Required fields were absent or empty. Carries the offending field names.
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),

    /// Payload was present but could not be interpreted (wrong shape or type)
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl DomainError {
    /// Creates a validation error for malformed payloads.
    ///
    /// Use this when the input has the required keys but cannot be turned into
    /// a domain value, e.g. `price` is a string or the body is not an object.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a missing-fields error from any list of field names
    pub fn missing_fields<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MissingFields(fields.into_iter().map(Into::into).collect())
    }
}
