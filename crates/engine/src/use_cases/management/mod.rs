//! Management use cases for CRUD-style operations.
//!
//! These use cases keep HTTP handlers thin: handlers parse the request, call
//! in here, and map the outcome to a status code.

mod property;

pub use property::PropertyCrud;

use realtor_domain::DomainError;

use crate::infrastructure::ports::RepoError;

/// Shared error type for management use cases.
#[derive(Debug, thiserror::Error)]
pub enum ManagementError {
    #[error("Not found")]
    NotFound,
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl From<DomainError> for ManagementError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::MissingFields(fields) => Self::MissingFields(fields),
            DomainError::Validation(msg) => Self::InvalidInput(msg),
        }
    }
}

/// Container for management use cases.
pub struct ManagementUseCases {
    pub property: PropertyCrud,
}

impl ManagementUseCases {
    pub fn new(property: PropertyCrud) -> Self {
        Self { property }
    }
}
