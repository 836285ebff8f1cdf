//! Repository port traits for database access.

use async_trait::async_trait;
use realtor_domain::{NewProperty, Property, PropertyId, PropertyUpdate};

use super::error::RepoError;

/// One slice of the property table plus the size of the whole table.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySlice {
    pub items: Vec<Property>,
    pub total: u64,
}

// =============================================================================
// Property Storage
// =============================================================================

/// Durable storage of property listings.
///
/// Absence is a normal outcome: lookups and mutations report a missing id as
/// `Ok(None)` / `Ok(false)`, never as an error. Every mutation is committed
/// before the call returns.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PropertyRepo: Send + Sync {
    /// Persist a new listing, assigning its id and both timestamps.
    async fn insert(&self, draft: NewProperty) -> Result<Property, RepoError>;

    async fn get(&self, id: PropertyId) -> Result<Option<Property>, RepoError>;

    /// Records in insertion order. `limit = 0` yields an empty slice.
    async fn list(&self, offset: u64, limit: u64) -> Result<PropertySlice, RepoError>;

    /// Overwrite the fields carried by `update` and refresh `updated_at`.
    async fn update(
        &self,
        id: PropertyId,
        update: PropertyUpdate,
    ) -> Result<Option<Property>, RepoError>;

    /// Hard delete. Returns `false` if no record had this id.
    async fn delete(&self, id: PropertyId) -> Result<bool, RepoError>;
}
