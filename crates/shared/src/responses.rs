//! Response bodies for the listings API
//!
//! Error bodies always carry an `error` key; `missing_fields` is only present
//! on validation failures.

use serde::{Deserialize, Serialize};

use realtor_domain::{Page, Property};

// =============================================================================
// Listing Pages
// =============================================================================

/// Body of `GET /api/properties`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyPageResponse {
    pub properties: Vec<Property>,
    pub total: u64,
    pub current_page: u64,
    pub total_pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl From<Page<Property>> for PropertyPageResponse {
    fn from(page: Page<Property>) -> Self {
        Self {
            properties: page.items,
            total: page.total,
            current_page: page.current_page,
            total_pages: page.total_pages,
            has_next: page.has_next,
            has_prev: page.has_prev,
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

pub const NOT_FOUND: &str = "Resource not found";
pub const MISSING_FIELDS: &str = "Missing required fields";
pub const BAD_REQUEST: &str = "Bad request";
pub const RATE_LIMITED: &str = "Rate limit exceeded";
pub const INTERNAL: &str = "Internal server error";

/// Structured error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<String>>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            missing_fields: None,
        }
    }

    pub fn not_found() -> Self {
        Self::new(NOT_FOUND)
    }

    pub fn missing_fields(fields: Vec<String>) -> Self {
        Self {
            error: MISSING_FIELDS.to_string(),
            missing_fields: Some(fields),
        }
    }

    pub fn bad_request() -> Self {
        Self::new(BAD_REQUEST)
    }

    pub fn rate_limited() -> Self {
        Self::new(RATE_LIMITED)
    }

    pub fn internal() -> Self {
        Self::new(INTERNAL)
    }
}

// =============================================================================
// Health
// =============================================================================

/// Body of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy(version: impl Into<String>) -> Self {
        Self {
            status: "healthy".to_string(),
            version: version.into(),
        }
    }
}
