//! Request types for the listings API

use serde::{Deserialize, Serialize};

/// Query string of `GET /api/properties`.
///
/// Values stay as raw strings so that garbage like `?page=abc` falls back to
/// the default instead of failing the request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListPropertiesQuery {
    #[serde(default)]
    pub page: Option<String>,
    #[serde(default)]
    pub per_page: Option<String>,
}

impl ListPropertiesQuery {
    /// Build from decoded query pairs.
    ///
    /// A repeated key keeps its first value; unknown keys are ignored.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut query = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "page" if query.page.is_none() => query.page = Some(value),
                "per_page" if query.per_page.is_none() => query.per_page = Some(value),
                _ => {}
            }
        }
        query
    }
}
