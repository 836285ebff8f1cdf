use std::fmt;

use serde::{Deserialize, Serialize};

/// Store-assigned identifier of a property listing.
///
/// Values come from the store's autoincrement counter, so they are monotonic
/// and never handed out twice, even after the row they named is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyId(i64);

impl PropertyId {
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for PropertyId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl From<PropertyId> for i64 {
    fn from(value: PropertyId) -> Self {
        value.0
    }
}
