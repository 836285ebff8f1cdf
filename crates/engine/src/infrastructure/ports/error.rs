//! Error types for port operations.

/// Repository operation errors with context for debugging.
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    /// Database operation failed - includes operation name for tracing.
    #[error("Database error in {operation}: {message}")]
    Database {
        operation: &'static str,
        message: String,
    },

    /// A stored row could not be decoded into a domain record.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl RepoError {
    /// Create a Database error with operation context.
    pub fn database(operation: &'static str, message: impl ToString) -> Self {
        Self::Database {
            operation,
            message: message.to_string(),
        }
    }

    /// Create a Serialization error.
    pub fn serialization(message: impl ToString) -> Self {
        Self::Serialization(message.to_string())
    }
}

/// Errors from the rate limit counter store.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RateLimitError {
    #[error("Counter store unavailable: {0}")]
    Unavailable(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_error_names_operation() {
        let err = RepoError::database("insert_property", "disk I/O error");
        assert_eq!(
            err.to_string(),
            "Database error in insert_property: disk I/O error"
        );
    }

    #[test]
    fn serialization_error_keeps_message() {
        let err = RepoError::serialization("bad timestamp");
        assert_eq!(err.to_string(), "Serialization error: bad timestamp");
    }
}
