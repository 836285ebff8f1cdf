//! HTTP error type.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use realtor_shared::ErrorResponse;

use crate::use_cases::ManagementError;

/// Errors a handler can return. Each variant maps to one status code and a
/// JSON `ErrorResponse` body.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Resource not found")]
    NotFound,
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Rate limit exceeded")]
    RateLimited,
    /// The message is logged, never sent to the client.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::MissingFields(_) | ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            ApiError::NotFound => ErrorResponse::not_found(),
            ApiError::MissingFields(fields) => ErrorResponse::missing_fields(fields),
            ApiError::BadRequest(reason) => {
                tracing::debug!(%reason, "Rejected malformed request");
                ErrorResponse::bad_request()
            }
            ApiError::RateLimited => ErrorResponse::rate_limited(),
            ApiError::Internal(cause) => {
                tracing::error!(error = %cause, "Request failed");
                ErrorResponse::internal()
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ManagementError> for ApiError {
    fn from(e: ManagementError) -> Self {
        match e {
            ManagementError::NotFound => ApiError::NotFound,
            ManagementError::MissingFields(fields) => ApiError::MissingFields(fields),
            ManagementError::InvalidInput(msg) => ApiError::BadRequest(msg),
            ManagementError::Repo(e) => ApiError::Internal(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::RepoError;

    async fn body_json(error: ApiError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn internal_error_hides_cause() {
        let error: ApiError =
            ManagementError::Repo(RepoError::database("insert_property", "disk full")).into();
        let (status, body) = body_json(error).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, serde_json::json!({"error": "Internal server error"}));
    }

    #[tokio::test]
    async fn missing_fields_lists_names() {
        let (status, body) = body_json(ApiError::MissingFields(vec!["title".into()])).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            serde_json::json!({"error": "Missing required fields", "missing_fields": ["title"]})
        );
    }

    #[tokio::test]
    async fn invalid_input_is_bad_request() {
        let error: ApiError = ManagementError::InvalidInput("price: invalid type".into()).into();
        let (status, body) = body_json(error).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, serde_json::json!({"error": "Bad request"}));
    }

    #[test]
    fn statuses() {
        assert_eq!(ApiError::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::RateLimited.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
