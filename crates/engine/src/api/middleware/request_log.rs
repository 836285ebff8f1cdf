use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use super::client_of;

/// One info line per inbound request.
pub async fn log_request(request: Request, next: Next) -> Response {
    tracing::info!(
        "Request: {} {} from {}",
        request.method(),
        request.uri().path(),
        client_of(&request)
    );
    next.run(request).await
}
