use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use super::client_of;
use crate::api::error::ApiError;
use crate::infrastructure::rate_limit::{RateDecision, RateLimiter};

/// Reject clients that are over any configured limit with `429`.
pub async fn rate_limit(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let client = client_of(&request);

    match limiter.check(&client).await {
        RateDecision::Allowed => next.run(request).await,
        RateDecision::Limited(limit) => {
            tracing::warn!(client = %client, limit = %limit, "Rate limit exceeded");
            ApiError::RateLimited.into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::rate_limit::{InMemoryRateLimitStore, RateLimit};
    use axum::{
        body::Body,
        http::{Request as HttpRequest, StatusCode},
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use axum::extract::ConnectInfo;
    use chrono::{TimeZone, Utc};
    use std::net::SocketAddr;
    use tower::ServiceExt;

    fn app(limits: &str) -> Router {
        let now = Utc.with_ymd_and_hms(2025, 6, 15, 10, 30, 0).unwrap();
        let limiter = Arc::new(RateLimiter::new(
            Arc::new(InMemoryRateLimitStore::new()),
            RateLimit::parse_list(limits).unwrap(),
            Arc::new(FixedClock(now)),
        ));
        Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(from_fn_with_state(limiter, rate_limit))
    }

    fn from(peer: [u8; 4], forwarded: &str) -> Request {
        let mut request = HttpRequest::builder()
            .uri("/")
            .header("x-forwarded-for", forwarded)
            .body(Body::empty())
            .unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((peer, 5000))));
        request
    }

    #[tokio::test]
    async fn over_limit_is_too_many_requests() {
        let app = app("1 per minute");

        let first = app
            .clone()
            .oneshot(from([10, 0, 0, 1], "203.0.113.1"))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        // A different forwarded address does not make a new client
        let second = app
            .clone()
            .oneshot(from([10, 0, 0, 1], "203.0.113.2"))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::TOO_MANY_REQUESTS);
        let body = axum::body::to_bytes(second.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&body[..], br#"{"error":"Rate limit exceeded"}"#);

        let other = app
            .oneshot(from([10, 0, 0, 2], "203.0.113.1"))
            .await
            .unwrap();
        assert_eq!(other.status(), StatusCode::OK);
    }
}
