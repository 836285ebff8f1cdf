use axum::extract::Request;
use axum::http::{header, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

/// Permanently redirect requests that did not arrive over TLS.
///
/// TLS terminates at the proxy, so the scheme is read from
/// `X-Forwarded-Proto`.
pub async fn redirect_to_https(request: Request, next: Next) -> Response {
    let secure = request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"));
    if secure {
        return next.run(request).await;
    }

    let host = request
        .headers()
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .or_else(|| request.uri().authority().map(|a| a.to_string()));

    let Some(host) = host else {
        tracing::warn!(path = %request.uri().path(), "Cannot redirect request without a host");
        return next.run(request).await;
    };

    let path = request
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let location = format!("https://{host}{path}");

    (StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, location)]).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request as HttpRequest, middleware::from_fn, routing::get, Router};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/api/properties", get(|| async { "ok" }))
            .layer(from_fn(redirect_to_https))
    }

    #[tokio::test]
    async fn plain_http_is_redirected_with_query() {
        let request = HttpRequest::builder()
            .uri("/api/properties?page=2")
            .header(header::HOST, "listings.example.com")
            .header("x-forwarded-proto", "http")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
        assert_eq!(
            response.headers()[header::LOCATION],
            "https://listings.example.com/api/properties?page=2"
        );
    }

    #[tokio::test]
    async fn forwarded_https_passes_through() {
        let request = HttpRequest::builder()
            .uri("/api/properties")
            .header(header::HOST, "listings.example.com")
            .header("x-forwarded-proto", "https")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
