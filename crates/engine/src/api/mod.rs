//! API layer - HTTP entry points and the middleware stack around them.

pub mod error;
pub mod extract;
pub mod http;
pub mod middleware;


use std::sync::Arc;

use axum::http::header;
use axum::http::{HeaderValue, Method};
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::app::App;
use crate::infrastructure::clock::SystemClock;
use crate::infrastructure::config::{AppConfig, CorsConfig};
use crate::infrastructure::rate_limit::{InMemoryRateLimitStore, RateLimiter};

pub use error::ApiError;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
    img-src * data: blob:; \
    connect-src 'self' https://*; \
    script-src 'self' 'unsafe-inline'; \
    style-src 'self' 'unsafe-inline'";

const STRICT_TRANSPORT_SECURITY: &str = "max-age=31536000; includeSubDomains";

/// Build the complete application router.
///
/// Outermost first: tracing, client resolution, request log, HTTPS redirect
/// (production only), CORS, security headers, rate limit, routes.
pub fn router(app: Arc<App>, config: &AppConfig) -> Router {
    let mut router = http::routes().with_state(app);

    if config.rate_limit.enabled {
        let limiter = Arc::new(RateLimiter::new(
            Arc::new(InMemoryRateLimitStore::new()),
            config.rate_limit.limits.clone(),
            Arc::new(SystemClock::new()),
        ));
        router = router.layer(from_fn_with_state(limiter, middleware::rate_limit));
    }

    router = router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(STRICT_TRANSPORT_SECURITY),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CONTENT_SECURITY_POLICY,
            HeaderValue::from_static(CONTENT_SECURITY_POLICY),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(cors_layer(&config.cors));

    if config.security.redirects_to_https() {
        router = router.layer(from_fn(middleware::redirect_to_https));
    }

    let trusted_proxies = Arc::new(config.server.trusted_proxies.clone());
    router
        .layer(from_fn(middleware::log_request))
        .layer(from_fn_with_state(trusted_proxies, middleware::resolve_client))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    if config.allowed_origins.iter().any(|origin| origin == "*") {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    cors.allow_origin(AllowOrigin::list(origins))
}
