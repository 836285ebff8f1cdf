//! Request middleware.
//!
//! All of these are plain `axum::middleware::from_fn` functions; `api::router`
//! decides which ones run and in what order.

mod https;
mod rate_limit;
mod request_log;

pub use https::redirect_to_https;
pub use rate_limit::rate_limit;
pub use request_log::log_request;

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::{ConnectInfo, Request, State};
use axum::middleware::Next;
use axum::response::Response;

/// Client address resolved once per request by [`resolve_client`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientAddr(pub String);

/// Client address for `request`.
///
/// The peer socket address, unless that peer is one of `trusted_proxies`,
/// in which case the first `X-Forwarded-For` hop it reports is used.
/// `"unknown"` when the connection info is missing.
pub fn client_addr(request: &Request, trusted_proxies: &[IpAddr]) -> String {
    let Some(peer) = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
    else {
        return "unknown".to_string();
    };

    if !trusted_proxies.contains(&peer) {
        return peer.to_string();
    }

    request
        .headers()
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| peer.to_string())
}

/// Attach a [`ClientAddr`] for the middleware further in.
pub async fn resolve_client(
    State(trusted_proxies): State<Arc<Vec<IpAddr>>>,
    mut request: Request,
    next: Next,
) -> Response {
    let client = ClientAddr(client_addr(&request, &trusted_proxies));
    request.extensions_mut().insert(client);
    next.run(request).await
}

/// The resolved client of `request`, or the bare peer address when
/// [`resolve_client`] did not run.
fn client_of(request: &Request) -> String {
    request
        .extensions()
        .get::<ClientAddr>()
        .map(|ClientAddr(addr)| addr.clone())
        .unwrap_or_else(|| client_addr(request, &[]))
}
