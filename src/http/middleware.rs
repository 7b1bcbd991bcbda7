//! Request throttling middleware.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::{ConnectInfo, Request, State};
use axum::http::{header, HeaderName, HeaderValue, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tracing::warn;

use crate::ratelimit::{Decision, RateLimiter};

/// Sentinel key used when no client address can be derived. All such clients
/// share one bucket.
const UNKNOWN_CLIENT: &str = "unknown";

/// Response header carrying the configured per-window limit.
const HEADER_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
/// Response header carrying the remaining quota in the current window.
const HEADER_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Admission-control middleware for the public routes.
///
/// Derives a client key from the request, asks the rate limiter for a
/// decision, and either rejects with 429 or forwards the request downstream
/// unchanged. Admitted requests to protected paths get `X-RateLimit-Limit`
/// and `X-RateLimit-Remaining` response headers; everything else passes
/// through untouched.
pub async fn throttle(
    State(limiter): State<Arc<RateLimiter>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let key = client_key(&request);

    match limiter.decide(&path, &key, Instant::now()) {
        Decision::Skip => next.run(request).await,
        Decision::Deny => {
            warn!(client = %key, path = %path, "Rejecting request over rate limit");
            rate_limited_response()
        }
        Decision::Allow { limit, remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(HEADER_LIMIT, HeaderValue::from(limit));
            headers.insert(HEADER_REMAINING, HeaderValue::from(remaining));
            response
        }
    }
}

/// Derive the client key: the first `X-Forwarded-For` entry when present,
/// otherwise the peer address, otherwise the shared sentinel bucket.
///
/// The forwarded header is only meaningful behind a trusted proxy that
/// overwrites it; a directly reachable deployment lets clients mint fresh
/// buckets by rotating the value, so there the peer address is the one to
/// trust.
fn client_key(request: &Request) -> String {
    let forwarded = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    if let Some(addr) = forwarded {
        return addr.to_owned();
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| UNKNOWN_CLIENT.to_owned())
}

/// The fixed 429 response for over-limit requests.
fn rate_limited_response() -> Response {
    (
        StatusCode::TOO_MANY_REQUESTS,
        [(header::CONTENT_TYPE, "text/plain")],
        "Rate limit exceeded",
    )
        .into_response()
}
