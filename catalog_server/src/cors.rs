//! CORS policy for the JSON API.
//!
//! Any origin may call the API. The request origin is echoed back instead of
//! `*` so browsers also accept credentialed (admin cookie) requests.

use std::time::Duration;

use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use tower_http::cors::{AllowOrigin, CorsLayer};

/// How long browsers may cache a preflight response.
pub const PREFLIGHT_MAX_AGE: Duration = Duration::from_secs(86_400);

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .allow_credentials(true)
        .max_age(PREFLIGHT_MAX_AGE)
}
