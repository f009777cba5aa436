//! HTTP surface: the `/api` JSON routes, uploaded files, and health.

pub mod admins;
pub mod auth;
pub mod catalog;
pub mod categories;
pub mod products;
pub mod queries;
pub mod stats;
pub mod uploads;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::http::header::CACHE_CONTROL;
use axum::http::HeaderValue;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::config::ServerConfig;
use crate::store::DynStore;

/// Room for multipart boundaries and headers on top of the file itself.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared state for route handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: DynStore,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: DynStore, config: Arc<ServerConfig>) -> Self {
        Self { store, config }
    }
}

/// `Cache-Control: no-store` unless the handler chose its own policy.
fn no_store_layer() -> SetResponseHeaderLayer<HeaderValue> {
    SetResponseHeaderLayer::if_not_present(CACHE_CONTROL, HeaderValue::from_static("no-store"))
}

/// The `/api` router (nested under `/api` by [`build_router`]).
pub fn api_router(state: AppState) -> Router {
    let upload_limit = state.config.upload_max_bytes + MULTIPART_OVERHEAD;

    Router::new()
        // Catalog
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{slug}",
            get(products::get_one)
                .put(products::update)
                .delete(products::remove),
        )
        .route("/categories", get(categories::list))
        .route("/catalog", get(catalog::browse))
        // Lead capture
        .route("/contact", post(queries::submit_contact))
        .route("/download-request", post(queries::request_download))
        .route("/queries", get(queries::list))
        .route("/queries/export", get(queries::export))
        .route("/queries/{id}/status", put(queries::update_status))
        .route("/queries/{id}", delete(queries::remove))
        // Uploads
        .route(
            "/upload",
            post(uploads::upload).layer(DefaultBodyLimit::max(upload_limit)),
        )
        // Auth & admins
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/session", get(auth::session))
        .route("/admins", get(admins::list).post(admins::create))
        .route("/admins/{email}", delete(admins::remove))
        .route("/admin/stats", get(stats::stats))
        .layer(no_store_layer())
        .layer(crate::cors::cors_layer())
        .with_state(state)
}

/// Full application router with middleware.
pub fn build_router(state: AppState) -> Router {
    let upload_dir = state.config.upload_dir.clone();
    let request_timeout = state.config.request_timeout;

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/api", api_router(state))
        .nest_service("/uploads", ServeDir::new(upload_dir))
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

async fn healthz() -> &'static str {
    "ok"
}
