//! Lead capture (`/api/contact`, `/api/download-request`) and the admin
//! query inbox (`/api/queries`).

use axum::extract::State;
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use super::AppState;
use crate::auth::AdminSession;
use crate::errors::Result;
use crate::extract::{Json, Path, Query};
use crate::models::contact_query::ContactQuery;
use crate::services::pagination::Page;
use crate::services::query_service::{
    self, ContactForm, DownloadGrant, DownloadRequest, QueryFilter, QueryRow,
};

const SUBMIT_FAILED: &str = "Failed to submit query. Please try again.";

pub async fn submit_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> Result<(StatusCode, Json<serde_json::Value>)> {
    let query = query_service::submit_contact(state.store.as_ref(), form)
        .await
        .map_err(|e| e.context(SUBMIT_FAILED))?;
    Ok((StatusCode::CREATED, Json(json!({ "success": true, "id": query.id }))))
}

pub async fn request_download(
    State(state): State<AppState>,
    Json(request): Json<DownloadRequest>,
) -> Result<(StatusCode, Json<DownloadGrant>)> {
    let grant = query_service::request_download(state.store.as_ref(), &state.config.public_url, request)
        .await
        .map_err(|e| e.context(SUBMIT_FAILED))?;
    Ok((StatusCode::CREATED, Json(grant)))
}

pub async fn list(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(filter): Query<QueryFilter>,
) -> Result<Json<Page<QueryRow>>> {
    query_service::list_queries(state.store.as_ref(), &filter)
        .await
        .map(Json)
        .map_err(|e| e.context("Failed to fetch queries"))
}

/// CSV download of every query matching the filter.
pub async fn export(
    State(state): State<AppState>,
    _admin: AdminSession,
    Query(filter): Query<QueryFilter>,
) -> Result<Response> {
    let csv = query_service::export_queries(state.store.as_ref(), &filter)
        .await
        .map_err(|e| e.context("Failed to export queries"))?;
    let disposition = format!(
        "attachment; filename=\"{}\"",
        query_service::export_filename()
    );

    Ok((
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (CONTENT_DISPOSITION, disposition),
        ],
        csv,
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdate {
    pub status: String,
}

pub async fn update_status(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
    Json(update): Json<StatusUpdate>,
) -> Result<Json<ContactQuery>> {
    query_service::update_status(state.store.as_ref(), id, update.status.trim())
        .await
        .map(Json)
        .map_err(|e| e.context("Failed to update query"))
}

pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    query_service::delete_query(state.store.as_ref(), id)
        .await
        .map_err(|e| e.context("Failed to delete the inquiry."))?;
    Ok(Json(json!({ "success": true })))
}
