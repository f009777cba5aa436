//! `/api/categories`: navbar grouping of published products.

use axum::extract::State;

use super::AppState;
use crate::errors::Result;
use crate::extract::Json;
use crate::services::category_service::{self, CategoryListing};

pub async fn list(State(state): State<AppState>) -> Result<Json<CategoryListing>> {
    category_service::list_categories(state.store.as_ref())
        .await
        .map(Json)
        .map_err(|e| e.context("Failed to fetch categories"))
}
