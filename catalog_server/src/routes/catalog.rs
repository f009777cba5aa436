//! `/api/catalog`: storefront listing with category/search filters.

use axum::extract::State;

use super::AppState;
use crate::errors::Result;
use crate::extract::{Json, Query};
use crate::models::product::Product;
use crate::services::catalog_service::{self, CatalogQuery};
use crate::services::pagination::Page;

pub async fn browse(
    State(state): State<AppState>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<Page<Product>>> {
    catalog_service::browse(state.store.as_ref(), &query)
        .await
        .map(Json)
        .map_err(|e| e.context("Failed to fetch products"))
}
