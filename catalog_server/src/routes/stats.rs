//! `/api/admin/stats`: dashboard counters.

use axum::extract::State;

use super::AppState;
use crate::auth::AdminSession;
use crate::dashboard::kpi::CatalogStats;
use crate::errors::{ApiError, Result};
use crate::extract::Json;

pub async fn stats(State(state): State<AppState>, _admin: AdminSession) -> Result<Json<CatalogStats>> {
    state
        .store
        .stats()
        .await
        .map(Json)
        .map_err(|e| ApiError::from(e).context("Failed to load dashboard stats"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::Value;

    use crate::store::Store;
    use crate::test_utils::{sample_new_product, TestApp};

    #[tokio::test]
    async fn counts_products_and_queries() {
        let app = TestApp::new().await;
        let mut draft = sample_new_product("draft");
        draft.published = false;
        app.store.insert_product(draft).await.unwrap();
        app.store.insert_product(sample_new_product("live")).await.unwrap();

        app.server
            .get("/api/admin/stats")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);

        let body: Value = app
            .server
            .get("/api/admin/stats")
            .add_header("authorization", app.bearer())
            .await
            .json();
        assert_eq!(body["products"]["total"], 2);
        assert_eq!(body["products"]["drafts"], 1);
        assert_eq!(body["queries"]["total"], 0);
        assert_eq!(body["queries"]["new"], 0);
    }
}
