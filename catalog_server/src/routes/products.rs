//! `/api/products`: public reads, admin writes.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use crate::auth::AdminSession;
use crate::errors::Result;
use crate::extract::{Json, Path, Query};
use crate::models::product::Product;
use crate::services::product_service::{self, ProductFilter, ProductPayload};

#[derive(Debug, Default, Deserialize)]
pub struct ProductListParams {
    pub slug: Option<String>,
    pub category: Option<String>,
    pub published: Option<bool>,
}

/// `GET /api/products`: every product, or one with `?slug=`.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ProductListParams>,
) -> Result<Response> {
    if let Some(slug) = params.slug {
        let product = product_service::get_product(state.store.as_ref(), &slug)
            .await
            .map_err(|e| e.context("Failed to fetch products"))?;
        return Ok(Json(product).into_response());
    }

    let filter = ProductFilter {
        category: params.category,
        published: params.published,
    };
    let products = product_service::list_products(state.store.as_ref(), &filter)
        .await
        .map_err(|e| e.context("Failed to fetch products"))?;
    Ok(Json(products).into_response())
}

pub async fn get_one(State(state): State<AppState>, Path(slug): Path<String>) -> Result<Json<Product>> {
    product_service::get_product(state.store.as_ref(), &slug)
        .await
        .map(Json)
        .map_err(|e| e.context("Failed to fetch product"))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(payload): Json<ProductPayload>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = product_service::create_product(state.store.as_ref(), payload)
        .await
        .map_err(|e| e.context("Failed to create product"))?;
    crate::metrics::product_changed("create");
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(slug): Path<String>,
    Json(payload): Json<ProductPayload>,
) -> Result<Json<Product>> {
    let product = product_service::update_product(state.store.as_ref(), &slug, payload)
        .await
        .map_err(|e| e.context("Failed to update product"))?;
    crate::metrics::product_changed("update");
    Ok(Json(product))
}

/// `DELETE /api/products/{key}`: `key` is an id or a slug.
pub async fn remove(
    State(state): State<AppState>,
    _admin: AdminSession,
    Path(key): Path<String>,
) -> Result<Json<serde_json::Value>> {
    product_service::delete_product(state.store.as_ref(), &state.config.upload_dir, &key)
        .await
        .map_err(|e| e.context("Failed to delete product"))?;
    crate::metrics::product_changed("delete");
    Ok(Json(json!({ "message": "Deleted successfully" })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::models::product::Product;
    use crate::store::Store;
    use crate::test_utils::{sample_new_product, TestApp};

    fn body(slug: &str) -> Value {
        json!({
            "name": "Swivel Mount",
            "slug": slug,
            "description": "Full swivel and tilt",
            "category": "Mounting Solutions",
            "published": true
        })
    }

    #[tokio::test]
    async fn writes_require_admin_session() {
        let app = TestApp::new().await;
        let response = app.server.post("/api/products").json(&body("swivel-mount")).await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        let error: Value = response.json();
        assert_eq!(error["error"], "Authentication required");
    }

    #[tokio::test]
    async fn duplicate_slug_returns_400() {
        let app = TestApp::new().await;
        let first = app
            .server
            .post("/api/products")
            .add_header("authorization", app.bearer())
            .json(&body("swivel-mount"))
            .await;
        first.assert_status(StatusCode::CREATED);
        let created: Product = first.json();
        assert_eq!(created.title, "Swivel Mount");
        assert!(created.published);

        let second = app
            .server
            .post("/api/products")
            .add_header("authorization", app.bearer())
            .json(&body("swivel-mount"))
            .await;
        second.assert_status(StatusCode::BAD_REQUEST);
        let error: Value = second.json();
        assert_eq!(error["error"], "Slug already exists: swivel-mount");
    }

    #[tokio::test]
    async fn missing_fields_return_400() {
        let app = TestApp::new().await;
        let response = app
            .server
            .post("/api/products")
            .add_header("authorization", app.bearer())
            .json(&json!({ "name": "No slug" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let error: Value = response.json();
        assert_eq!(
            error["error"],
            "Missing required fields: name, slug, and description are mandatory"
        );
    }

    #[tokio::test]
    async fn lookup_by_query_slug_and_path() {
        let app = TestApp::new().await;
        app.store.insert_product(sample_new_product("arm")).await.unwrap();

        app.server.get("/api/products?slug=arm").await.assert_status_ok();
        app.server.get("/api/products/arm").await.assert_status_ok();

        let missing = app.server.get("/api/products?slug=nope").await;
        missing.assert_status_not_found();
        missing.assert_json(&json!({ "error": "Product not found" }));
        app.server.get("/api/products/nope").await.assert_status_not_found();
    }

    #[tokio::test]
    async fn list_filters_drafts() {
        let app = TestApp::new().await;
        let mut draft = sample_new_product("draft");
        draft.published = false;
        app.store.insert_product(draft).await.unwrap();
        app.store.insert_product(sample_new_product("live")).await.unwrap();

        let all: Vec<Product> = app.server.get("/api/products").await.json();
        assert_eq!(all.len(), 2);

        let live: Vec<Product> = app.server.get("/api/products?published=true").await.json();
        assert_eq!(live.len(), 1);
        assert_eq!(live[0].slug, "live");
    }

    #[tokio::test]
    async fn update_is_partial() {
        let app = TestApp::new().await;
        app.store.insert_product(sample_new_product("arm")).await.unwrap();
        app.store.insert_product(sample_new_product("taken")).await.unwrap();

        let response = app
            .server
            .put("/api/products/arm")
            .add_header("authorization", app.bearer())
            .json(&json!({
                "id": "ignored",
                "updatedAt": "2000-01-01T00:00:00Z",
                "vesa": "100x100",
                "features": [{ "value": "Tilt" }, "Swivel"]
            }))
            .await;
        response.assert_status_ok();
        let updated: Product = response.json();
        assert_eq!(updated.vesa, "100x100");
        assert_eq!(updated.features, vec!["Tilt", "Swivel"]);
        assert_eq!(updated.name, "arm");

        let clash = app
            .server
            .put("/api/products/arm")
            .add_header("authorization", app.bearer())
            .json(&json!({ "slug": "taken" }))
            .await;
        clash.assert_status(StatusCode::BAD_REQUEST);

        app.server
            .put("/api/products/nope")
            .add_header("authorization", app.bearer())
            .json(&json!({ "vesa": "x" }))
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn delete_by_id_then_missing() {
        let app = TestApp::new().await;
        let product = app.store.insert_product(sample_new_product("arm")).await.unwrap();

        let response = app
            .server
            .delete(&format!("/api/products/{}", product.id))
            .add_header("authorization", app.bearer())
            .await;
        response.assert_status_ok();
        response.assert_json(&json!({ "message": "Deleted successfully" }));

        app.server
            .delete("/api/products/arm")
            .add_header("authorization", app.bearer())
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn bad_query_values_get_json_errors() {
        let app = TestApp::new().await;
        let response = app.server.get("/api/products?published=yes").await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert!(body["error"].is_string(), "{body}");
    }

    #[tokio::test]
    async fn unicode_slug_is_rejected() {
        let app = TestApp::new().await;
        let response = app
            .server
            .post("/api/products")
            .add_header("authorization", app.bearer())
            .json(&json!({ "name": "Café", "slug": "café", "description": "Espresso cart mount" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Invalid slug: café" }));
    }
}
