//! `/api/admins`: back-office account management.

use axum::extract::State;
use axum::http::StatusCode;
use serde_json::json;

use super::AppState;
use crate::auth::AdminSession;
use crate::errors::Result;
use crate::extract::{Json, Path};
use crate::models::user::User;
use crate::services::user_service::{self, NewAdminForm};

pub async fn list(State(state): State<AppState>, _admin: AdminSession) -> Result<Json<Vec<User>>> {
    user_service::list_admins(state.store.as_ref())
        .await
        .map(Json)
        .map_err(|e| e.context("Failed to fetch admins"))
}

pub async fn create(
    State(state): State<AppState>,
    _admin: AdminSession,
    Json(form): Json<NewAdminForm>,
) -> Result<(StatusCode, Json<User>)> {
    let user = user_service::create_admin(state.store.as_ref(), form)
        .await
        .map_err(|e| e.context("Failed to create admin"))?;
    Ok((StatusCode::CREATED, Json(user)))
}

pub async fn remove(
    State(state): State<AppState>,
    admin: AdminSession,
    Path(email): Path<String>,
) -> Result<Json<serde_json::Value>> {
    user_service::delete_admin(state.store.as_ref(), &admin.email, &email)
        .await
        .map_err(|e| e.context("Failed to delete admin"))?;
    Ok(Json(json!({ "success": true })))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::auth::session;
    use crate::store::Store;
    use crate::test_utils::{sample_new_product, TestApp, ADMIN_EMAIL};

    #[tokio::test]
    async fn create_list_and_delete_admins() {
        let app = TestApp::new().await;
        let created = app
            .server
            .post("/api/admins")
            .add_header("authorization", app.bearer())
            .json(&json!({ "name": "Ops", "email": "ops@example.com", "password": "longenough" }))
            .await;
        created.assert_status(StatusCode::CREATED);

        let dup = app
            .server
            .post("/api/admins")
            .add_header("authorization", app.bearer())
            .json(&json!({ "name": "Ops", "email": "ops@example.com", "password": "longenough" }))
            .await;
        dup.assert_status(StatusCode::BAD_REQUEST);
        dup.assert_json(&json!({ "error": "An admin with this email already exists" }));

        let admins: Vec<Value> = app
            .server
            .get("/api/admins")
            .add_header("authorization", app.bearer())
            .await
            .json();
        let emails: Vec<&str> = admins.iter().map(|a| a["email"].as_str().unwrap()).collect();
        assert_eq!(emails, vec![ADMIN_EMAIL, "ops@example.com"]);

        app.server
            .delete("/api/admins/ops@example.com")
            .add_header("authorization", app.bearer())
            .await
            .assert_status_ok();
        app.server
            .delete("/api/admins/ops@example.com")
            .add_header("authorization", app.bearer())
            .await
            .assert_status_not_found();
    }

    #[tokio::test]
    async fn cannot_delete_own_account() {
        let app = TestApp::new().await;
        app.server
            .delete(&format!("/api/admins/{ADMIN_EMAIL}"))
            .add_header("authorization", app.bearer())
            .await
            .assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn short_password_is_rejected() {
        let app = TestApp::new().await;
        let response = app
            .server
            .post("/api/admins")
            .add_header("authorization", app.bearer())
            .json(&json!({ "name": "Ops", "email": "ops@example.com", "password": "short" }))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "Password must be at least 8 characters" }));
    }

    #[tokio::test]
    async fn deleted_admin_session_is_rejected() {
        let app = TestApp::new().await;
        app.server
            .post("/api/admins")
            .add_header("authorization", app.bearer())
            .json(&json!({ "name": "Ops", "email": "ops@example.com", "password": "longenough" }))
            .await
            .assert_status(StatusCode::CREATED);
        let ops = app
            .store
            .find_user_by_email("ops@example.com")
            .await
            .unwrap()
            .unwrap();
        let ops_bearer = format!(
            "Bearer {}",
            session::create_session_token(&ops, &app.config).unwrap()
        );

        app.server
            .get("/api/admins")
            .add_header("authorization", ops_bearer.clone())
            .await
            .assert_status_ok();

        app.server
            .delete("/api/admins/ops@example.com")
            .add_header("authorization", app.bearer())
            .await
            .assert_status_ok();

        let listed = app
            .server
            .get("/api/admins")
            .add_header("authorization", ops_bearer.clone())
            .await;
        listed.assert_status(StatusCode::UNAUTHORIZED);
        listed.assert_json(&json!({ "error": "Authentication required" }));

        let product = sample_new_product("after-revoke");
        app.server
            .post("/api/products")
            .add_header("authorization", ops_bearer)
            .json(&json!({
                "name": product.name,
                "slug": product.slug,
                "description": "Created with a revoked session"
            }))
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        assert!(app
            .store
            .find_product_by_slug("after-revoke")
            .await
            .unwrap()
            .is_none());
    }
}
