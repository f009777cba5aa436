//! `/api/auth`: admin login, logout and the current session.

use axum::extract::State;
use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::AppState;
use crate::auth::AdminSession;
use crate::auth::session::{clear_session_cookie, create_session_token, session_cookie};
use crate::errors::Result;
use crate::extract::Json;
use crate::services::user_service::{self, LoginForm};

pub async fn login(State(state): State<AppState>, Json(form): Json<LoginForm>) -> Result<Response> {
    let user = user_service::authenticate(state.store.as_ref(), form)
        .await
        .map_err(|e| e.context("Login failed"))?;
    let token = create_session_token(&user, &state.config)?;

    Ok((
        [(SET_COOKIE, session_cookie(&token, &state.config))],
        Json(json!({ "user": user })),
    )
        .into_response())
}

pub async fn logout(State(state): State<AppState>) -> Response {
    (
        [(SET_COOKIE, clear_session_cookie(&state.config))],
        Json(json!({ "success": true })),
    )
        .into_response()
}

pub async fn session(admin: AdminSession) -> Json<serde_json::Value> {
    Json(json!({ "user": admin }))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::test_utils::{TestApp, ADMIN_EMAIL, ADMIN_PASSWORD};

    #[tokio::test]
    async fn login_sets_cookie_that_opens_session() {
        let app = TestApp::new().await;
        let response = app
            .server
            .post("/api/auth/login")
            .json(&json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD }))
            .await;
        response.assert_status_ok();

        let cookie = response
            .headers()
            .get("set-cookie")
            .unwrap()
            .to_str()
            .unwrap()
            .to_string();
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        let body: Value = response.json();
        assert_eq!(body["user"]["email"], ADMIN_EMAIL);
        assert!(body["user"].get("passwordHash").is_none());

        let pair = cookie.split(';').next().unwrap().to_string();
        let session: Value = app
            .server
            .get("/api/auth/session")
            .add_header("cookie", pair)
            .await
            .json();
        assert_eq!(session["user"]["email"], ADMIN_EMAIL);
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let app = TestApp::new().await;
        let response = app
            .server
            .post("/api/auth/login")
            .json(&json!({ "email": ADMIN_EMAIL, "password": "nope" }))
            .await;
        response.assert_status(StatusCode::UNAUTHORIZED);
        response.assert_json(&json!({ "error": "Invalid email or password" }));
        assert!(response.headers().get("set-cookie").is_none());
    }

    #[tokio::test]
    async fn session_without_credentials_is_401() {
        let app = TestApp::new().await;
        app.server
            .get("/api/auth/session")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
        app.server
            .get("/api/auth/session")
            .add_header("authorization", "Bearer not-a-jwt")
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn logout_expires_cookie() {
        let app = TestApp::new().await;
        let response = app.server.post("/api/auth/logout").await;
        response.assert_status_ok();
        let cookie = response.headers().get("set-cookie").unwrap().to_str().unwrap();
        assert!(cookie.starts_with("catalog_session=;"));
        assert!(cookie.contains("Max-Age=0"));
    }
}
