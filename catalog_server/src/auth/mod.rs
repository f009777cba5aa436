//! Admin authentication: password hashing, session tokens, and the
//! [`AdminSession`] extractor that guards back-office routes.

pub mod password;
pub mod session;

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use serde::Serialize;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::routes::AppState;

/// An authenticated administrator, taken from the session cookie or an
/// `Authorization: Bearer` header.
#[derive(Debug, Clone, Serialize)]
pub struct AdminSession {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

impl AdminSession {
    fn token_from_parts<'a>(parts: &'a Parts, cookie_name: &str) -> Option<&'a str> {
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));
        if bearer.is_some() {
            return bearer;
        }

        parts
            .headers
            .get_all(COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find_map(|header| session::cookie_value(header, cookie_name))
    }
}

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = Self::token_from_parts(parts, &state.config.session_cookie)
            .ok_or_else(ApiError::unauthenticated)?;
        let claims = session::verify_session_token(token, &state.config)?;

        // Deleted (or deleted and re-created) admins lose their sessions.
        let user = state
            .store
            .find_user_by_email(&claims.email)
            .await?
            .filter(|user| user.id == claims.sub)
            .ok_or_else(|| {
                tracing::info!(email = %claims.email, "Session for a removed admin");
                ApiError::unauthenticated()
            })?;

        Ok(AdminSession {
            id: user.id,
            email: user.email,
            name: user.name,
        })
    }
}
