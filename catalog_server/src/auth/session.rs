//! JWT session tokens and the cookie that carries them.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::errors::ApiError;
use crate::models::user::User;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: Uuid,
    pub email: String,
    pub name: String,
    pub iat: i64,
    pub exp: i64,
}

impl SessionClaims {
    pub fn new(user: &User, config: &ServerConfig) -> Self {
        let now = Utc::now().timestamp();
        Self {
            sub: user.id,
            email: user.email.clone(),
            name: user.name.clone(),
            iat: now,
            exp: now + config.session_ttl.as_secs() as i64,
        }
    }
}

pub fn create_session_token(user: &User, config: &ServerConfig) -> Result<String, ApiError> {
    let claims = SessionClaims::new(user, config);
    let key = EncodingKey::from_secret(config.session_secret.as_bytes());
    encode(&Header::default(), &claims, &key).map_err(|e| ApiError::Internal {
        message: format!("create session token: {e}"),
    })
}

pub fn verify_session_token(token: &str, config: &ServerConfig) -> Result<SessionClaims, ApiError> {
    let key = DecodingKey::from_secret(config.session_secret.as_bytes());
    decode::<SessionClaims>(token, &key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::InvalidKeyFormat | ErrorKind::Crypto(_) => ApiError::Internal {
                message: format!("session verification: {e}"),
            },
            _ => ApiError::unauthenticated(),
        })
}

/// `Set-Cookie` value carrying a fresh session token.
pub fn session_cookie(token: &str, config: &ServerConfig) -> String {
    let mut cookie = format!(
        "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
        config.session_cookie,
        token,
        config.session_ttl.as_secs()
    );
    if config.cookie_secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that expires the session cookie.
pub fn clear_session_cookie(config: &ServerConfig) -> String {
    format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        config.session_cookie
    )
}

/// Find a cookie's value in a `Cookie` header.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}
