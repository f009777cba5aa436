//! Server configuration, loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;

/// Largest accepted upload unless overridden (10 MiB).
pub const DEFAULT_UPLOAD_MAX_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Directory uploaded files are written to and served from.
    pub upload_dir: PathBuf,
    /// Maximum size of a single uploaded file.
    pub upload_max_bytes: usize,
    /// Externally visible base URL, used to build upload URLs.
    pub public_url: String,
    /// HMAC secret for session tokens.
    pub session_secret: String,
    pub session_cookie: String,
    pub session_ttl: Duration,
    /// Mark the session cookie `Secure`.
    pub cookie_secure: bool,
    /// Maximum pooled database connections.
    pub db_pool_size: usize,
    pub request_timeout: Duration,
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn random_secret() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let upload_dir = std::env::var("CATALOG_UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./public/uploads"));
        let upload_max_bytes = env_parse("CATALOG_UPLOAD_MAX_BYTES", DEFAULT_UPLOAD_MAX_BYTES);
        let public_url = std::env::var("CATALOG_PUBLIC_URL")
            .unwrap_or_else(|_| "http://localhost:3002".to_string())
            .trim_end_matches('/')
            .to_string();

        let session_secret = match std::env::var("CATALOG_SESSION_SECRET") {
            Ok(secret) if !secret.is_empty() => secret,
            _ => {
                tracing::warn!(
                    "CATALOG_SESSION_SECRET not set -- using a per-process secret, sessions will not survive restarts"
                );
                random_secret()
            }
        };
        let session_cookie = std::env::var("CATALOG_SESSION_COOKIE")
            .unwrap_or_else(|_| "catalog_session".to_string());
        let session_ttl = Duration::from_secs(env_parse("CATALOG_SESSION_TTL_DAYS", 30u64) * 24 * 60 * 60);
        let cookie_secure = env_parse("CATALOG_COOKIE_SECURE", public_url.starts_with("https://"));

        let db_pool_size = env_parse("CATALOG_DB_POOL_SIZE", 10);
        let request_timeout = Duration::from_secs(env_parse("CATALOG_REQUEST_TIMEOUT_SECS", 30));

        Self {
            upload_dir,
            upload_max_bytes,
            public_url,
            session_secret,
            session_cookie,
            session_ttl,
            cookie_secure,
            db_pool_size,
            request_timeout,
        }
    }

    /// Public URL of a stored upload.
    pub fn upload_url(&self, filename: &str) -> String {
        format!("{}/uploads/{}", self.public_url, filename)
    }
}
