//! Fixtures shared by unit and HTTP tests.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum_test::TestServer;
use chrono::Utc;
use tempfile::TempDir;
use uuid::Uuid;

use crate::auth::{password, session};
use crate::config::{ServerConfig, DEFAULT_UPLOAD_MAX_BYTES};
use crate::models::contact_query::{ContactQuery, STATUS_NEW};
use crate::models::product::NewProduct;
use crate::models::user::{NewUser, User};
use crate::routes::{build_router, AppState};
use crate::store::{MemoryStore, Store};

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const ADMIN_PASSWORD: &str = "correct-horse-battery";

pub fn test_config(upload_dir: PathBuf) -> ServerConfig {
    ServerConfig {
        upload_dir,
        upload_max_bytes: DEFAULT_UPLOAD_MAX_BYTES,
        public_url: "http://localhost:3002".to_string(),
        session_secret: "test-secret-key-for-testing-only".to_string(),
        session_cookie: "catalog_session".to_string(),
        session_ttl: Duration::from_secs(30 * 24 * 60 * 60),
        cookie_secure: false,
        db_pool_size: 1,
        request_timeout: Duration::from_secs(30),
    }
}

/// A published product with only the required fields filled in.
pub fn sample_new_product(slug: &str) -> NewProduct {
    NewProduct {
        id: Uuid::new_v4(),
        name: slug.to_string(),
        title: slug.to_string(),
        slug: slug.to_string(),
        description: format!("Description of {slug}"),
        category: Some("Mounts".to_string()),
        images: vec![],
        why_this_product: String::new(),
        what_does_it_do: String::new(),
        features: vec![],
        use_cases: vec![],
        sku: String::new(),
        vesa: String::new(),
        max_weight: String::new(),
        screen_size: String::new(),
        adjustments: String::new(),
        technical_drawing: String::new(),
        installation_manual: String::new(),
        technical_data_sheet: String::new(),
        brochure: String::new(),
        material: String::new(),
        certifications: vec![],
        video_url: String::new(),
        fusion_url: String::new(),
        application: String::new(),
        compatibility: String::new(),
        finish: String::new(),
        published: true,
    }
}

pub fn sample_query(subject: &str) -> ContactQuery {
    ContactQuery {
        id: Uuid::new_v4(),
        first_name: "Jane".to_string(),
        last_name: "Doe".to_string(),
        email: "jane@example.com".to_string(),
        phone_number: "+1 555 0100".to_string(),
        subject: subject.to_string(),
        message: "Please get in touch with me.".to_string(),
        status: STATUS_NEW.to_string(),
        created_at: Utc::now(),
    }
}

/// Full router over a [`MemoryStore`] with one admin account and a
/// temporary upload directory.
pub struct TestApp {
    pub server: TestServer,
    pub store: Arc<MemoryStore>,
    pub config: Arc<ServerConfig>,
    pub admin: User,
    uploads: TempDir,
}

impl TestApp {
    pub async fn new() -> Self {
        let uploads = TempDir::new().unwrap();
        let config = Arc::new(test_config(uploads.path().to_path_buf()));
        let store = Arc::new(MemoryStore::new());

        let hash = password::hash_password(ADMIN_PASSWORD).unwrap();
        let admin = store
            .insert_user(NewUser::new(ADMIN_EMAIL, "Admin", hash))
            .await
            .unwrap();

        let state = AppState::new(store.clone(), config.clone());
        let server = TestServer::new(build_router(state)).unwrap();

        Self {
            server,
            store,
            config,
            admin,
            uploads,
        }
    }

    /// `Authorization` header value for the seeded admin.
    pub fn bearer(&self) -> String {
        let token = session::create_session_token(&self.admin, &self.config).unwrap();
        format!("Bearer {token}")
    }

    pub fn upload_dir(&self) -> &std::path::Path {
        self.uploads.path()
    }
}
