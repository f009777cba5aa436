//! `POST /api/upload`: multipart file upload for product media.

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;

use super::AppState;
use crate::auth::AdminSession;
use crate::errors::{ApiError, Result};
use crate::extract::Json;
use crate::services::upload_service::{self, StoredUpload};

pub async fn upload(
    State(state): State<AppState>,
    _admin: AdminSession,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<StoredUpload>)> {
    let mut multipart = multipart?;
    let max_bytes = state.config.upload_max_bytes;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| upload_service::multipart_error(e, "upload", max_bytes))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let stored = upload_service::save_upload(&state.config, field)
            .await
            .map_err(|e| e.context("Upload failed"))?;
        return Ok((StatusCode::CREATED, Json(stored)));
    }

    Err(ApiError::bad_request("No file uploaded"))
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::{json, Value};

    use crate::test_utils::TestApp;

    #[tokio::test]
    async fn stores_file_and_returns_public_url() {
        let app = TestApp::new().await;
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"fake png".to_vec())
                .file_name("Photo.PNG")
                .mime_type("image/png"),
        );

        let response = app
            .server
            .post("/api/upload")
            .add_header("authorization", app.bearer())
            .multipart(form)
            .await;
        response.assert_status(StatusCode::CREATED);

        let body: Value = response.json();
        let filename = body["filename"].as_str().unwrap();
        assert!(filename.ends_with(".png"));
        assert_eq!(body["size"], 8);
        assert_eq!(
            body["url"],
            format!("http://localhost:3002/uploads/{filename}")
        );
        assert_eq!(
            std::fs::read(app.upload_dir().join(filename)).unwrap(),
            b"fake png"
        );

        app.server
            .get(&format!("/uploads/{filename}"))
            .await
            .assert_status_ok();
    }

    #[tokio::test]
    async fn missing_file_field_is_rejected() {
        let app = TestApp::new().await;
        let response = app
            .server
            .post("/api/upload")
            .add_header("authorization", app.bearer())
            .multipart(MultipartForm::new().add_text("note", "no file here"))
            .await;
        response.assert_status(StatusCode::BAD_REQUEST);
        response.assert_json(&json!({ "error": "No file uploaded" }));
    }

    #[tokio::test]
    async fn oversized_file_is_413() {
        let app = TestApp::new().await;
        let big = vec![0u8; app.config.upload_max_bytes + 1];
        let form = MultipartForm::new().add_part("file", Part::bytes(big).file_name("big.bin"));

        let response = app
            .server
            .post("/api/upload")
            .add_header("authorization", app.bearer())
            .multipart(form)
            .await;
        response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
        response.assert_json(&json!({ "error": "File \"big.bin\" is too large (max 10MB)." }));

        let leftovers = std::fs::read_dir(app.upload_dir()).unwrap().count();
        assert_eq!(leftovers, 0);
    }

    #[tokio::test]
    async fn upload_requires_admin() {
        let app = TestApp::new().await;
        let form = MultipartForm::new().add_part("file", Part::bytes(b"x".to_vec()).file_name("x.txt"));
        app.server
            .post("/api/upload")
            .multipart(form)
            .await
            .assert_status(StatusCode::UNAUTHORIZED);
    }
}
