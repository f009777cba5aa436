//! Image and document uploads stored on local disk.

use axum::extract::multipart::{Field, MultipartError};
use axum::http::StatusCode;
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::config::ServerConfig;
use crate::errors::{ApiError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct StoredUpload {
    pub url: String,
    pub filename: String,
    pub size: usize,
}

/// Lowercased alphanumeric extension of `original`, if any.
pub fn sanitize_extension(original: &str) -> Option<String> {
    let (stem, ext) = original.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    let ext: String = ext
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .take(10)
        .collect();
    (!ext.is_empty()).then_some(ext)
}

/// Server-side name for an upload: a fresh UUID keeping the extension.
pub fn stored_name(original: &str) -> String {
    match sanitize_extension(original) {
        Some(ext) => format!("{}.{ext}", Uuid::new_v4()),
        None => Uuid::new_v4().to_string(),
    }
}

fn too_large(original: &str, max_bytes: usize) -> ApiError {
    ApiError::PayloadTooLarge {
        message: format!(
            "File \"{original}\" is too large (max {}MB).",
            max_bytes / (1024 * 1024)
        ),
    }
}

/// Map a multipart read failure, keeping body-limit rejections as 413.
pub fn multipart_error(e: MultipartError, original: &str, max_bytes: usize) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large(original, max_bytes)
    } else {
        ApiError::bad_request(format!("Failed to parse multipart data: {e}"))
    }
}

/// Stream a multipart file field to the upload directory, aborting once it
/// exceeds the configured maximum.
pub async fn save_upload(config: &ServerConfig, mut field: Field<'_>) -> Result<StoredUpload> {
    let original = field.file_name().unwrap_or("upload").to_string();
    let filename = stored_name(&original);
    let max_bytes = config.upload_max_bytes;

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .map_err(|e| anyhow::anyhow!("create upload dir {}: {e}", config.upload_dir.display()))?;
    let path = config.upload_dir.join(&filename);
    let mut file = tokio::fs::File::create(&path)
        .await
        .map_err(|e| anyhow::anyhow!("create {}: {e}", path.display()))?;

    let mut size = 0usize;
    let outcome: Result<()> = async {
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|e| multipart_error(e, &original, max_bytes))?
        {
            size += chunk.len();
            if size > max_bytes {
                tracing::warn!(file = %original, size, max_bytes, "Upload exceeds size limit");
                return Err(too_large(&original, max_bytes));
            }
            file.write_all(&chunk)
                .await
                .map_err(|e| anyhow::anyhow!("write {}: {e}", path.display()))?;
        }
        file.flush()
            .await
            .map_err(|e| anyhow::anyhow!("flush {}: {e}", path.display()))?;
        Ok(())
    }
    .await;

    if let Err(e) = outcome {
        drop(file);
        if let Err(rm) = tokio::fs::remove_file(&path).await {
            tracing::warn!(file = %path.display(), "Failed to remove partial upload: {rm}");
        }
        return Err(e);
    }

    crate::metrics::upload_stored(size);
    tracing::info!(original = %original, stored = %filename, size, "Upload stored");
    Ok(StoredUpload {
        url: config.upload_url(&filename),
        filename,
        size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions_are_sanitized() {
        assert_eq!(sanitize_extension("photo.PNG").as_deref(), Some("png"));
        assert_eq!(sanitize_extension("archive.tar.gz").as_deref(), Some("gz"));
        assert_eq!(sanitize_extension("evil.p$h/p").as_deref(), Some("php"));
        assert_eq!(sanitize_extension("README"), None);
        assert_eq!(sanitize_extension(".bashrc"), None);
        assert_eq!(sanitize_extension("file."), None);
    }

    #[test]
    fn stored_names_are_unique_and_keep_extension() {
        let a = stored_name("a.jpg");
        let b = stored_name("a.jpg");
        assert_ne!(a, b);
        assert!(a.ends_with(".jpg"));
        assert!(Uuid::parse_str(a.trim_end_matches(".jpg")).is_ok());
    }

    #[test]
    fn too_large_message_names_file() {
        let err = too_large("big.png", 10 * 1024 * 1024);
        assert_eq!(err.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(err.user_message(), "File \"big.png\" is too large (max 10MB).");
    }
}
