//! API error type. Every handler returns [`Result`], which renders as
//! `{"error": "<message>"}` with the matching status code.

use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request data or a business rule violation.
    #[error("{message}")]
    BadRequest { message: String },

    /// Missing or invalid admin session.
    #[error("{message}")]
    Unauthenticated { message: String },

    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    PayloadTooLarge { message: String },

    /// The request could not be extracted (malformed JSON, path or query).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },

    /// Generic failure; `message` is what the client sees.
    #[error("{message}")]
    Internal { message: String },

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn unauthenticated() -> Self {
        Self::Unauthenticated {
            message: "Authentication required".to_string(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated { .. } => StatusCode::UNAUTHORIZED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Rejected { status, .. } => *status,
            ApiError::Store(StoreError::Conflict { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Internal { .. } | ApiError::Store(_) | ApiError::Other(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Client-facing message. Internal failures never leak their cause.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::BadRequest { message }
            | ApiError::Unauthenticated { message }
            | ApiError::NotFound { message }
            | ApiError::PayloadTooLarge { message }
            | ApiError::Rejected { message, .. }
            | ApiError::Internal { message } => message.clone(),
            ApiError::Store(StoreError::Conflict { .. }) => "Resource already exists".to_string(),
            ApiError::Store(_) | ApiError::Other(_) => "Internal server error".to_string(),
        }
    }

    /// Replace the client-facing message of a server-side failure, keeping
    /// client errors untouched.
    pub fn context(self, message: &str) -> Self {
        match self {
            ApiError::Store(StoreError::Other(e)) | ApiError::Other(e) => {
                tracing::error!("{message}: {e:#}");
                ApiError::Internal {
                    message: message.to_string(),
                }
            }
            other => other,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match &self {
            ApiError::Internal { .. } | ApiError::Store(StoreError::Other(_)) | ApiError::Other(_) => {
                tracing::error!("Internal service error: {:#}", self);
            }
            ApiError::Store(StoreError::Conflict { .. }) => {
                tracing::warn!("Constraint violation: {}", self);
            }
            ApiError::Unauthenticated { .. } => {
                tracing::info!("Authorization error: {}", self);
            }
            ApiError::BadRequest { .. }
            | ApiError::NotFound { .. }
            | ApiError::PayloadTooLarge { .. }
            | ApiError::Rejected { .. } => {
                tracing::debug!("Client error: {}", self);
            }
        }

        let status = self.status_code();
        (status, Json(json!({ "error": self.user_message() }))).into_response()
    }
}

macro_rules! from_rejection {
    ($($rejection:ty),+) => {
        $(
            impl From<$rejection> for ApiError {
                fn from(rejection: $rejection) -> Self {
                    ApiError::Rejected {
                        status: rejection.status(),
                        message: rejection.body_text(),
                    }
                }
            }
        )+
    };
}

from_rejection!(JsonRejection, PathRejection, QueryRejection, MultipartRejection);

pub type Result<T> = std::result::Result<T, ApiError>;
