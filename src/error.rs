//! Error types and their HTTP representation

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Crate-wide result alias
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("Image generation failed: {0}")]
    Synthesis(String),

    #[error("Backend error: {0}")]
    BackendError(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Storage backend not configured")]
    StorageNotConfigured,

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body returned for failed requests
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl AppError {
    /// HTTP status for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Machine-readable code attached to server-side failures
    pub fn code(&self) -> Option<&'static str> {
        match self {
            AppError::Validation(_) | AppError::RateLimited(_) => None,
            AppError::Synthesis(_) => Some("GENERATION_FAILED"),
            _ => Some("INTERNAL_ERROR"),
        }
    }

    /// Message shown to the caller. Server-side details stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg) | AppError::RateLimited(msg) => msg.clone(),
            AppError::Synthesis(_) => "Image generation failed".to_string(),
            _ => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.public_message(),
            code: self.code().map(String::from),
        };

        (status, Json(body)).into_response()
    }
}
