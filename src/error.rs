//! Error types and HTTP error response handling.
//!
//! This module defines all application errors and how they are converted
//! into HTTP responses with appropriate status codes and JSON bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Database Errors**: Any sqlx::Error from database operations
/// - **Authentication Errors**: Invalid or missing API keys
/// - **Resource Errors**: Requested analyses or webhooks not found
/// - **Upload Errors**: Wrong file type, unreadable CSV, non-financial dataset
/// - **Validation Errors**: Invalid request data
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// API key is missing, invalid, or inactive.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("Invalid API key")]
    InvalidApiKey,

    /// Requested analysis does not exist or belongs to another business.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("Analysis not found")]
    AnalysisNotFound,

    /// Requested webhook endpoint does not exist or belongs to another business.
    #[error("Webhook not found")]
    WebhookNotFound,

    /// Webhook URL failed validation.
    #[error("Invalid webhook URL: {0}")]
    InvalidWebhookUrl(String),

    /// Uploaded file is not a CSV.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("Only CSV files are supported")]
    UnsupportedFileType,

    /// Request body exceeds the configured upload limit.
    ///
    /// Returns HTTP 413 Payload Too Large.
    #[error("Upload exceeds the maximum allowed size")]
    UploadTooLarge,

    /// Uploaded CSV could not be read.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("Invalid CSV: {0}")]
    InvalidCsv(String),

    /// CSV parsed but holds no SME financial data (market data or no amount columns).
    #[error("{0}")]
    UnsupportedDataset(String),

    /// Request body or parameters are invalid.
    ///
    /// Returns HTTP 400 Bad Request.
    /// The String contains details about what was invalid.
    #[error("Invalid request")]
    InvalidRequest(String),
}

impl From<csv::Error> for AppError {
    fn from(err: csv::Error) -> Self {
        AppError::InvalidCsv(err.to_string())
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "error_type",
///     "message": "Human-readable error message"
///   }
/// }
/// ```
///
/// # Status Code Mapping
///
/// - `InvalidApiKey` → 401 Unauthorized
/// - `AnalysisNotFound`, `WebhookNotFound` → 404 Not Found
/// - `UploadTooLarge` → 413 Payload Too Large
/// - `InvalidCsv`, `UnsupportedDataset` → 422 Unprocessable Entity
/// - `UnsupportedFileType`, `InvalidWebhookUrl`, `InvalidRequest` → 400 Bad Request
/// - `Database` → 500 Internal Server Error (hides details from client)
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::InvalidApiKey => (
                StatusCode::UNAUTHORIZED,
                "invalid_api_key",
                self.to_string(),
            ),
            AppError::AnalysisNotFound => (
                StatusCode::NOT_FOUND,
                "analysis_not_found",
                self.to_string(),
            ),
            AppError::WebhookNotFound => {
                (StatusCode::NOT_FOUND, "webhook_not_found", self.to_string())
            }
            AppError::InvalidWebhookUrl(_) => (
                StatusCode::BAD_REQUEST,
                "invalid_webhook_url",
                self.to_string(),
            ),
            AppError::UnsupportedFileType => (
                StatusCode::BAD_REQUEST,
                "unsupported_file_type",
                self.to_string(),
            ),
            AppError::UploadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "upload_too_large",
                self.to_string(),
            ),
            AppError::InvalidCsv(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "invalid_csv",
                self.to_string(),
            ),
            AppError::UnsupportedDataset(ref msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unsupported_dataset",
                msg.clone(),
            ),
            AppError::InvalidRequest(ref msg) => {
                (StatusCode::BAD_REQUEST, "invalid_request", msg.clone())
            }
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
