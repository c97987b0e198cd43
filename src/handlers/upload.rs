//! CSV upload handling shared by `/upload` and `/api/v1/analyses`.

use axum::{
    Json,
    body::Bytes,
    extract::{Multipart, multipart::MultipartError},
    http::StatusCode,
};

use crate::{error::AppError, models::dataset::DatasetAnalysis, services::ingestion};

/// Multipart field carrying the CSV.
pub const FILE_FIELD: &str = "file";

/// A file pulled out of a multipart body.
#[derive(Debug)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Bytes,
}

/// Read the `file` field from a multipart request, ignoring other fields.
///
/// # Errors
///
/// - `UploadTooLarge` when the body exceeds the configured limit
/// - `InvalidRequest` when the body is malformed or has no `file` field
pub async fn read_file_field(mut multipart: Multipart) -> Result<UploadedFile, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(multipart_error)?;

        return Ok(UploadedFile { file_name, bytes });
    }

    Err(AppError::InvalidRequest(format!(
        "Missing '{}' field in multipart body",
        FILE_FIELD
    )))
}

fn multipart_error(err: MultipartError) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::UploadTooLarge
    } else {
        AppError::InvalidRequest(err.body_text())
    }
}

/// Classify an uploaded CSV without storing anything.
///
/// # Endpoint
///
/// `POST /upload` (multipart, field `file`)
///
/// # Response (200 OK)
///
/// One of three shapes, tagged by `dataset_type`:
///
/// ```json
/// { "dataset_type": "sme_financial", "total_revenue": 1500.0, "total_expense": 1300.0,
///   "net_cashflow": 200.0, "risk_flags": ["High expense ratio"] }
/// ```
///
/// ```json
/// { "dataset_type": "market_data", "message": "...", "suggestion": "...",
///   "detected_columns": ["date", "open", "high", "low", "close"] }
/// ```
///
/// ```json
/// { "dataset_type": "unsupported", "message": "...", "available_columns": ["name"] }
/// ```
///
/// # Errors
///
/// - **400**: not a `.csv` file, or no `file` field
/// - **413**: body larger than `MAX_UPLOAD_BYTES`
/// - **422**: the CSV could not be read
pub async fn upload_file(multipart: Multipart) -> Result<Json<DatasetAnalysis>, AppError> {
    let upload = read_file_field(multipart).await?;

    let analysis = ingestion::analyze_upload(&upload.file_name, &upload.bytes)?;
    tracing::info!(file_name = %upload.file_name, bytes = upload.bytes.len(), "Analysed upload");

    Ok(Json(analysis))
}
