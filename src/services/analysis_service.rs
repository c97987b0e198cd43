//! Analysis service - run the assessment pipeline and persist its reports.
//!
//! # Deduplication
//!
//! Reports are keyed by the SHA-256 of the uploaded bytes per API key.
//! Re-uploading the same file returns the stored report rather than adding
//! a second row; the unique index on `(api_key_id, content_hash)` keeps this
//! true under concurrent uploads.

use sha2::{Digest, Sha256};
use sqlx::types::Json;
use uuid::Uuid;

use crate::{
    db::DbPool,
    error::AppError,
    models::{
        analysis::Analysis,
        dataset::{DatasetAnalysis, FinancialSummary},
    },
    services::{ingestion, scoring},
};

/// Result of storing an upload.
#[derive(Debug)]
pub enum AnalysisOutcome {
    /// A new report was written.
    Created(Analysis),
    /// The same bytes were already analysed for this API key.
    Existing(Analysis),
}

/// Hex SHA-256 of uploaded bytes.
pub fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// Reduce an ingestion result to the SME summary, or explain why it has none.
///
/// # Errors
///
/// `UnsupportedDataset` for market data and for files without amount columns.
pub fn require_financial(analysis: DatasetAnalysis) -> Result<FinancialSummary, AppError> {
    match analysis {
        DatasetAnalysis::SmeFinancial(summary) => Ok(summary),
        DatasetAnalysis::MarketData {
            message,
            suggestion,
            ..
        } => Err(AppError::UnsupportedDataset(format!(
            "{} {}",
            message, suggestion
        ))),
        DatasetAnalysis::Unsupported {
            message,
            available_columns,
        } => Err(AppError::UnsupportedDataset(format!(
            "{} Available columns: {}",
            message,
            available_columns.join(", ")
        ))),
    }
}

/// Analyse an uploaded CSV and store the report.
///
/// # Process
///
/// 1. Classify and summarise the CSV
/// 2. Reject anything that is not SME financial data
/// 3. Score, rate credit, pick products and write insights
/// 4. Insert, or return the existing report for identical bytes
pub async fn create_analysis(
    pool: &DbPool,
    api_key_id: Uuid,
    file_name: &str,
    bytes: &[u8],
) -> Result<AnalysisOutcome, AppError> {
    let summary = require_financial(ingestion::analyze_upload(file_name, bytes)?)?;
    let hash = content_hash(bytes);
    let assessment = scoring::assess(summary);

    let inserted = sqlx::query_as::<_, Analysis>(
        r#"
        INSERT INTO analyses (
            api_key_id,
            file_name,
            content_hash,
            total_revenue,
            total_expense,
            net_cashflow,
            risk_flags,
            financial_health_score,
            health_status,
            credit_status,
            report
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        ON CONFLICT (api_key_id, content_hash) DO NOTHING
        RETURNING *
        "#,
    )
    .bind(api_key_id)
    .bind(file_name)
    .bind(&hash)
    .bind(assessment.summary.total_revenue)
    .bind(assessment.summary.total_expense)
    .bind(assessment.summary.net_cashflow)
    .bind(&assessment.summary.risk_flags)
    .bind(assessment.health.financial_health_score)
    .bind(assessment.health.status.as_str())
    .bind(assessment.credit.credit_status.as_str())
    .bind(Json(&assessment))
    .fetch_optional(pool)
    .await?;

    if let Some(analysis) = inserted {
        tracing::info!(
            analysis_id = %analysis.id,
            score = analysis.financial_health_score,
            "Stored new analysis"
        );
        return Ok(AnalysisOutcome::Created(analysis));
    }

    let existing = sqlx::query_as::<_, Analysis>(
        "SELECT * FROM analyses WHERE api_key_id = $1 AND content_hash = $2",
    )
    .bind(api_key_id)
    .bind(&hash)
    .fetch_one(pool)
    .await?;

    tracing::info!(analysis_id = %existing.id, "Upload matches an existing analysis");

    Ok(AnalysisOutcome::Existing(existing))
}

/// Get one analysis owned by `api_key_id`.
pub async fn get_analysis(
    pool: &DbPool,
    api_key_id: Uuid,
    analysis_id: Uuid,
) -> Result<Analysis, AppError> {
    sqlx::query_as::<_, Analysis>("SELECT * FROM analyses WHERE id = $1 AND api_key_id = $2")
        .bind(analysis_id)
        .bind(api_key_id)
        .fetch_optional(pool)
        .await?
        .ok_or(AppError::AnalysisNotFound)
}

/// List analyses owned by `api_key_id`, newest first.
pub async fn list_analyses(pool: &DbPool, api_key_id: Uuid) -> Result<Vec<Analysis>, AppError> {
    let analyses = sqlx::query_as::<_, Analysis>(
        "SELECT * FROM analyses WHERE api_key_id = $1 ORDER BY created_at DESC",
    )
    .bind(api_key_id)
    .fetch_all(pool)
    .await?;

    Ok(analyses)
}
