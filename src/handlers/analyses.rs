//! Stored analysis HTTP handlers.
//!
//! - POST /api/v1/analyses - Analyse and store an uploaded CSV
//! - GET /api/v1/analyses - List reports for the authenticated business
//! - GET /api/v1/analyses/{id} - Get one report

use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use uuid::Uuid;

use crate::{
    AppState,
    db::DbPool,
    error::AppError,
    handlers::upload::read_file_field,
    middleware::auth::AuthContext,
    models::analysis::AssessmentReport,
    services::{
        analysis_service::{self, AnalysisOutcome},
        webhook_service,
    },
};

/// Analyse an uploaded CSV and store the report.
///
/// # Endpoint
///
/// `POST /api/v1/analyses` (multipart, field `file`)
///
/// # Response
///
/// - **201 Created**: new report
/// - **200 OK**: the same file was already analysed; the stored report is returned
/// - **400**: not a CSV, or no `file` field
/// - **422**: unreadable CSV, market data, or no amount columns
///
/// A newly stored report with risk flags or an `At Risk` status triggers a
/// risk alert to the business's webhooks in the background.
pub async fn create_analysis(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<AssessmentReport>), AppError> {
    let upload = read_file_field(multipart).await?;

    let outcome = analysis_service::create_analysis(
        &state.pool,
        auth.api_key_id,
        &upload.file_name,
        &upload.bytes,
    )
    .await?;

    let (status, analysis) = match outcome {
        AnalysisOutcome::Created(analysis) => {
            if analysis.report.needs_risk_alert() {
                let pool = state.pool.clone();
                let timeout = state.webhook_timeout;
                let alerted = analysis.clone();
                tokio::spawn(async move {
                    if let Err(e) =
                        webhook_service::notify_risk_alert(&pool, &alerted, timeout).await
                    {
                        tracing::error!(analysis_id = %alerted.id, "Risk alert dispatch failed: {:?}", e);
                    }
                });
            }
            (StatusCode::CREATED, analysis)
        }
        AnalysisOutcome::Existing(analysis) => (StatusCode::OK, analysis),
    };

    Ok((status, Json(analysis.into())))
}

/// List stored reports, newest first.
pub async fn list_analyses(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<AssessmentReport>>, AppError> {
    let analyses = analysis_service::list_analyses(&pool, auth.api_key_id).await?;

    Ok(Json(analyses.into_iter().map(Into::into).collect()))
}

/// Get one stored report.
///
/// Returns 404 when the report does not exist or belongs to another business.
pub async fn get_analysis(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(analysis_id): Path<Uuid>,
) -> Result<Json<AssessmentReport>, AppError> {
    let analysis = analysis_service::get_analysis(&pool, auth.api_key_id, analysis_id).await?;

    Ok(Json(analysis.into()))
}
