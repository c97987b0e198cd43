//! Stateless scoring endpoints.
//!
//! Each endpoint takes the output of the previous step, so a client can walk
//! `/upload` → `/health-score` → `/creditworthiness` → `/product-recommendation`
//! without storing anything:
//!
//! - POST /ai-insights
//! - POST /health-score
//! - POST /creditworthiness
//! - POST /product-recommendation

use axum::Json;

use crate::{
    models::{
        assessment::{
            AiInsights, CreditAssessment, CreditAssessmentRequest, CreditStatus, HealthScore,
            ProductRecommendation, ProductRecommendationRequest,
        },
        dataset::FinancialSummary,
    },
    services::scoring,
};

/// Plain-English explanation of a summary.
///
/// # Request Body
///
/// ```json
/// { "total_revenue": 1000.0, "total_expense": 900.0, "net_cashflow": 100.0,
///   "risk_flags": ["High expense ratio"] }
/// ```
pub async fn ai_insights(Json(summary): Json<FinancialSummary>) -> Json<AiInsights> {
    Json(scoring::generate_insights(&summary))
}

/// Financial health score of a summary.
///
/// # Response
///
/// ```json
/// { "financial_health_score": 70, "status": "Moderate" }
/// ```
pub async fn health_score(Json(summary): Json<FinancialSummary>) -> Json<HealthScore> {
    Json(scoring::health_score(&summary))
}

/// Credit readiness from a health score.
pub async fn creditworthiness(
    Json(request): Json<CreditAssessmentRequest>,
) -> Json<CreditAssessment> {
    Json(scoring::assess_credit(
        request.financial_health_score,
        request.net_cashflow,
    ))
}

/// Financing products for a credit status.
///
/// Unknown `credit_status` labels get the not-eligible recommendation.
pub async fn product_recommendation(
    Json(request): Json<ProductRecommendationRequest>,
) -> Json<ProductRecommendation> {
    let status = CreditStatus::from_label(&request.credit_status);
    if status.is_none() {
        tracing::debug!(credit_status = %request.credit_status, "Unrecognised credit status");
    }

    Json(scoring::recommend_products(status, request.net_cashflow))
}
