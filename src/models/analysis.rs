//! Persisted analyses and their API representation.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use uuid::Uuid;

use crate::models::assessment::Assessment;

/// Row of the `analyses` table.
///
/// The full [`Assessment`] lives in the `report` JSONB column; the score,
/// statuses and flags are copied into their own columns so they can be
/// filtered on without unpacking JSON.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Analysis {
    pub id: Uuid,

    /// Owning business. Every query filters on this.
    pub api_key_id: Uuid,

    pub file_name: String,

    /// Hex SHA-256 of the uploaded bytes; unique per API key
    pub content_hash: String,

    pub total_revenue: f64,
    pub total_expense: f64,
    pub net_cashflow: f64,
    pub risk_flags: Vec<String>,
    pub financial_health_score: i32,
    pub health_status: String,
    pub credit_status: String,
    pub report: Json<Assessment>,
    pub created_at: DateTime<Utc>,
}

/// Response body for analysis endpoints.
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "file_name": "march.csv",
///   "content_hash": "9f86d08...",
///   "summary": { "total_revenue": 1500.0, "total_expense": 1300.0, "net_cashflow": 200.0, "risk_flags": ["High expense ratio"] },
///   "health": { "financial_health_score": 70, "status": "Moderate" },
///   "credit": { "credit_status": "Caution", "explanation": "..." },
///   "products": { "recommended_products": ["Overdraft Facility"], "note": "..." },
///   "insights": { "plain_english_summary": "...", "actionable_recommendations": ["..."] },
///   "created_at": "2026-03-31T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
pub struct AssessmentReport {
    pub id: Uuid,
    pub file_name: String,
    pub content_hash: String,
    #[serde(flatten)]
    pub assessment: Assessment,
    pub created_at: DateTime<Utc>,
}

/// Drops the owning `api_key_id` and the denormalised columns.
impl From<Analysis> for AssessmentReport {
    fn from(analysis: Analysis) -> Self {
        Self {
            id: analysis.id,
            file_name: analysis.file_name,
            content_hash: analysis.content_hash,
            assessment: analysis.report.0,
            created_at: analysis.created_at,
        }
    }
}
