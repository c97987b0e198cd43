//! Health score, credit, product and insight types.
//!
//! These are both the responses of the stateless scoring endpoints and the
//! pieces of a persisted [`Assessment`].

use serde::{Deserialize, Deserializer, Serialize, de};

use crate::models::dataset::FinancialSummary;

/// Band a financial health score falls into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Score of 80 or above
    Healthy,
    /// Score of 50 to 79
    Moderate,
    /// Score below 50
    #[serde(rename = "At Risk")]
    AtRisk,
}

impl HealthStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            HealthStatus::Healthy => "Healthy",
            HealthStatus::Moderate => "Moderate",
            HealthStatus::AtRisk => "At Risk",
        }
    }
}

/// Response of `/health-score`.
///
/// ```json
/// { "financial_health_score": 70, "status": "Moderate" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthScore {
    /// 0 to 100
    pub financial_health_score: i32,
    pub status: HealthStatus,
}

/// Credit readiness derived from the health score and cash flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreditStatus {
    #[serde(rename = "Credit Ready")]
    CreditReady,
    Caution,
    #[serde(rename = "High Risk")]
    HighRisk,
}

impl CreditStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CreditStatus::CreditReady => "Credit Ready",
            CreditStatus::Caution => "Caution",
            CreditStatus::HighRisk => "High Risk",
        }
    }

    /// Parse a status label sent by a client. Unknown labels yield `None`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Credit Ready" => Some(CreditStatus::CreditReady),
            "Caution" => Some(CreditStatus::Caution),
            "High Risk" => Some(CreditStatus::HighRisk),
            _ => None,
        }
    }
}

/// Request body of `/creditworthiness`.
#[derive(Debug, Clone, Deserialize)]
pub struct CreditAssessmentRequest {
    /// Integer, or a float with no fractional part such as `75.0`
    #[serde(deserialize_with = "whole_number")]
    pub financial_health_score: i32,
    pub net_cashflow: f64,

    /// Accepted for compatibility with `/upload` output; does not affect the result
    #[serde(default)]
    pub risk_flags: Vec<String>,
}

fn whole_number<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = f64::deserialize(deserializer)?;
    if value.fract() != 0.0 || value < f64::from(i32::MIN) || value > f64::from(i32::MAX) {
        return Err(de::Error::custom(format!(
            "expected a whole number, got {}",
            value
        )));
    }
    Ok(value as i32)
}

/// Response of `/creditworthiness`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditAssessment {
    pub credit_status: CreditStatus,
    pub explanation: String,
}

/// Request body of `/product-recommendation`.
///
/// `credit_status` is free text: labels other than the three known statuses
/// are treated as not eligible.
#[derive(Debug, Clone, Deserialize)]
pub struct ProductRecommendationRequest {
    pub credit_status: String,
    pub net_cashflow: f64,
    pub total_revenue: f64,
    pub total_expense: f64,
}

/// Response of `/product-recommendation`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecommendation {
    pub recommended_products: Vec<String>,
    pub note: String,
}

/// Response of `/ai-insights`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiInsights {
    pub plain_english_summary: String,
    pub actionable_recommendations: Vec<String>,
}

/// Everything derived from one SME dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub summary: FinancialSummary,
    pub health: HealthScore,
    pub credit: CreditAssessment,
    pub products: ProductRecommendation,
    pub insights: AiInsights,
}

impl Assessment {
    /// Whether registered webhooks should receive a risk alert for this assessment.
    pub fn needs_risk_alert(&self) -> bool {
        !self.summary.risk_flags.is_empty() || self.health.status == HealthStatus::AtRisk
    }
}
