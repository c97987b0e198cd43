//! Webhook models for endpoint registration and risk-alert delivery.
//!
//! # Webhook Flow
//!
//! 1. Business registers a webhook endpoint via `POST /api/v1/webhooks`
//! 2. System generates a secret for HMAC signature verification
//! 3. When an uploaded dataset raises a risk, system sends a signed alert
//! 4. Business verifies signature using the secret

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::analysis::Analysis;

/// Event type of every alert sent by this service.
pub const RISK_ALERT_EVENT: &str = "analysis.risk_alert";

/// Webhook endpoint registered by a business.
///
/// The `secret` is stored in plaintext (required for HMAC generation)
/// but never returned in list operations.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct WebhookEndpoint {
    pub id: Uuid,
    pub api_key_id: Uuid,
    pub url: String,
    pub secret: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// Request to register a new webhook endpoint.
///
/// ```json
/// { "url": "https://example.com/sme-alerts" }
/// ```
#[derive(Debug, Deserialize)]
pub struct WebhookEndpointRequest {
    pub url: String,
}

/// Response when registering or listing webhook endpoints.
///
/// `secret` is only present in the registration response.
#[derive(Debug, Serialize)]
pub struct WebhookEndpointResponse {
    pub id: Uuid,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<WebhookEndpoint> for WebhookEndpointResponse {
    fn from(endpoint: WebhookEndpoint) -> Self {
        Self {
            id: endpoint.id,
            url: endpoint.url,
            secret: None,
            is_active: endpoint.is_active,
            created_at: endpoint.created_at,
        }
    }
}

impl WebhookEndpointResponse {
    /// Include the secret (registration response only).
    pub fn with_secret(mut self, secret: String) -> Self {
        self.secret = Some(secret);
        self
    }
}

/// Delivery attempt to be recorded in `webhook_events`.
#[derive(Debug, Clone)]
pub struct NewWebhookEvent {
    pub id: Uuid,
    pub webhook_endpoint_id: Uuid,
    pub analysis_id: Uuid,
    pub payload: serde_json::Value,
    /// `None` when the request never got a response
    pub response_status: Option<i32>,
    pub response_body: Option<String>,
}

/// JSON body POSTed to a webhook endpoint.
///
/// ```json
/// {
///   "event_type": "analysis.risk_alert",
///   "event_id": "550e8400-e29b-41d4-a716-446655440000",
///   "created_at": "2026-03-31T10:30:00Z",
///   "data": {
///     "analysis_id": "...",
///     "file_name": "march.csv",
///     "risk_flags": ["High expense ratio", "Negative cash flow"],
///     "financial_health_score": 10,
///     "status": "At Risk",
///     "credit_status": "High Risk"
///   }
/// }
/// ```
///
/// Sent with `X-Webhook-Signature: sha256=<hex>`, the HMAC-SHA256 of the
/// exact body under the endpoint secret.
#[derive(Debug, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub event_type: String,
    pub event_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub data: RiskAlertData,
}

/// Analysis fields carried by a risk alert.
#[derive(Debug, Serialize, Deserialize)]
pub struct RiskAlertData {
    pub analysis_id: Uuid,
    pub file_name: String,
    pub risk_flags: Vec<String>,
    pub financial_health_score: i32,
    pub status: String,
    pub credit_status: String,
}

impl From<&Analysis> for RiskAlertData {
    fn from(analysis: &Analysis) -> Self {
        Self {
            analysis_id: analysis.id,
            file_name: analysis.file_name.clone(),
            risk_flags: analysis.risk_flags.clone(),
            financial_health_score: analysis.financial_health_score,
            status: analysis.health_status.clone(),
            credit_status: analysis.credit_status.clone(),
        }
    }
}

impl WebhookPayload {
    /// Build a risk alert for a freshly stored analysis.
    pub fn risk_alert(event_id: Uuid, analysis: &Analysis) -> Self {
        Self {
            event_type: RISK_ALERT_EVENT.to_string(),
            event_id,
            created_at: Utc::now(),
            data: analysis.into(),
        }
    }
}
