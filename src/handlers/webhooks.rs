//! HTTP handlers for webhook endpoint management.
//!
//! Registered endpoints receive signed risk alerts when an uploaded dataset
//! raises a risk flag or scores as `At Risk`.

use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::db::DbPool;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;
use crate::models::webhook::{WebhookEndpointRequest, WebhookEndpointResponse};
use crate::services::webhook_service;

/// Register a new webhook endpoint.
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com/sme-alerts" }
/// ```
///
/// # Response (201 Created)
///
/// ```json
/// {
///   "id": "550e8400-e29b-41d4-a716-446655440000",
///   "url": "https://example.com/sme-alerts",
///   "secret": "a1b2c3d4e5f6...",
///   "is_active": true,
///   "created_at": "2026-03-31T10:30:00Z"
/// }
/// ```
///
/// The `secret` is only returned here.
pub async fn create_webhook(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Json(request): Json<WebhookEndpointRequest>,
) -> Result<impl IntoResponse, AppError> {
    let endpoint =
        webhook_service::create_webhook_endpoint(&pool, auth.api_key_id, request).await?;

    Ok((StatusCode::CREATED, Json(endpoint)))
}

/// List active webhook endpoints (secrets excluded).
pub async fn list_webhooks(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
) -> Result<Json<Vec<WebhookEndpointResponse>>, AppError> {
    let webhooks = webhook_service::list_webhook_endpoints(&pool, auth.api_key_id).await?;

    Ok(Json(webhooks))
}

/// Deactivate a webhook endpoint. Returns 204 No Content.
pub async fn delete_webhook(
    State(pool): State<DbPool>,
    Extension(auth): Extension<AuthContext>,
    Path(webhook_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    webhook_service::delete_webhook_endpoint(&pool, auth.api_key_id, webhook_id).await?;

    Ok(StatusCode::NO_CONTENT)
}
