//! API key authentication middleware.
//!
//! Every `/api/v1` request must carry `Authorization: Bearer <key>`. The key
//! is hashed, looked up among active keys, and the owning business is
//! attached to the request as an [`AuthContext`].

use crate::{
    db::DbPool,
    error::AppError,
    models::api_key::{ApiKey, hash_api_key},
};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

/// Business behind an authenticated request.
///
/// Handlers extract it with `Extension<AuthContext>` and scope every query
/// to `api_key_id`.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub api_key_id: Uuid,
    pub business_name: String,
}

/// Pull the bearer token out of an `Authorization` header value.
pub fn bearer_token(header_value: &str) -> Option<&str> {
    header_value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Authenticate a request by API key.
///
/// # Returns
///
/// - `Ok(Response)` from the next handler when the key is active
/// - `Err(AppError::InvalidApiKey)` (401) when the header is missing or the key is unknown
pub async fn auth_middleware(
    State(pool): State<DbPool>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let api_key = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(bearer_token)
        .ok_or(AppError::InvalidApiKey)?;

    let key_hash = hash_api_key(api_key);

    let api_key_record = sqlx::query_as::<_, ApiKey>(
        "SELECT id, key_hash, business_name, created_at, is_active
         FROM api_keys
         WHERE key_hash = $1 AND is_active = true",
    )
    .bind(&key_hash)
    .fetch_optional(&pool)
    .await?
    .ok_or_else(|| {
        tracing::warn!("Rejected request with unknown API key");
        AppError::InvalidApiKey
    })?;

    tracing::debug!(business = %api_key_record.business_name, "Authenticated request");

    request.extensions_mut().insert(AuthContext {
        api_key_id: api_key_record.id,
        business_name: api_key_record.business_name,
    });

    Ok(next.run(request).await)
}
