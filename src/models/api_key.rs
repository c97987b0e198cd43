//! API keys issued to SME businesses.
//!
//! Only the SHA-256 digest of a key is stored; the raw key is shown to the
//! business once when it is provisioned.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Row of the `api_keys` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ApiKey {
    pub id: Uuid,

    /// Hex-encoded SHA-256 digest of the raw key (64 characters)
    pub key_hash: String,

    /// Business the key was issued to; owns every analysis and webhook created with it
    pub business_name: String,

    pub created_at: DateTime<Utc>,

    /// Revoked keys stay in the table with `is_active = false`
    pub is_active: bool,
}

/// Hash a raw API key the way it is stored in `api_keys.key_hash`.
pub fn hash_api_key(raw_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw_key.as_bytes());
    hex::encode(hasher.finalize())
}
