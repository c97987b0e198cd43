//! Data models: database rows and API request/response bodies.

/// Persisted analyses
pub mod analysis;
/// API key authentication model
pub mod api_key;
/// Scoring, credit, product and insight types
pub mod assessment;
/// CSV classification results and cash-flow summaries
pub mod dataset;
/// Webhook endpoints and risk-alert payloads
pub mod webhook;
