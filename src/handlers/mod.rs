//! HTTP request handlers (route handlers).

/// Stored analyses (authenticated)
pub mod analyses;
/// Stateless scoring endpoints
pub mod assessment;
/// Liveness endpoints
pub mod health;
/// CSV upload and multipart parsing
pub mod upload;
/// Webhook endpoint management (authenticated)
pub mod webhooks;
