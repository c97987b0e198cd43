//! Business logic services.
//!
//! Services hold the core logic separated from HTTP handlers: CSV ingestion,
//! the scoring rules, report persistence and risk-alert delivery.

pub mod analysis_service;
pub mod ingestion;
pub mod scoring;
pub mod webhook_service;
