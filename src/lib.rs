//! SME Financial Health Server
//!
//! A REST API that turns SME transaction CSVs into a cash-flow summary, a
//! financial health score, a credit rating, financing product suggestions
//! and plain-English insights.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx (async queries)
//! - **Authentication**: API key with SHA-256 hashing (stored analyses and webhooks only)
//! - **Format**: multipart CSV uploads, JSON everywhere else

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;

use std::time::Duration;

use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::Config, db::DbPool};

/// State shared with every handler.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    /// Per-delivery timeout for risk alerts
    pub webhook_timeout: Duration,
    /// Largest accepted request body, applied to uploads
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(pool: DbPool, config: &Config) -> Self {
        Self {
            pool,
            webhook_timeout: Duration::from_secs(config.webhook_timeout_secs),
            max_upload_bytes: config.max_upload_bytes,
        }
    }
}

impl FromRef<AppState> for DbPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

/// Build the HTTP router.
///
/// # Routes
///
/// Public (stateless, no authentication):
/// - `GET /`, `GET /health`
/// - `POST /upload`, `/ai-insights`, `/health-score`, `/creditworthiness`, `/product-recommendation`
///
/// Authenticated (`Authorization: Bearer <key>`):
/// - `POST|GET /api/v1/analyses`, `GET /api/v1/analyses/{id}`
/// - `POST|GET /api/v1/webhooks`, `DELETE /api/v1/webhooks/{id}`
pub fn build_router(state: AppState) -> Router {
    let authenticated_routes = Router::new()
        .route(
            "/api/v1/analyses",
            post(handlers::analyses::create_analysis).get(handlers::analyses::list_analyses),
        )
        .route(
            "/api/v1/analyses/{id}",
            get(handlers::analyses::get_analysis),
        )
        .route(
            "/api/v1/webhooks",
            post(handlers::webhooks::create_webhook).get(handlers::webhooks::list_webhooks),
        )
        .route(
            "/api/v1/webhooks/{id}",
            delete(handlers::webhooks::delete_webhook),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.pool.clone(),
            middleware::auth::auth_middleware,
        ));

    let max_upload_bytes = state.max_upload_bytes;

    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
        .route("/upload", post(handlers::upload::upload_file))
        .route("/ai-insights", post(handlers::assessment::ai_insights))
        .route("/health-score", post(handlers::assessment::health_score))
        .route(
            "/creditworthiness",
            post(handlers::assessment::creditworthiness),
        )
        .route(
            "/product-recommendation",
            post(handlers::assessment::product_recommendation),
        )
        .merge(authenticated_routes)
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
