//! HTTP API layer with Axum routes and middleware.
//!
//! This crate provides:
//! - REST API routes
//! - Authentication middleware
//! - The shared application state

pub mod middleware;
pub mod routes;

use axum::Router;
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use pesa_shared::JwtService;
use pesa_shared::config::RatesConfig;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// JWT service for token operations.
    pub jwt_service: Arc<JwtService>,
    /// Outbound client for the exchange-rate provider.
    pub rates: RatesClient,
}

/// HTTP client plus provider settings for fetching exchange rates.
#[derive(Clone)]
pub struct RatesClient {
    /// Reusable reqwest client.
    pub http: reqwest::Client,
    /// Provider endpoint and API key.
    pub config: RatesConfig,
}

impl RatesClient {
    /// Creates a client from the rates section of the app config.
    #[must_use]
    pub fn new(config: RatesConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

/// Creates the main application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
