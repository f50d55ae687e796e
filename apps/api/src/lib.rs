//! # M4 API
//!
//! HTTP server for the M4 pricing calculator and installment simulator.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            M4 API Server                                │
//! │                                                                         │
//! │  React frontend ───► axum (3000) ───► routes ───► m4-core (math)       │
//! │                          │                │                             │
//! │                    TraceLayer           m4-db ───► SQLite               │
//! │                    CorsLayer                                            │
//! │                                                                         │
//! │  Public:    /health, /api/auth/*, GET /api/fees, GET /api/products,     │
//! │             /api/pricing/calculate, /api/simulator/{catalog,quote}      │
//! │  Bearer:    fee and product writes, /api/simulator/internal             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `M4_BIND_ADDR` - Interface to bind (default: 0.0.0.0)
//! - `PORT` - HTTP port (default: 3000)
//! - `M4_DB_PATH` - SQLite file (default: m4.db)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_ACCESS_LIFETIME_SECS` - Access token lifetime (default: 86400)
//! - `M4_STORE_NAME` - Header of rendered quotes (default: M4 Tática)
//! - `CORS_ALLOW_ANY` - Allow any origin (default: true)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use m4_db::Database;

// Re-exports
pub use auth::{AuthUser, JwtManager};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};

/// Shared application state.
pub struct AppState {
    pub db: Database,
    pub jwt: JwtManager,
    pub config: ApiConfig,
}

impl AppState {
    /// Wires the token manager from the configuration.
    pub fn new(db: Database, config: ApiConfig) -> Self {
        let jwt = JwtManager::new(config.jwt_secret.clone(), config.jwt_access_lifetime_secs);

        AppState { db, jwt, config }
    }
}

/// Builds the full application router with tracing and CORS layers.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors_allow_any = state.config.cors_allow_any;

    let router = routes::router()
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors_allow_any {
        router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
    } else {
        router
    }
}
