//! # HTTP Routes
//!
//! Route table and the request extractors shared by every handler.
//!
//! ## Route Table
//! ```text
//! ┌───────────────────────────────────────────────────────────────────────┐
//! │  GET    /health                      health::check                    │
//! │  POST   /api/auth/register           auth::register                   │
//! │  POST   /api/auth/login              auth::login                      │
//! │  GET    /api/fees                    fees::list                       │
//! │  POST   /api/fees                    fees::create         (bearer)    │
//! │  GET    /api/fees/{id}               fees::get                        │
//! │  PUT    /api/fees/{id}               fees::update         (bearer)    │
//! │  DELETE /api/fees/{id}               fees::delete         (bearer)    │
//! │  GET    /api/products                products::list                   │
//! │  POST   /api/products                products::create     (bearer)    │
//! │  GET    /api/products/{id}           products::get                    │
//! │  PUT    /api/products/{id}           products::update     (bearer)    │
//! │  DELETE /api/products/{id}           products::delete     (bearer)    │
//! │  POST   /api/pricing/calculate       pricing::calculate               │
//! │  POST   /api/simulator/internal      simulator::internal  (bearer)    │
//! │  GET    /api/simulator/catalog       simulator::catalog               │
//! │  POST   /api/simulator/quote         simulator::quote                 │
//! └───────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod fees;
pub mod health;
pub mod pricing;
pub mod products;
pub mod simulator;

use std::sync::Arc;

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::AppState;

/// Builds the route table; state is attached by the caller.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health::check))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/fees", get(fees::list).post(fees::create))
        .route(
            "/api/fees/{id}",
            get(fees::get).put(fees::update).delete(fees::delete),
        )
        .route("/api/products", get(products::list).post(products::create))
        .route(
            "/api/products/{id}",
            get(products::get).put(products::update).delete(products::delete),
        )
        .route("/api/pricing/calculate", post(pricing::calculate))
        .route("/api/simulator/internal", post(simulator::internal))
        .route("/api/simulator/catalog", get(simulator::catalog))
        .route("/api/simulator/quote", post(simulator::quote))
}

// =============================================================================
// Extractors
// =============================================================================

/// JSON body whose rejections use the API error format.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        Ok(ApiJson(value))
    }
}

/// Numeric `{id}` path segment whose rejections use the API error format.
pub struct IdPath(pub i64);

impl<S> FromRequestParts<S> for IdPath
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state).await?;
        Ok(IdPath(id))
    }
}

// =============================================================================
// Test Helpers
// =============================================================================
