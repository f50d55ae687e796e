//! Installment simulator endpoints.
//!
//! Every variant loads the fee table once per request and hands the
//! snapshot to the pure simulator, so all three agree to the centavo.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use m4_core::{simulate_installments, PaymentQuote, SimulationResult, ValidationError};

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::routes::fees::FeeDto;
use crate::routes::products::ProductDto;
use crate::routes::ApiJson;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimulationRequest {
    #[serde(alias = "precoVendaAvista")]
    pub cash_price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub products: Vec<ProductDto>,
    pub fees: Vec<FeeDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub product_name: Option<String>,
    pub cash_price: Option<Decimal>,
}

#[derive(Debug, Serialize)]
pub struct QuoteResponse {
    #[serde(flatten)]
    pub quote: PaymentQuote,
    /// Shareable plain-text rendering.
    pub text: String,
}

/// `POST /api/simulator/internal`
pub async fn internal(
    _user: AuthUser,
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<SimulationRequest>,
) -> ApiResult<Json<SimulationResult>> {
    let cash_price = body
        .cash_price
        .ok_or_else(|| ValidationError::required("cashPrice"))?;

    let fees = state.db.fees().snapshot().await?;
    let simulation = simulate_installments(cash_price, &fees)?;

    Ok(Json(simulation))
}

/// `GET /api/simulator/catalog`
///
/// Everything the public simulator page needs to price catalog products
/// client-side.
pub async fn catalog(State(state): State<Arc<AppState>>) -> ApiResult<Json<CatalogResponse>> {
    let products = state.db.products().list().await?;
    let fees = state.db.fees().list().await?;

    Ok(Json(CatalogResponse {
        products: products.into_iter().map(ProductDto::from).collect(),
        fees: fees.into_iter().map(FeeDto::from).collect(),
    }))
}

/// `POST /api/simulator/quote`
pub async fn quote(
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<QuoteRequest>,
) -> ApiResult<Json<QuoteResponse>> {
    let product_name = body
        .product_name
        .ok_or_else(|| ValidationError::required("productName"))?;
    let cash_price = body
        .cash_price
        .ok_or_else(|| ValidationError::required("cashPrice"))?;

    let fees = state.db.fees().snapshot().await?;
    let quote = PaymentQuote::build(&product_name, cash_price, &fees)?;
    let text = quote.render_text(&state.config.store_name);

    Ok(Json(QuoteResponse { quote, text }))
}
