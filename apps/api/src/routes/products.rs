//! Product catalog administration.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use m4_core::money::Money;
use m4_core::validation::{validate_positive, validate_product_code, validate_product_name};
use m4_core::{Product, ValidationError};
use m4_db::NewProduct;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::routes::{ApiJson, IdPath};
use crate::AppState;

/// A catalog product as the frontend sees it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDto {
    pub id: i64,
    pub code: Option<String>,
    pub name: String,
    pub cash_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Product> for ProductDto {
    fn from(product: Product) -> Self {
        ProductDto {
            id: product.id,
            cash_price: product.cash_price().to_decimal(),
            code: product.code,
            name: product.name,
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Body of create and update; update replaces every field.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRequest {
    #[serde(alias = "codigo_produto")]
    pub code: Option<String>,
    #[serde(alias = "nome_produto")]
    pub name: Option<String>,
    #[serde(alias = "preco_venda_avista")]
    pub cash_price: Option<Decimal>,
}

impl ProductRequest {
    fn into_new_product(self) -> Result<NewProduct, ValidationError> {
        let name = self.name.ok_or_else(|| ValidationError::required("name"))?;
        let cash_price = self
            .cash_price
            .ok_or_else(|| ValidationError::required("cashPrice"))?;
        let cash_price = validate_positive("cashPrice", cash_price)?;

        // Sub-centavo prices round to zero
        let cash_price = Money::from_decimal(cash_price)
            .filter(|money| money.cents() > 0)
            .ok_or_else(|| ValidationError::MustBePositive {
                field: "cashPrice".to_string(),
            })?;

        Ok(NewProduct {
            code: validate_product_code(self.code.as_deref())?,
            name: validate_product_name(&name)?,
            cash_price,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
    pub message: String,
    pub product: ProductDto,
}

/// `GET /api/products`
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<ProductDto>>> {
    let products = state.db.products().list().await?;
    Ok(Json(products.into_iter().map(ProductDto::from).collect()))
}

/// `GET /api/products/{id}`
pub async fn get(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<Json<ProductDto>> {
    let product = state
        .db
        .products()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Product", &id.to_string()))?;

    Ok(Json(product.into()))
}

/// `POST /api/products`
pub async fn create(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<ProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductDto>)> {
    let new_product = body.into_new_product()?;
    let product = state.db.products().insert(&new_product).await?;

    info!(id = product.id, code = ?product.code, by = %user.email, "Product created");

    Ok((StatusCode::CREATED, Json(product.into())))
}

/// `PUT /api/products/{id}`
pub async fn update(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    ApiJson(body): ApiJson<ProductRequest>,
) -> ApiResult<Json<ProductDto>> {
    let changes = body.into_new_product()?;
    let product = state.db.products().update(id, &changes).await?;

    info!(id, cents = product.cash_price_cents, by = %user.email, "Product updated");

    Ok(Json(product.into()))
}

/// `DELETE /api/products/{id}`
pub async fn delete(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<Json<DeleteProductResponse>> {
    let product = state.db.products().delete(id).await?;

    info!(id, name = %product.name, by = %user.email, "Product deleted");

    Ok(Json(DeleteProductResponse {
        message: format!("Product '{}' deleted", product.name),
        product: product.into(),
    }))
}
