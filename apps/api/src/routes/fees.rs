//! Fee table administration.
//!
//! Reads are public (the public simulator needs them); writes require a
//! bearer token.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use m4_core::validation::{validate_fee_label, validate_installment_count, validate_percentage};
use m4_core::{Fee, ValidationError};
use m4_db::NewFee;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::routes::{ApiJson, IdPath};
use crate::AppState;

/// A fee as the frontend sees it.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeeDto {
    pub id: i64,
    pub label: String,
    pub fee_percent: Decimal,
    /// Effective count: stored value, or parsed from the label.
    pub installment_count: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Fee> for FeeDto {
    fn from(fee: Fee) -> Self {
        let record = fee.to_record();

        FeeDto {
            id: fee.id,
            fee_percent: record.fee_percent.value(),
            installment_count: record.installments(),
            label: fee.label,
            created_at: fee.created_at,
            updated_at: fee.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateFeeRequest {
    #[serde(alias = "parcela_tipo")]
    pub label: Option<String>,
    #[serde(alias = "taxa_percentual")]
    pub fee_percent: Option<Decimal>,
    pub installment_count: Option<i64>,
}

impl CreateFeeRequest {
    fn into_new_fee(self) -> Result<NewFee, ValidationError> {
        let label = self.label.ok_or_else(|| ValidationError::required("label"))?;
        let fee_percent = self
            .fee_percent
            .ok_or_else(|| ValidationError::required("feePercent"))?;

        Ok(NewFee {
            label: validate_fee_label(&label)?,
            fee_percent: validate_percentage("feePercent", fee_percent)?,
            installment_count: self
                .installment_count
                .map(validate_installment_count)
                .transpose()?,
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFeeRequest {
    #[serde(alias = "taxa_percentual")]
    pub fee_percent: Option<Decimal>,
    pub installment_count: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct DeleteFeeResponse {
    pub message: String,
    pub fee: FeeDto,
}

/// `GET /api/fees`
pub async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<FeeDto>>> {
    let fees = state.db.fees().list().await?;
    Ok(Json(fees.into_iter().map(FeeDto::from).collect()))
}

/// `GET /api/fees/{id}`
pub async fn get(
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<Json<FeeDto>> {
    let fee = state
        .db
        .fees()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Fee", &id.to_string()))?;

    Ok(Json(fee.into()))
}

/// `POST /api/fees`
pub async fn create(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    ApiJson(body): ApiJson<CreateFeeRequest>,
) -> ApiResult<(StatusCode, Json<FeeDto>)> {
    let new_fee = body.into_new_fee()?;
    let fee = state.db.fees().insert(&new_fee).await?;

    info!(id = fee.id, label = %fee.label, by = %user.email, "Fee created");

    Ok((StatusCode::CREATED, Json(fee.into())))
}

/// `PUT /api/fees/{id}`
pub async fn update(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
    ApiJson(body): ApiJson<UpdateFeeRequest>,
) -> ApiResult<Json<FeeDto>> {
    let fee_percent = body
        .fee_percent
        .ok_or_else(|| ValidationError::required("feePercent"))?;
    let fee_percent = validate_percentage("feePercent", fee_percent)?;
    let installment_count = body
        .installment_count
        .map(validate_installment_count)
        .transpose()?;

    let fee = state
        .db
        .fees()
        .update_rate(id, fee_percent, installment_count)
        .await?;

    info!(id, bps = fee.fee_bps, by = %user.email, "Fee updated");

    Ok(Json(fee.into()))
}

/// `DELETE /api/fees/{id}`
pub async fn delete(
    user: AuthUser,
    State(state): State<Arc<AppState>>,
    IdPath(id): IdPath,
) -> ApiResult<Json<DeleteFeeResponse>> {
    let fee = state.db.fees().delete(id).await?;

    info!(id, label = %fee.label, by = %user.email, "Fee deleted");

    Ok(Json(DeleteFeeResponse {
        message: format!("Fee '{}' deleted", fee.label),
        fee: fee.into(),
    }))
}
