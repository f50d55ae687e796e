//! Cost & sale price calculator endpoint.

use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;

use m4_core::validation::validate_percentage;
use m4_core::{
    compute_pricing, ExciseTax, MarginPolicy, PricingInput, PricingResult, SalePolicy,
    ValidationError,
};

use crate::error::ApiResult;
use crate::routes::ApiJson;

/// Flat request body of `POST /api/pricing/calculate`.
///
/// Every field is optional on the wire so a missing one is reported by
/// name. The Portuguese names of the legacy frontend are accepted too.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingRequest {
    #[serde(alias = "nomeProduto")]
    pub product_name: Option<String>,
    #[serde(alias = "precoCompra")]
    pub purchase_price: Option<Decimal>,
    #[serde(alias = "descontoFornecedorPercent")]
    pub supplier_discount_percent: Option<Decimal>,
    #[serde(alias = "ipiTipo")]
    pub excise_tax_type: Option<String>,
    #[serde(alias = "ipiValor")]
    pub excise_tax_value: Option<Decimal>,
    #[serde(alias = "frete")]
    pub freight: Option<Decimal>,
    #[serde(alias = "stateTaxDifferentialPercent")]
    pub difal_percent: Option<Decimal>,
    #[serde(alias = "impostoVendaPercent")]
    pub sale_tax_percent: Option<Decimal>,
    #[serde(alias = "margemLucroTipo")]
    pub margin_type: Option<String>,
    #[serde(alias = "margemLucroValor")]
    pub margin_value: Option<Decimal>,
}

fn required<T>(value: Option<T>, field: &str) -> Result<T, ValidationError> {
    value.ok_or_else(|| ValidationError::required(field))
}

impl PricingRequest {
    /// Validates the body into the calculator's input.
    pub fn into_input(self) -> Result<PricingInput, ValidationError> {
        let product_name = required(self.product_name, "productName")?;
        let purchase_price = required(self.purchase_price, "purchasePrice")?;
        let supplier_discount_percent = validate_percentage(
            "supplierDiscountPercent",
            required(self.supplier_discount_percent, "supplierDiscountPercent")?,
        )?;

        let excise_tax = ExciseTax::from_tag(
            &required(self.excise_tax_type, "exciseTaxType")?,
            required(self.excise_tax_value, "exciseTaxValue")?,
        )?;

        let freight = required(self.freight, "freight")?;
        let state_tax_differential_percent = validate_percentage(
            "difalPercent",
            required(self.difal_percent, "difalPercent")?,
        )?;

        let extended = self.sale_tax_percent.is_some()
            || self.margin_type.is_some()
            || self.margin_value.is_some();

        let sale = if extended {
            let sale_tax_percent = validate_percentage(
                "saleTaxPercent",
                required(self.sale_tax_percent, "saleTaxPercent")?,
            )?;
            let margin_policy = MarginPolicy::from_tag(
                &required(self.margin_type, "marginType")?,
                required(self.margin_value, "marginValue")?,
            )?;

            Some(SalePolicy {
                sale_tax_percent,
                margin_policy,
            })
        } else {
            None
        };

        Ok(PricingInput {
            product_name,
            purchase_price,
            supplier_discount_percent,
            excise_tax,
            freight,
            state_tax_differential_percent,
            sale,
        })
    }
}

/// `POST /api/pricing/calculate`
pub async fn calculate(
    ApiJson(body): ApiJson<PricingRequest>,
) -> ApiResult<Json<PricingResult>> {
    let input = body.into_input()?;
    let result = compute_pricing(&input)?;
    Ok(Json(result))
}
