//! # Domain Types
//!
//! Core domain types for M4 pricing.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                           Domain Types                                  │
//! │                                                                         │
//! │  Pricing (transient)          Installments (transient)                  │
//! │  ┌─────────────────┐          ┌──────────────────────┐                  │
//! │  │ PricingInput    │          │ FeeRecord            │ ◄── snapshot     │
//! │  │  ├ ExciseTax    │          │ InstallmentSimulation│                  │
//! │  │  └ SalePolicy   │          │ SimulationResult     │                  │
//! │  │     └ Margin    │          └──────────────────────┘                  │
//! │  │ PricingResult   │                                                    │
//! │  │  └ SaleBreakdown│          Persisted (m4-db rows)                    │
//! │  └─────────────────┘          ┌──────────────────────┐                  │
//! │                               │ Fee      (fee_bps)   │                  │
//! │  Percentage (0..=100)         │ Product  (cents)     │                  │
//! │                               └──────────────────────┘                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Storage vs Calculation
//! Persisted records keep the integer columns (`fee_bps`, `cash_price_cents`)
//! and expose `Decimal` accessors. Transient types carry `Decimal` directly.

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::installments::parse_installment_count;
use crate::money::Money;
use crate::validation::ValidationResult;

// =============================================================================
// Percentage
// =============================================================================

/// A percentage between 0 and 100 inclusive.
///
/// Only [`crate::validation::validate_percentage`] and [`Percentage::from_bps`]
/// construct one, so every value in circulation is in range.
///
/// ## Basis Points
/// Fee rates are persisted in basis points: 1 bps = 0.01%, 592 bps = 5.92%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Percentage(Decimal);

impl Percentage {
    /// Zero percent.
    pub const ZERO: Percentage = Percentage(Decimal::ZERO);

    /// One hundred percent.
    pub const HUNDRED: Percentage = Percentage(Decimal::ONE_HUNDRED);

    /// Wraps an already range-checked value.
    #[inline]
    pub(crate) const fn new_unchecked(value: Decimal) -> Self {
        Percentage(value)
    }

    /// Creates a percentage from basis points.
    ///
    /// Returns `None` above 10000 bps (100%).
    ///
    /// ## Example
    /// ```rust
    /// use m4_core::Percentage;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Percentage::from_bps(592).unwrap().value(), dec!(5.92));
    /// assert!(Percentage::from_bps(10001).is_none());
    /// ```
    pub fn from_bps(bps: u32) -> Option<Self> {
        if bps > 10_000 {
            return None;
        }
        Some(Percentage(Decimal::new(i64::from(bps), 2)))
    }

    /// Returns the rate in basis points, rounded to the nearest bps.
    pub fn bps(&self) -> u32 {
        (self.0 * Decimal::ONE_HUNDRED).round().to_u32().unwrap_or(0)
    }

    /// Returns the percentage value (5.92 for 5.92%).
    #[inline]
    pub const fn value(&self) -> Decimal {
        self.0
    }

    /// Returns the fraction (0.0592 for 5.92%).
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0 / Decimal::ONE_HUNDRED
    }

    /// Returns `1 − fraction`, the denominator of every gross-up formula.
    #[inline]
    pub fn complement(&self) -> Decimal {
        Decimal::ONE - self.fraction()
    }

    /// Returns `amount / (1 − fraction)`.
    ///
    /// `None` at exactly 100%, or when the rate is so close to 100% that the
    /// quotient does not fit in a Decimal.
    ///
    /// ## Example
    /// ```rust
    /// use m4_core::Percentage;
    /// use rust_decimal_macros::dec;
    ///
    /// let fee = Percentage::from_bps(592).unwrap();
    /// assert_eq!(fee.gross_up(dec!(940.8)), Some(dec!(1000)));
    /// assert_eq!(Percentage::HUNDRED.gross_up(dec!(1)), None);
    /// ```
    pub fn gross_up(&self, amount: Decimal) -> Option<Decimal> {
        amount.checked_div(self.complement())
    }

    /// Checks if the percentage is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Checks if the percentage is exactly 100.
    #[inline]
    pub fn is_hundred(&self) -> bool {
        self.0 == Decimal::ONE_HUNDRED
    }
}

impl Default for Percentage {
    fn default() -> Self {
        Percentage::ZERO
    }
}

// =============================================================================
// Excise Tax (IPI)
// =============================================================================

/// How the excise tax (IPI) is expressed.
///
/// ## Wire Tags
/// | Variant       | Tags                        |
/// |---------------|-----------------------------|
/// | `Percent`     | `percentual`, `percent`     |
/// | `FixedAmount` | `reais`, `fixed_amount`     |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExciseTax {
    /// Rate already included in the discounted price.
    Percent(Decimal),
    /// Fixed amount in reais.
    FixedAmount(Decimal),
}

impl ExciseTax {
    /// Accepted wire tags, in display order.
    pub const TAGS: [&'static str; 4] = ["percentual", "reais", "percent", "fixed_amount"];

    /// Builds the variant from its wire tag.
    ///
    /// ## Example
    /// ```rust
    /// use m4_core::ExciseTax;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(ExciseTax::from_tag("reais", dec!(40)).unwrap(), ExciseTax::FixedAmount(dec!(40)));
    /// assert!(ExciseTax::from_tag("dollars", dec!(40)).is_err());
    /// ```
    pub fn from_tag(tag: &str, value: Decimal) -> ValidationResult<Self> {
        match tag.trim() {
            "percentual" | "percent" => Ok(ExciseTax::Percent(value)),
            "reais" | "fixed_amount" => Ok(ExciseTax::FixedAmount(value)),
            _ => Err(ValidationError::NotAllowed {
                field: "exciseTaxType".to_string(),
                allowed: Self::TAGS.iter().map(|t| t.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Margin Policy
// =============================================================================

/// How the final sale price is derived from the pre-tax price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarginPolicy {
    /// Margin over the final price, 0..=100 (`final = pre_tax / (1 − m/100)`).
    PercentMargin(Decimal),
    /// Absolute profit in reais added on top of the pre-tax price.
    TargetProfit(Decimal),
    /// The final price itself; profit is whatever remains.
    FinalPrice(Decimal),
}

impl MarginPolicy {
    /// Accepted wire tags.
    pub const TAGS: [&'static str; 3] = ["percentual", "lucro_alvo", "preco_final"];

    /// Builds the variant from its wire tag.
    pub fn from_tag(tag: &str, value: Decimal) -> ValidationResult<Self> {
        match tag.trim() {
            "percentual" => Ok(MarginPolicy::PercentMargin(value)),
            "lucro_alvo" => Ok(MarginPolicy::TargetProfit(value)),
            "preco_final" => Ok(MarginPolicy::FinalPrice(value)),
            _ => Err(ValidationError::NotAllowed {
                field: "marginType".to_string(),
                allowed: Self::TAGS.iter().map(|t| t.to_string()).collect(),
            }),
        }
    }
}

/// Sale-side parameters of the extended pricing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalePolicy {
    pub sale_tax_percent: Percentage,
    pub margin_policy: MarginPolicy,
}

// =============================================================================
// Pricing Input / Result
// =============================================================================

/// Everything needed to price a product.
///
/// Built once at the API boundary; the calculator never sees raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct PricingInput {
    pub product_name: String,
    pub purchase_price: Decimal,
    pub supplier_discount_percent: Percentage,
    pub excise_tax: ExciseTax,
    pub freight: Decimal,
    pub state_tax_differential_percent: Percentage,
    /// `Some` switches on the extended (sale price) mode.
    pub sale: Option<SalePolicy>,
}

/// Cost breakdown of a product, monetary fields rounded to 2 dp.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PricingResult {
    pub product_name: String,
    /// Passed through exactly as received.
    #[ts(type = "number")]
    pub purchase_price: Decimal,
    #[ts(type = "number")]
    pub discounted_price: Decimal,
    #[ts(type = "number")]
    pub excise_amount: Decimal,
    #[ts(type = "number")]
    pub difal_base: Decimal,
    #[ts(type = "number")]
    pub difal_amount: Decimal,
    #[ts(type = "number")]
    pub total_cost: Decimal,
    /// Present only in extended mode.
    pub sale: Option<SaleBreakdown>,
}

/// Sale price derivation of the extended mode.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SaleBreakdown {
    #[ts(type = "number")]
    pub pre_tax_sale_price: Decimal,
    /// `pre_tax_sale_price − total_cost`.
    #[ts(type = "number")]
    pub sale_tax_amount: Decimal,
    #[ts(type = "number")]
    pub final_sale_price: Decimal,
    #[ts(type = "number")]
    pub profit: Decimal,
    #[ts(type = "number")]
    pub margin_percent: Decimal,
}

// =============================================================================
// Fee Record
// =============================================================================

/// One entry of the installment fee table, as the simulator sees it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct FeeRecord {
    /// Payment option label: `Pix`, `Débito`, `1x` … `12x`.
    pub label: String,
    #[ts(type = "number")]
    pub fee_percent: Percentage,
    /// Stored count; `None` for legacy rows.
    pub installment_count: Option<u32>,
}

impl FeeRecord {
    /// Creates a record whose count is derived from the label.
    pub fn new(label: impl Into<String>, fee_percent: Percentage) -> Self {
        FeeRecord {
            label: label.into(),
            fee_percent,
            installment_count: None,
        }
    }

    /// Sets an explicit installment count.
    pub fn with_installment_count(mut self, count: u32) -> Self {
        self.installment_count = Some(count);
        self
    }

    /// Number of installments: the stored count, else parsed from the label.
    ///
    /// A stored count of zero is treated like a missing one.
    pub fn installments(&self) -> u32 {
        match self.installment_count {
            Some(count) if count > 0 => count,
            _ => parse_installment_count(&self.label),
        }
    }
}

// =============================================================================
// Simulation Results
// =============================================================================

/// Simulated price for one payment option.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct InstallmentSimulation {
    pub label: String,
    #[ts(type = "number")]
    pub fee_percent: Percentage,
    #[ts(type = "number")]
    pub total_financed_price: Decimal,
    pub installment_count: u32,
    #[ts(type = "number")]
    pub per_installment_amount: Decimal,
}

/// Simulation of every payment option for one cash price.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SimulationResult {
    #[ts(type = "number")]
    pub cash_price: Decimal,
    /// Same order as the fee table.
    pub results: Vec<InstallmentSimulation>,
}

// =============================================================================
// Persisted Records
// =============================================================================

/// A row of the fee table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Fee {
    pub id: i64,
    pub label: String,
    /// Rate in basis points (592 = 5.92%).
    pub fee_bps: u32,
    pub installment_count: Option<u32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Fee {
    /// Returns the rate as a percentage.
    ///
    /// The schema caps `fee_bps` at 10000, so out-of-range rows saturate.
    pub fn fee_percent(&self) -> Percentage {
        Percentage::from_bps(self.fee_bps).unwrap_or(Percentage::HUNDRED)
    }

    /// Converts the row into the simulator's view.
    pub fn to_record(&self) -> FeeRecord {
        FeeRecord {
            label: self.label.clone(),
            fee_percent: self.fee_percent(),
            installment_count: self.installment_count,
        }
    }
}

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    /// Supplier code (e.g., `TAU0001`), unique when present.
    pub code: Option<String>,
    pub name: String,
    pub cash_price_cents: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the cash price as a Money type.
    #[inline]
    pub fn cash_price(&self) -> Money {
        Money::from_cents(self.cash_price_cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_percentage_bps_conversion() {
        let rate = Percentage::from_bps(592).unwrap();
        assert_eq!(rate.value(), dec!(5.92));
        assert_eq!(rate.bps(), 592);
        assert_eq!(rate.fraction(), dec!(0.0592));
        assert_eq!(rate.complement(), dec!(0.9408));

        assert_eq!(Percentage::from_bps(0), Some(Percentage::ZERO));
        assert!(Percentage::from_bps(10_000).unwrap().is_hundred());
        assert_eq!(Percentage::new_unchecked(dec!(5.925)).bps(), 593);
    }

    #[test]
    fn test_gross_up_overflow_is_none() {
        let almost_all = Percentage::new_unchecked(dec!(99.99999999999999));
        assert_eq!(almost_all.complement(), dec!(0.0000000000000001));

        assert!(almost_all.gross_up(dec!(1000)).is_some());
        assert_eq!(almost_all.gross_up(Decimal::MAX), None);
        assert_eq!(Percentage::HUNDRED.gross_up(dec!(1000)), None);
        assert_eq!(Percentage::ZERO.gross_up(dec!(1000)), Some(dec!(1000)));
    }

    #[test]
    fn test_percentage_serializes_as_number() {
        let json = serde_json::to_string(&Percentage::new_unchecked(dec!(13.35))).unwrap();
        assert_eq!(json, "13.35");
    }

    #[test]
    fn test_excise_tags() {
        assert_eq!(
            ExciseTax::from_tag("percentual", dec!(10)).unwrap(),
            ExciseTax::Percent(dec!(10))
        );
        assert_eq!(
            ExciseTax::from_tag("percent", dec!(10)).unwrap(),
            ExciseTax::Percent(dec!(10))
        );
        assert_eq!(
            ExciseTax::from_tag("fixed_amount", dec!(7)).unwrap(),
            ExciseTax::FixedAmount(dec!(7))
        );
        assert!(matches!(
            ExciseTax::from_tag("", dec!(1)),
            Err(ValidationError::NotAllowed { .. })
        ));
    }

    #[test]
    fn test_margin_tags() {
        assert_eq!(
            MarginPolicy::from_tag("lucro_alvo", dec!(500)).unwrap(),
            MarginPolicy::TargetProfit(dec!(500))
        );
        assert_eq!(
            MarginPolicy::from_tag("preco_final", dec!(2000)).unwrap(),
            MarginPolicy::FinalPrice(dec!(2000))
        );
        assert!(MarginPolicy::from_tag("percent", dec!(1)).is_err());
    }

    #[test]
    fn test_fee_record_installments() {
        let pix = FeeRecord::new("Pix", Percentage::ZERO);
        assert_eq!(pix.installments(), 1);

        let legacy = FeeRecord::new("12x", Percentage::from_bps(1335).unwrap());
        assert_eq!(legacy.installments(), 12);

        let explicit = FeeRecord::new("Parcelado especial", Percentage::ZERO).with_installment_count(4);
        assert_eq!(explicit.installments(), 4);

        let zero = FeeRecord::new("6x", Percentage::ZERO).with_installment_count(0);
        assert_eq!(zero.installments(), 6);
    }

    #[test]
    fn test_fee_record_json_shape() {
        let record = FeeRecord::new("3x", Percentage::from_bps(592).unwrap()).with_installment_count(3);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["label"], "3x");
        assert_eq!(json["feePercent"], 5.92);
        assert_eq!(json["installmentCount"], 3);
    }

    #[test]
    fn test_product_cash_price() {
        let now = Utc::now();
        let product = Product {
            id: 1,
            code: Some("TAU0001".to_string()),
            name: "Pistola Taurus G2C .38TPC".to_string(),
            cash_price_cents: 535000,
            created_at: now,
            updated_at: now,
        };
        assert_eq!(product.cash_price().to_decimal(), dec!(5350));
    }
}
