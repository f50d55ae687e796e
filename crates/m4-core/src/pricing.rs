//! # Pricing Module
//!
//! Landed cost and sale price of a product.
//!
//! ## Calculation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Cost & Sale Price Pipeline                         │
//! │                                                                         │
//! │  purchase_price                                                         │
//! │     │  × (1 − discount/100)                                             │
//! │     ▼                                                                   │
//! │  discounted ──► excise (IPI)                                            │
//! │     │             Percent(v):     discounted − discounted / (1 + v/100) │
//! │     │             FixedAmount(v): v                                     │
//! │     ▼                                                                   │
//! │  difal_base   = discounted + freight − excise                           │
//! │  difal_amount = difal_base × difal/100                                  │
//! │  total_cost   = discounted + freight + difal_amount                     │
//! │     │                                                                   │
//! │     │  (extended mode only)                                             │
//! │     ▼                                                                   │
//! │  pre_tax      = total_cost / (1 − sale_tax/100)                         │
//! │     │                                                                   │
//! │     ├── PercentMargin(m): final = pre_tax / (1 − m/100)                 │
//! │     ├── TargetProfit(p):  final = pre_tax + p                           │
//! │     └── FinalPrice(f):    final = f                                     │
//! │                                                                         │
//! │  All steps run at full Decimal precision; rounding happens once, when  │
//! │  the PricingResult is assembled.                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Percent Excise
//! The discounted price already contains the IPI, so the amount is backed out
//! of it (`price − price / (1 + rate)`) rather than multiplied on top.
//!
//! ## Example
//! ```rust
//! use m4_core::pricing::compute_pricing;
//! use m4_core::validation::validate_percentage;
//! use m4_core::{ExciseTax, PricingInput};
//! use rust_decimal_macros::dec;
//!
//! let input = PricingInput {
//!     product_name: "Pistola".to_string(),
//!     purchase_price: dec!(1000),
//!     supplier_discount_percent: validate_percentage("discount", dec!(10)).unwrap(),
//!     excise_tax: ExciseTax::Percent(dec!(10)),
//!     freight: dec!(50),
//!     state_tax_differential_percent: validate_percentage("difal", dec!(18)).unwrap(),
//!     sale: None,
//! };
//!
//! let result = compute_pricing(&input).unwrap();
//! assert_eq!(result.total_cost, dec!(1106.27));
//! ```

use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};
use crate::money::round_money;
use crate::types::{
    ExciseTax, MarginPolicy, PricingInput, PricingResult, SaleBreakdown, SalePolicy,
};
use crate::validation::{validate_non_negative, validate_percentage, validate_product_name};

/// Computes the cost breakdown and, in extended mode, the sale price.
///
/// ## Errors
/// - [`ValidationError`](crate::ValidationError) for a blank name, negative amounts or a margin
///   percentage outside `0..=100`
/// - [`CoreError::ArithmeticDegenerate`] when sale tax or margin is 100%, or
///   so close to it that the price overflows a Decimal, or when a margin must
///   be derived from a zero final price
///
/// Either a complete result or an error; never a partial breakdown.
pub fn compute_pricing(input: &PricingInput) -> CoreResult<PricingResult> {
    let product_name = validate_product_name(&input.product_name)?;
    let purchase_price = validate_non_negative("purchasePrice", input.purchase_price)?;
    let freight = validate_non_negative("freight", input.freight)?;

    let discounted = purchase_price * input.supplier_discount_percent.complement();
    let excise = excise_amount(discounted, input.excise_tax)?;
    let difal_base = discounted + freight - excise;
    let difal_amount = difal_base * input.state_tax_differential_percent.fraction();
    let total_cost = discounted + freight + difal_amount;

    let sale = match &input.sale {
        Some(policy) => Some(compute_sale(total_cost, policy)?),
        None => None,
    };

    Ok(PricingResult {
        product_name,
        purchase_price,
        discounted_price: round_money(discounted),
        excise_amount: round_money(excise),
        difal_base: round_money(difal_base),
        difal_amount: round_money(difal_amount),
        total_cost: round_money(total_cost),
        sale,
    })
}

/// Excise amount contained in the discounted price.
fn excise_amount(discounted: Decimal, excise: ExciseTax) -> CoreResult<Decimal> {
    match excise {
        ExciseTax::FixedAmount(value) => Ok(validate_non_negative("exciseTaxValue", value)?),
        ExciseTax::Percent(rate) => {
            let rate = validate_non_negative("exciseTaxValue", rate)?;
            let divisor = Decimal::ONE + rate / Decimal::ONE_HUNDRED;
            let net = discounted.checked_div(divisor).ok_or_else(|| {
                CoreError::degenerate("excise amount", "the excise rate is out of range")
            })?;
            Ok(discounted - net)
        }
    }
}

/// Sale-side breakdown, still unrounded until the final struct.
fn compute_sale(total_cost: Decimal, policy: &SalePolicy) -> CoreResult<SaleBreakdown> {
    let pre_tax = policy.sale_tax_percent.gross_up(total_cost).ok_or_else(|| {
        CoreError::degenerate(
            "pre-tax sale price",
            if policy.sale_tax_percent.is_hundred() {
                "a sale tax of 100% leaves no room for the cost"
            } else {
                "the sale tax is too close to 100% for a finite price"
            },
        )
    })?;

    let (final_price, profit, margin) = match policy.margin_policy {
        MarginPolicy::PercentMargin(margin) => {
            let margin = validate_percentage("marginValue", margin)?;
            let final_price = margin.gross_up(pre_tax).ok_or_else(|| {
                CoreError::degenerate(
                    "final sale price",
                    if margin.is_hundred() {
                        "a margin of 100% has no finite price"
                    } else {
                        "the margin is too close to 100% for a finite price"
                    },
                )
            })?;
            (final_price, final_price - total_cost, margin.value())
        }
        MarginPolicy::TargetProfit(profit) => {
            let profit = validate_non_negative("marginValue", profit)?;
            let final_price = pre_tax.checked_add(profit).ok_or_else(|| {
                CoreError::degenerate("final sale price", "the price is out of range")
            })?;
            (final_price, profit, margin_over(profit, final_price)?)
        }
        MarginPolicy::FinalPrice(final_price) => {
            let final_price = validate_non_negative("marginValue", final_price)?;
            let profit = final_price - pre_tax;
            (final_price, profit, margin_over(profit, final_price)?)
        }
    };

    Ok(SaleBreakdown {
        pre_tax_sale_price: round_money(pre_tax),
        sale_tax_amount: round_money(pre_tax - total_cost),
        final_sale_price: round_money(final_price),
        profit: round_money(profit),
        margin_percent: round_money(margin),
    })
}

/// `profit / final × 100`, rejecting a zero final price.
fn margin_over(profit: Decimal, final_price: Decimal) -> CoreResult<Decimal> {
    if final_price.is_zero() {
        return Err(CoreError::degenerate(
            "margin percentage",
            "the final sale price is zero",
        ));
    }
    profit
        .checked_div(final_price)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .ok_or_else(|| CoreError::degenerate("margin percentage", "the ratio is out of range"))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::types::Percentage;
    use rust_decimal_macros::dec;

    fn pct(value: Decimal) -> Percentage {
        validate_percentage("test", value).unwrap()
    }

    fn base_input() -> PricingInput {
        PricingInput {
            product_name: "Pistola Taurus G2C .38TPC".to_string(),
            purchase_price: dec!(1000),
            supplier_discount_percent: pct(dec!(10)),
            excise_tax: ExciseTax::Percent(dec!(10)),
            freight: dec!(50),
            state_tax_differential_percent: pct(dec!(18)),
            sale: None,
        }
    }

    fn with_sale(sale_tax: Decimal, margin_policy: MarginPolicy) -> PricingInput {
        PricingInput {
            sale: Some(SalePolicy {
                sale_tax_percent: pct(sale_tax),
                margin_policy,
            }),
            ..base_input()
        }
    }

    #[test]
    fn test_cost_breakdown() {
        let result = compute_pricing(&base_input()).unwrap();

        assert_eq!(result.purchase_price, dec!(1000));
        assert_eq!(result.discounted_price, dec!(900.00));
        assert_eq!(result.excise_amount, dec!(81.82));
        assert_eq!(result.difal_base, dec!(868.18));
        assert_eq!(result.difal_amount, dec!(156.27));
        assert_eq!(result.total_cost, dec!(1106.27));
        assert!(result.sale.is_none());
    }

    #[test]
    fn test_fixed_excise() {
        let input = PricingInput {
            excise_tax: ExciseTax::FixedAmount(dec!(40)),
            ..base_input()
        };
        let result = compute_pricing(&input).unwrap();

        assert_eq!(result.excise_amount, dec!(40));
        assert_eq!(result.difal_base, dec!(910.00));
        assert_eq!(result.difal_amount, dec!(163.80));
        assert_eq!(result.total_cost, dec!(1113.80));
    }

    #[test]
    fn test_percent_excise_is_backed_out_of_price() {
        let input = PricingInput {
            supplier_discount_percent: Percentage::ZERO,
            excise_tax: ExciseTax::Percent(dec!(25)),
            purchase_price: dec!(125),
            ..base_input()
        };
        let result = compute_pricing(&input).unwrap();

        // 125 includes 25% IPI over a 100 base
        assert_eq!(result.excise_amount, dec!(25));
        assert_eq!(result.discounted_price - result.excise_amount, dec!(100));
    }

    #[test]
    fn test_difal_never_decreases_cost() {
        for difal in [dec!(0), dec!(4), dec!(12), dec!(18), dec!(100)] {
            let input = PricingInput {
                state_tax_differential_percent: pct(difal),
                ..base_input()
            };
            let result = compute_pricing(&input).unwrap();
            assert!(result.total_cost >= result.discounted_price + dec!(50));
        }

        let zero = PricingInput {
            state_tax_differential_percent: Percentage::ZERO,
            ..base_input()
        };
        let result = compute_pricing(&zero).unwrap();
        assert_eq!(result.difal_amount, dec!(0));
        assert_eq!(result.total_cost, dec!(950));
    }

    #[test]
    fn test_full_discount() {
        let input = PricingInput {
            supplier_discount_percent: Percentage::HUNDRED,
            ..base_input()
        };
        let result = compute_pricing(&input).unwrap();

        assert_eq!(result.discounted_price, dec!(0));
        assert_eq!(result.excise_amount, dec!(0));
        assert_eq!(result.difal_base, dec!(50));
        assert_eq!(result.difal_amount, dec!(9));
        assert_eq!(result.total_cost, dec!(59));
    }

    #[test]
    fn test_percent_margin() {
        let result = compute_pricing(&with_sale(dec!(10), MarginPolicy::PercentMargin(dec!(20)))).unwrap();
        let sale = result.sale.unwrap();

        assert_eq!(sale.pre_tax_sale_price, dec!(1229.19));
        assert_eq!(sale.sale_tax_amount, dec!(122.92));
        assert_eq!(sale.final_sale_price, dec!(1536.49));
        assert_eq!(sale.profit, dec!(430.22));
        assert_eq!(sale.margin_percent, dec!(20));
    }

    #[test]
    fn test_zero_margin_keeps_pre_tax_price() {
        let result = compute_pricing(&with_sale(dec!(10), MarginPolicy::PercentMargin(dec!(0)))).unwrap();
        let sale = result.sale.unwrap();

        assert_eq!(sale.final_sale_price, sale.pre_tax_sale_price);
        assert_eq!(sale.margin_percent, dec!(0));
    }

    #[test]
    fn test_target_profit() {
        let result = compute_pricing(&with_sale(dec!(10), MarginPolicy::TargetProfit(dec!(500)))).unwrap();
        let sale = result.sale.unwrap();

        assert_eq!(sale.final_sale_price, dec!(1729.19));
        assert_eq!(sale.profit, dec!(500));
        assert_eq!(sale.margin_percent, dec!(28.92));
    }

    #[test]
    fn test_final_price() {
        let result = compute_pricing(&with_sale(dec!(10), MarginPolicy::FinalPrice(dec!(2000)))).unwrap();
        let sale = result.sale.unwrap();

        assert_eq!(sale.final_sale_price, dec!(2000));
        assert_eq!(sale.profit, dec!(770.81));
        assert_eq!(sale.margin_percent, dec!(38.54));
    }

    #[test]
    fn test_degenerate_denominators_are_rejected() {
        let err = compute_pricing(&with_sale(dec!(100), MarginPolicy::PercentMargin(dec!(20)))).unwrap_err();
        assert!(matches!(err, CoreError::ArithmeticDegenerate { .. }));

        let err = compute_pricing(&with_sale(dec!(10), MarginPolicy::PercentMargin(dec!(100)))).unwrap_err();
        assert!(matches!(err, CoreError::ArithmeticDegenerate { .. }));

        let err = compute_pricing(&with_sale(dec!(10), MarginPolicy::FinalPrice(dec!(0)))).unwrap_err();
        assert!(matches!(err, CoreError::ArithmeticDegenerate { .. }));
    }

    #[test]
    fn test_rates_just_below_hundred_do_not_overflow() {
        let almost = dec!(99.99999999999999);

        let err = compute_pricing(&with_sale(almost, MarginPolicy::PercentMargin(almost))).unwrap_err();
        assert!(matches!(err, CoreError::ArithmeticDegenerate { .. }));

        // Finite, even if absurd
        let result = compute_pricing(&with_sale(almost, MarginPolicy::PercentMargin(dec!(0)))).unwrap();
        let sale = result.sale.unwrap();
        assert_eq!(sale.final_sale_price, sale.pre_tax_sale_price);
    }

    #[test]
    fn test_max_amounts_with_extreme_rates() {
        let max = Decimal::from(crate::MAX_AMOUNT);
        let huge = |sale_tax: Decimal, margin_policy: MarginPolicy| PricingInput {
            purchase_price: max,
            supplier_discount_percent: Percentage::ZERO,
            excise_tax: ExciseTax::FixedAmount(dec!(0)),
            freight: max,
            state_tax_differential_percent: Percentage::HUNDRED,
            ..with_sale(sale_tax, margin_policy)
        };

        let result = compute_pricing(&huge(dec!(99.99), MarginPolicy::PercentMargin(dec!(99.99)))).unwrap();
        assert_eq!(result.total_cost, max * dec!(4));
        let sale = result.sale.unwrap();
        assert!(sale.final_sale_price > sale.pre_tax_sale_price);

        // total_cost / 1e-17 no longer fits in a Decimal
        let err = compute_pricing(&huge(
            dec!(99.999999999999999),
            MarginPolicy::PercentMargin(dec!(0)),
        ))
        .unwrap_err();
        assert!(matches!(err, CoreError::ArithmeticDegenerate { .. }));

        // profit / final overflows when the final price is tiny
        let err = compute_pricing(&huge(
            dec!(99.99999999999999),
            MarginPolicy::FinalPrice(dec!(0.01)),
        ))
        .unwrap_err();
        assert!(matches!(err, CoreError::ArithmeticDegenerate { .. }));

        let result = compute_pricing(&huge(
            dec!(99.99999999999999),
            MarginPolicy::TargetProfit(max),
        ))
        .unwrap();
        assert_eq!(result.sale.unwrap().profit, max);
    }

    #[test]
    fn test_zero_cost_with_target_profit_of_zero_is_degenerate() {
        let input = PricingInput {
            purchase_price: dec!(0),
            freight: dec!(0),
            ..with_sale(dec!(0), MarginPolicy::TargetProfit(dec!(0)))
        };
        let err = compute_pricing(&input).unwrap_err();
        assert!(matches!(err, CoreError::ArithmeticDegenerate { .. }));
    }

    #[test]
    fn test_invalid_inputs() {
        let blank = PricingInput {
            product_name: "   ".to_string(),
            ..base_input()
        };
        assert!(matches!(
            compute_pricing(&blank),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));

        let negative = PricingInput {
            freight: dec!(-1),
            ..base_input()
        };
        assert!(matches!(
            compute_pricing(&negative),
            Err(CoreError::Validation(ValidationError::MustNotBeNegative { .. }))
        ));

        let negative_excise = PricingInput {
            excise_tax: ExciseTax::Percent(dec!(-5)),
            ..base_input()
        };
        assert!(compute_pricing(&negative_excise).is_err());

        let margin_out_of_range = with_sale(dec!(10), MarginPolicy::PercentMargin(dec!(120)));
        assert!(matches!(
            compute_pricing(&margin_out_of_range),
            Err(CoreError::Validation(ValidationError::OutOfRange { .. }))
        ));
    }

    #[test]
    fn test_idempotent() {
        let input = with_sale(dec!(12.5), MarginPolicy::PercentMargin(dec!(33.3)));
        assert_eq!(compute_pricing(&input).unwrap(), compute_pricing(&input).unwrap());
    }
}
