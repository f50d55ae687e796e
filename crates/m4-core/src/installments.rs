//! # Installments Module
//!
//! Prices every payment option of the fee table for a given cash price.
//!
//! ## Fee Inversion
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The card operator keeps `fee%` of whatever is charged. To still       │
//! │  receive the cash price, the charged total must be grossed up:          │
//! │                                                                         │
//! │      total = cash_price / (1 − fee/100)                                 │
//! │                                                                         │
//! │  Example: 1000.00 at 5.92%  →  1000 / 0.9408 = 1062.93                  │
//! │           3 installments    →  1062.925... / 3 = 354.31                 │
//! │                                                                         │
//! │  NOT cash_price × (1 + fee/100): that would leave the seller short.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Installment Count
//! Rows store their count explicitly. Rows created before that column
//! existed fall back to [`parse_installment_count`] on the label.

use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::Decimal;

use crate::error::{CoreError, CoreResult};
use crate::money::round_money;
use crate::types::{FeeRecord, InstallmentSimulation, SimulationResult};
use crate::validation::validate_positive;

/// Labels that always mean a single charge.
const SINGLE_PAYMENT_LABELS: [&str; 3] = ["Pix", "Débito", "1x"];

fn installment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(\d+)x").expect("installment pattern is valid"))
}

/// Derives the installment count from a fee label.
///
/// ## Rules
/// - `Pix`, `Débito`, `1x` → 1
/// - first `<digits>x` in the label → that number
/// - no match, zero, or a number too large → 1
///
/// ## Example
/// ```rust
/// use m4_core::installments::parse_installment_count;
///
/// assert_eq!(parse_installment_count("Pix"), 1);
/// assert_eq!(parse_installment_count("12x"), 12);
/// assert_eq!(parse_installment_count("Crédito 7x sem juros"), 7);
/// assert_eq!(parse_installment_count("Boleto"), 1);
/// ```
pub fn parse_installment_count(label: &str) -> u32 {
    let label = label.trim();
    if SINGLE_PAYMENT_LABELS.contains(&label) {
        return 1;
    }

    installment_pattern()
        .captures(label)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<u32>().ok())
        .filter(|count| *count > 0)
        .unwrap_or(1)
}

/// Simulates every fee of the table for `cash_price`.
///
/// ## Errors
/// - `ValidationError::MustBePositive` when `cash_price ≤ 0`
/// - [`CoreError::ArithmeticDegenerate`] when any fee is 100%, or so close
///   to it that the total overflows a Decimal; the whole call fails, no
///   partial list is returned
///
/// ## Example
/// ```rust
/// use m4_core::installments::simulate_installments;
/// use m4_core::{FeeRecord, Percentage};
/// use rust_decimal_macros::dec;
///
/// let fees = vec![FeeRecord::new("3x", Percentage::from_bps(592).unwrap())];
/// let simulation = simulate_installments(dec!(1000), &fees).unwrap();
///
/// assert_eq!(simulation.results[0].total_financed_price, dec!(1062.93));
/// assert_eq!(simulation.results[0].per_installment_amount, dec!(354.31));
/// ```
pub fn simulate_installments(
    cash_price: Decimal,
    fees: &[FeeRecord],
) -> CoreResult<SimulationResult> {
    let cash_price = validate_positive("cashPrice", cash_price)?;

    let results = fees
        .iter()
        .map(|fee| simulate_fee(cash_price, fee))
        .collect::<CoreResult<Vec<_>>>()?;

    Ok(SimulationResult {
        cash_price,
        results,
    })
}

fn simulate_fee(cash_price: Decimal, fee: &FeeRecord) -> CoreResult<InstallmentSimulation> {
    let total = if fee.fee_percent.is_zero() {
        cash_price
    } else {
        fee.fee_percent.gross_up(cash_price).ok_or_else(|| {
            CoreError::degenerate(
                format!("financed price for '{}'", fee.label),
                if fee.fee_percent.is_hundred() {
                    "a fee of 100% has no finite total"
                } else {
                    "the fee is too close to 100% for a finite total"
                },
            )
        })?
    };
    let count = fee.installments();
    let per_installment = total / Decimal::from(count);

    Ok(InstallmentSimulation {
        label: fee.label.clone(),
        fee_percent: fee.fee_percent,
        total_financed_price: round_money(total),
        installment_count: count,
        per_installment_amount: round_money(per_installment),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
