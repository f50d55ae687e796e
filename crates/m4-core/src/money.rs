//! # Money Module
//!
//! Rounding and representation of monetary values.
//!
//! ## Two Representations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  WHERE EACH REPRESENTATION LIVES                                        │
//! │                                                                         │
//! │  Storage (SQLite)         Calculation (m4-core)       Output (JSON)     │
//! │  ────────────────         ─────────────────────       ─────────────     │
//! │  Money (i64 cents)  ───►  Decimal (full precision) ─► Decimal, 2 dp     │
//! │  535000             ───►  5350                     ─► 5350.00           │
//! │                                                                         │
//! │  Intermediate steps are NEVER rounded. `round_money` runs once, when   │
//! │  a result struct is assembled.                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use m4_core::money::{round_money, Money};
//! use rust_decimal_macros::dec;
//!
//! let price = Money::from_cents(535000);
//! assert_eq!(price.to_decimal(), dec!(5350.00));
//! assert_eq!(price.to_string(), "R$ 5.350,00");
//!
//! assert_eq!(round_money(dec!(81.8181818)), dec!(81.82));
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Number of decimal places kept in every monetary output.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Rounds a monetary value to 2 decimal places (half away from zero).
///
/// ## Example
/// ```rust
/// use m4_core::money::round_money;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(round_money(dec!(1062.925170068)), dec!(1062.93));
/// assert_eq!(round_money(dec!(0.005)), dec!(0.01));
/// assert_eq!(round_money(dec!(-0.005)), dec!(-0.01));
/// ```
#[inline]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

/// Formats an amount the Brazilian way, without the currency symbol.
///
/// ## Example
/// ```rust
/// use m4_core::money::format_brl;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_brl(dec!(5408.957)), "5.408,96");
/// assert_eq!(format_brl(dec!(0)), "0,00");
/// ```
pub fn format_brl(value: Decimal) -> String {
    let rounded = round_money(value);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    let plain = format!("{:.2}", rounded.abs());
    let (integer, fraction) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));

    // Group the integer digits in thousands: 5408 → 5.408
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    format!("{}{},{}", sign, grouped, fraction)
}

// =============================================================================
// Money Type
// =============================================================================

/// A stored monetary value in centavos (the smallest BRL unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: same column type SQLite uses for INTEGER
/// - **Storage only**: calculations convert to `Decimal` first, so the
///   core never accumulates cent rounding between steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Converts a decimal amount in reais to centavos, rounding to 2 dp.
    ///
    /// Returns `None` when the amount does not fit in an i64 of centavos.
    ///
    /// ## Example
    /// ```rust
    /// use m4_core::money::Money;
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Money::from_decimal(dec!(5350)), Some(Money::from_cents(535000)));
    /// assert_eq!(Money::from_decimal(dec!(10.999)), Some(Money::from_cents(1100)));
    /// ```
    pub fn from_decimal(amount: Decimal) -> Option<Self> {
        let cents = round_money(amount).checked_mul(Decimal::ONE_HUNDRED)?;
        cents.to_i64().map(Money)
    }

    /// Returns the amount in reais as an exact decimal.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, MONEY_DECIMAL_PLACES)
    }
}

/// Display renders the amount the way it appears on quotes: `R$ 1.234,56`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "R$ {}", format_brl(self.to_decimal()))
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
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
    fn test_round_money_half_away_from_zero() {
        assert_eq!(round_money(dec!(2.345)), dec!(2.35));
        assert_eq!(round_money(dec!(2.344999)), dec!(2.34));
        assert_eq!(round_money(dec!(-2.345)), dec!(-2.35));
        assert_eq!(round_money(dec!(900)), dec!(900));
    }

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(dec!(5350)), "5.350,00");
        assert_eq!(format_brl(dec!(1895.549886)), "1.895,55");
        assert_eq!(format_brl(dec!(999.999)), "1.000,00");
        assert_eq!(format_brl(dec!(1234567.8)), "1.234.567,80");
        assert_eq!(format_brl(dec!(12.5)), "12,50");
        assert_eq!(format_brl(dec!(-1500)), "-1.500,00");
        assert_eq!(format_brl(dec!(-0.001)), "0,00");
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(535000).to_string(), "R$ 5.350,00");
        assert_eq!(Money::from_cents(5).to_string(), "R$ 0,05");
        assert_eq!(Money::from_cents(-550).to_string(), "R$ -5,50");
    }

    #[test]
    fn test_decimal_conversion() {
        let price = Money::from_cents(749000);
        assert_eq!(price.to_decimal(), dec!(7490.00));
        assert_eq!(Money::from_decimal(price.to_decimal()), Some(price));

        assert_eq!(Money::from_decimal(dec!(0.005)), Some(Money::from_cents(1)));
        assert_eq!(Money::from_decimal(Decimal::MAX), None);
    }
}
