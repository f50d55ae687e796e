//! # Quote Module
//!
//! Ad hoc payment quote: any product name and cash price, priced against the
//! fee table, plus the plain-text message the seller pastes into a chat.
//!
//! ## Rendered Text
//! ```text
//! M4 Tática
//! Pistola Taurus G2C .38TPC - R$ 5.350,00 à vista
//! Opções de Pagamento:
//! Pix R$ 5.350,00
//! Débito R$ 5.408,96
//! 1x R$ 5.542,89
//! 3x: 3x R$ 1.895,55 = R$ 5.686,65
//!
//! Os valores poderão sofrer alterações sem aviso prévio
//! ```

use std::fmt::Write;

use rust_decimal::Decimal;
use serde::Serialize;
use ts_rs::TS;

use crate::error::CoreResult;
use crate::installments::simulate_installments;
use crate::money::format_brl;
use crate::types::{FeeRecord, InstallmentSimulation};
use crate::validation::validate_product_name;

/// Closing line of every quote.
pub const QUOTE_DISCLAIMER: &str = "Os valores poderão sofrer alterações sem aviso prévio";

/// A simulated quote for one product.
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaymentQuote {
    pub product_name: String,
    #[ts(type = "number")]
    pub cash_price: Decimal,
    pub options: Vec<InstallmentSimulation>,
}

impl PaymentQuote {
    /// Prices `product_name` at `cash_price` with the same simulator used
    /// for catalog products.
    pub fn build(product_name: &str, cash_price: Decimal, fees: &[FeeRecord]) -> CoreResult<Self> {
        let product_name = validate_product_name(product_name)?;
        let simulation = simulate_installments(cash_price, fees)?;

        Ok(PaymentQuote {
            product_name,
            cash_price: simulation.cash_price,
            options: simulation.results,
        })
    }

    /// Renders the shareable text, headed by `store_name`.
    pub fn render_text(&self, store_name: &str) -> String {
        let mut text = String::new();

        // Writing to a String cannot fail
        let _ = writeln!(text, "{}", store_name);
        let _ = writeln!(
            text,
            "{} - R$ {} à vista",
            self.product_name,
            format_brl(self.cash_price)
        );
        text.push_str("Opções de Pagamento:\n");

        for option in &self.options {
            let total = format_brl(option.total_financed_price);
            if is_single_charge(option) {
                let _ = writeln!(text, "{} R$ {}", option.label, total);
            } else {
                let _ = writeln!(
                    text,
                    "{}: {}x R$ {} = R$ {}",
                    option.label,
                    option.installment_count,
                    format_brl(option.per_installment_amount),
                    total
                );
            }
        }

        text.push('\n');
        text.push_str(QUOTE_DISCLAIMER);
        text
    }
}

fn is_single_charge(option: &InstallmentSimulation) -> bool {
    matches!(option.label.as_str(), "Pix" | "Débito") || option.installment_count == 1
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CoreError, ValidationError};
    use crate::types::Percentage;
    use rust_decimal_macros::dec;

    fn fees() -> Vec<FeeRecord> {
        vec![
            FeeRecord::new("Pix", Percentage::ZERO),
            FeeRecord::new("Débito", Percentage::from_bps(109).unwrap()),
            FeeRecord::new("1x", Percentage::from_bps(348).unwrap()),
            FeeRecord::new("3x", Percentage::from_bps(592).unwrap()),
        ]
    }

    #[test]
    fn test_render_text() {
        let quote = PaymentQuote::build("Pistola Taurus G2C .38TPC", dec!(5350), &fees()).unwrap();

        let expected = "M4 Tática\n\
            Pistola Taurus G2C .38TPC - R$ 5.350,00 à vista\n\
            Opções de Pagamento:\n\
            Pix R$ 5.350,00\n\
            Débito R$ 5.408,96\n\
            1x R$ 5.542,89\n\
            3x: 3x R$ 1.895,55 = R$ 5.686,65\n\
            \n\
            Os valores poderão sofrer alterações sem aviso prévio";

        assert_eq!(quote.render_text("M4 Tática"), expected);
    }

    #[test]
    fn test_matches_simulator() {
        let quote = PaymentQuote::build("Item avulso", dec!(1000), &fees()).unwrap();
        let simulation = simulate_installments(dec!(1000), &fees()).unwrap();
        assert_eq!(quote.options, simulation.results);
        assert_eq!(quote.cash_price, simulation.cash_price);
    }

    #[test]
    fn test_explicit_single_installment_prints_total_only() {
        let fees = vec![FeeRecord::new("Cartão", Percentage::ZERO).with_installment_count(1)];
        let quote = PaymentQuote::build("Coldre", dec!(250), &fees).unwrap();
        assert!(quote.render_text("Loja").contains("\nCartão R$ 250,00\n"));
    }

    #[test]
    fn test_build_errors() {
        assert!(matches!(
            PaymentQuote::build("  ", dec!(100), &fees()),
            Err(CoreError::Validation(ValidationError::Required { .. }))
        ));
        assert!(matches!(
            PaymentQuote::build("Coldre", dec!(0), &fees()),
            Err(CoreError::Validation(ValidationError::MustBePositive { .. }))
        ));
    }
}
