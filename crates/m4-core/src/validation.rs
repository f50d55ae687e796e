//! # Validation Module
//!
//! Input validation for pricing, fee table and catalog operations.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Frontend (React)                                             │
//! │  └── Basic format checks, immediate feedback                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: API request DTOs (Rust)                                      │
//! │  ├── Type validation (deserialization)                                 │
//! │  ├── Required fields, wire tags                                        │
//! │  └── THIS MODULE: range and format rules                               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── UNIQUE constraints (fee label, product code, email)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use m4_core::validation::{validate_percentage, validate_positive};
//! use rust_decimal_macros::dec;
//!
//! let fee = validate_percentage("feePercent", dec!(5.92)).unwrap();
//! assert_eq!(fee.bps(), 592);
//!
//! assert!(validate_positive("cashPrice", dec!(0)).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;
use crate::types::Percentage;
use crate::{MAX_AMOUNT, MAX_INSTALLMENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a percentage in `0..=100` and wraps it.
///
/// ## Example
/// ```rust
/// use m4_core::validation::validate_percentage;
/// use rust_decimal_macros::dec;
///
/// assert!(validate_percentage("difalPercent", dec!(18)).is_ok());
/// assert!(validate_percentage("difalPercent", dec!(100)).is_ok());
/// assert!(validate_percentage("difalPercent", dec!(100.01)).is_err());
/// assert!(validate_percentage("difalPercent", dec!(-1)).is_err());
/// ```
pub fn validate_percentage(field: &str, value: Decimal) -> ValidationResult<Percentage> {
    if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        });
    }

    Ok(Percentage::new_unchecked(value.normalize()))
}

/// Validates that an amount is zero or greater.
///
/// Amounts above [`MAX_AMOUNT`] are rejected too, which keeps every
/// downstream Decimal operation far from overflow.
pub fn validate_non_negative(field: &str, value: Decimal) -> ValidationResult<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    check_upper_bound(field, value)
}

/// Validates that an amount is strictly greater than zero (and at most
/// [`MAX_AMOUNT`]).
pub fn validate_positive(field: &str, value: Decimal) -> ValidationResult<Decimal> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }

    check_upper_bound(field, value)
}

fn check_upper_bound(field: &str, value: Decimal) -> ValidationResult<Decimal> {
    if value > Decimal::from(MAX_AMOUNT) {
        return Err(ValidationError::OutOfRange {
            field: field.to_string(),
            min: "0".to_string(),
            max: MAX_AMOUNT.to_string(),
        });
    }

    Ok(value)
}

/// Validates an explicit installment count.
///
/// ## Rules
/// - Between 1 and [`MAX_INSTALLMENTS`]
pub fn validate_installment_count(count: i64) -> ValidationResult<u32> {
    if count < 1 || count > i64::from(MAX_INSTALLMENTS) {
        return Err(ValidationError::OutOfRange {
            field: "installmentCount".to_string(),
            min: "1".to_string(),
            max: MAX_INSTALLMENTS.to_string(),
        });
    }

    // Range checked above
    Ok(count as u32)
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Returns
/// The trimmed name.
///
/// ## Example
/// ```rust
/// use m4_core::validation::validate_product_name;
///
/// assert_eq!(validate_product_name("  Pistola Taurus G2C ").unwrap(), "Pistola Taurus G2C");
/// assert!(validate_product_name("   ").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::required("productName"));
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: "productName".to_string(),
            max: 200,
        });
    }

    Ok(name.to_string())
}

/// Validates an optional supplier product code.
///
/// ## Rules
/// - Blank is the same as absent
/// - At most 50 characters
/// - Letters, numbers, hyphens and underscores only
///
/// ## Example
/// ```rust
/// use m4_core::validation::validate_product_code;
///
/// assert_eq!(validate_product_code(Some("TAU00229")).unwrap(), Some("TAU00229".to_string()));
/// assert_eq!(validate_product_code(Some("  ")).unwrap(), None);
/// assert!(validate_product_code(Some("TAU 1")).is_err());
/// ```
pub fn validate_product_code(code: Option<&str>) -> ValidationResult<Option<String>> {
    let code = match code.map(str::trim) {
        None | Some("") => return Ok(None),
        Some(code) => code,
    };

    if code.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "code".to_string(),
            max: 50,
        });
    }

    if !code
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "code".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(Some(code.to_string()))
}

/// Validates a fee label (`Pix`, `Débito`, `10x`, ...).
///
/// Returns the trimmed label.
pub fn validate_fee_label(label: &str) -> ValidationResult<String> {
    let label = label.trim();

    if label.is_empty() {
        return Err(ValidationError::required("label"));
    }

    if label.chars().count() > 50 {
        return Err(ValidationError::TooLong {
            field: "label".to_string(),
            max: 50,
        });
    }

    Ok(label.to_string())
}

/// Validates an email address and normalizes it to lowercase.
///
/// ## Rules
/// - Must not be empty, at most 254 characters
/// - Exactly one `@` with a non-empty local part and a dotted domain
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::required("email"));
    }

    if email.len() > 254 {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: 254,
        });
    }

    let invalid = || ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: "must be a valid email address".to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty()
        || domain.contains('@')
        || email.chars().any(char::is_whitespace)
        || !domain.contains('.')
        || domain.starts_with('.')
        || domain.ends_with('.')
    {
        return Err(invalid());
    }

    Ok(email.to_lowercase())
}

/// Validates a password.
///
/// ## Rules
/// - At least 6 characters
/// - At most 128 characters
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::required("password"));
    }

    let length = password.chars().count();
    if length < 6 {
        return Err(ValidationError::InvalidFormat {
            field: "password".to_string(),
            reason: "must have at least 6 characters".to_string(),
        });
    }

    if length > 128 {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: 128,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_validate_percentage() {
        assert_eq!(validate_percentage("p", dec!(0)).unwrap(), Percentage::ZERO);
        assert_eq!(validate_percentage("p", dec!(13.35)).unwrap().value(), dec!(13.35));
        assert!(validate_percentage("p", dec!(100)).unwrap().is_hundred());

        let err = validate_percentage("supplierDiscountPercent", dec!(101)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "supplierDiscountPercent must be between 0 and 100"
        );
        assert!(validate_percentage("p", dec!(-0.01)).is_err());
    }

    #[test]
    fn test_validate_amounts() {
        assert!(validate_non_negative("freight", dec!(0)).is_ok());
        assert!(validate_non_negative("freight", dec!(50)).is_ok());
        assert!(matches!(
            validate_non_negative("freight", dec!(-1)),
            Err(ValidationError::MustNotBeNegative { .. })
        ));

        assert!(validate_positive("cashPrice", dec!(0.01)).is_ok());
        assert!(validate_positive("cashPrice", dec!(0)).is_err());
        assert!(validate_positive("cashPrice", dec!(-10)).is_err());

        assert!(validate_positive("cashPrice", Decimal::from(MAX_AMOUNT)).is_ok());
        assert!(matches!(
            validate_non_negative("freight", Decimal::from(MAX_AMOUNT) + dec!(0.01)),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_installment_count() {
        assert_eq!(validate_installment_count(1).unwrap(), 1);
        assert_eq!(validate_installment_count(12).unwrap(), 12);
        assert_eq!(validate_installment_count(48).unwrap(), 48);

        assert!(validate_installment_count(0).is_err());
        assert!(validate_installment_count(-3).is_err());
        assert!(validate_installment_count(49).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("PISTOLA TAURUS GX2 .38TPC PRETA").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
        assert!(validate_product_name(&"É".repeat(200)).is_ok());
    }

    #[test]
    fn test_validate_product_code() {
        assert_eq!(validate_product_code(None).unwrap(), None);
        assert_eq!(
            validate_product_code(Some(" TAU0001 ")).unwrap(),
            Some("TAU0001".to_string())
        );
        assert!(validate_product_code(Some(&"A".repeat(51))).is_err());
        assert!(validate_product_code(Some("TAU/1")).is_err());
    }

    #[test]
    fn test_validate_fee_label() {
        assert_eq!(validate_fee_label(" Débito ").unwrap(), "Débito");
        assert!(validate_fee_label("").is_err());
        assert!(validate_fee_label(&"x".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email(" Admin@M4Tatica.com.br ").unwrap(),
            "admin@m4tatica.com.br"
        );
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@m4.com").is_err());
        assert!(validate_email("a@b@c.com").is_err());
        assert!(validate_email("a@localhost").is_err());
        assert!(validate_email("a b@m4.com").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("secret").is_ok());
        assert!(validate_password("").is_err());
        assert!(validate_password("12345").is_err());
        assert!(validate_password(&"p".repeat(129)).is_err());
    }
}
