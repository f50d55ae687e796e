//! # Error Types
//!
//! Domain-specific error types for m4-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  m4-core errors (this file)                                            │
//! │  ├── CoreError        - Calculation failures                           │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  m4-db errors (separate crate)                                         │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError         - What the frontend sees (JSON + status)         │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ApiError → 400 Bad Request        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Degenerate Inputs
//! A percentage of exactly 100 in a `1 − p/100` denominator (sale tax,
//! margin, installment fee) would divide by zero. Those inputs are rejected
//! with [`CoreError::ArithmeticDegenerate`]; no infinite or NaN value ever
//! leaves this crate.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Calculation errors.
///
/// Every failure is reported before any output field is produced: a
/// computation either returns a complete result or one of these.
#[derive(Debug, Error)]
pub enum CoreError {
    /// An input makes a denominator exactly zero.
    ///
    /// ## When This Occurs
    /// - Sale tax of 100%: `total_cost / (1 − 1)`
    /// - Percent margin of 100%: `pre_tax / (1 − 1)`
    /// - Installment fee of 100%: `cash_price / (1 − 1)`
    /// - Final sale price of zero while deriving the margin percentage
    #[error("Cannot compute {operation}: {reason}")]
    ArithmeticDegenerate { operation: String, reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Creates an ArithmeticDegenerate error.
    pub fn degenerate(operation: impl Into<String>, reason: impl Into<String>) -> Self {
        CoreError::ArithmeticDegenerate {
            operation: operation.into(),
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before any calculation runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
    },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., non-numeric text, malformed email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Creates a Required error for the given field.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::degenerate("sale price", "sale tax of 100% leaves no base");
        assert_eq!(
            err.to_string(),
            "Cannot compute sale price: sale tax of 100% leaves no base"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::required("productName");
        assert_eq!(err.to_string(), "productName is required");

        let err = ValidationError::OutOfRange {
            field: "feePercent".to_string(),
            min: "0".to_string(),
            max: "100".to_string(),
        };
        assert_eq!(err.to_string(), "feePercent must be between 0 and 100");

        let err = ValidationError::NotAllowed {
            field: "exciseTax.kind".to_string(),
            allowed: vec!["percentual".to_string(), "reais".to_string()],
        };
        assert_eq!(
            err.to_string(),
            r#"exciseTax.kind must be one of: ["percentual", "reais"]"#
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::required("cashPrice");
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
