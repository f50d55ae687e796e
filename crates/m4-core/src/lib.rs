//! # m4-core: Pure Pricing Logic for M4
//!
//! This crate is the **heart** of the M4 pricing service. It contains the
//! cost calculator and the installment simulator as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        M4 Pricing Architecture                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Frontend (React)                             │   │
//! │  │   Calculadora ──► Simulador interno ──► Simulador público      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ JSON over HTTP                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │   request DTOs ──► validation ──► fee snapshot from m4-db      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ m4-core (THIS CRATE) ★                          │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌─────────────┐  ┌─────────┐  ┌───────────┐   │   │
//! │  │   │  pricing  │  │ installments│  │  quote  │  │ validation│   │   │
//! │  │   │  cost,    │  │ fee         │  │ text    │  │  rules    │   │   │
//! │  │   │  margin   │  │ inversion   │  │ output  │  │           │   │   │
//! │  │   └───────────┘  └─────────────┘  └─────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (PricingInput, FeeRecord, Percentage, etc.)
//! - [`money`] - Rounding, BRL formatting, stored cents
//! - [`pricing`] - Cost and sale price calculator
//! - [`installments`] - Installment fee simulator
//! - [`quote`] - Ad hoc quote and its shareable text
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input, same output; the fee table arrives as a snapshot
//! 2. **Exact Decimals**: `rust_decimal` everywhere, rounded to 2 dp only at output
//! 3. **Explicit Errors**: degenerate inputs are typed errors, never `Infinity`
//!
//! ## Example Usage
//!
//! ```rust
//! use m4_core::installments::simulate_installments;
//! use m4_core::{FeeRecord, Percentage};
//! use rust_decimal_macros::dec;
//!
//! let fees = vec![
//!     FeeRecord::new("Pix", Percentage::ZERO),
//!     FeeRecord::new("12x", Percentage::from_bps(1335).unwrap()),
//! ];
//!
//! let simulation = simulate_installments(dec!(5350), &fees).unwrap();
//! assert_eq!(simulation.results[1].installment_count, 12);
//! assert_eq!(simulation.results[1].per_installment_amount, dec!(514.52));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod installments;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use installments::{parse_installment_count, simulate_installments};
pub use money::Money;
pub use pricing::compute_pricing;
pub use quote::PaymentQuote;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Store name printed at the top of payment quotes.
pub const DEFAULT_STORE_NAME: &str = "M4 Tática";

/// Largest installment count accepted for a fee row.
pub const MAX_INSTALLMENTS: u32 = 48;

/// Largest amount in reais accepted by any calculation.
pub const MAX_AMOUNT: i64 = 1_000_000_000_000;
