//! # m4-db: Database Layer for M4 Pricing
//!
//! This crate provides database access for the M4 pricing service.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        M4 Data Flow                                     │
//! │                                                                         │
//! │  axum handler (POST /api/simulator/internal)                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     m4-db (THIS CRATE)                          │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │    │ FeeRepo       │    │ 001_schema   │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 002_seed     │  │   │
//! │  │   │               │    │ UserRepo      │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (M4_DB_PATH, default ./m4.db)                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Fee, product and user repositories
//!
//! ## Usage
//!
//! ```rust,ignore
//! use m4_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("m4.db")).await?;
//!
//! let fees = db.fees().snapshot().await?;
//! let simulation = m4_core::simulate_installments(cash_price, &fees)?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::fee::{FeeRepository, NewFee};
pub use repository::product::{NewProduct, ProductRepository};
pub use repository::user::{hash_password, verify_password, User, UserRepository};
