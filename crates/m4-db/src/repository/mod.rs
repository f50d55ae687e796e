//! # Repository Module
//!
//! Database repository implementations for M4 pricing.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  axum handler                                                          │
//! │       │                                                                 │
//! │       │  state.db.fees().snapshot()                                    │
//! │       ▼                                                                 │
//! │  FeeRepository                                                         │
//! │  ├── list / get_by_id                                                  │
//! │  ├── insert / update_rate / delete                                     │
//! │  └── snapshot ──► Vec<FeeRecord> for m4-core                           │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`FeeRepository`](fee::FeeRepository) - Installment fee table
//! - [`ProductRepository`](product::ProductRepository) - Product catalog CRUD
//! - [`UserRepository`](user::UserRepository) - Accounts and password hashing

pub mod fee;
pub mod product;
pub mod user;
