//! # Storage Errors
//!
//! What can go wrong between a repository call and SQLite.
//!
//! ## Where They Go
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error / MigrateError                                             │
//! │       │  From impls below (SQLite message parsed for constraints)       │
//! │       ▼                                                                 │
//! │  DbError                                                                │
//! │       │  From<DbError> for ApiError                                     │
//! │       ▼                                                                 │
//! │  NotFound → 404 · UniqueViolation / ConstraintViolation → 400           │
//! │  everything else → 500, details only in the server log                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

/// Failure of a fee, product or user repository call.
#[derive(Debug, Error)]
pub enum DbError {
    /// No row with that id (update/delete of a missing fee or product).
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// A UNIQUE column already holds the value: fee label, product code or
    /// user email.
    #[error("Duplicate {field}: '{value}' already exists")]
    UniqueViolation { field: String, value: String },

    /// A CHECK constraint rejected the row (fee_bps over 10000, non-positive
    /// price, installment count outside 1..=48).
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// The SQLite file could not be opened, or the pool is closed.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// An embedded migration did not apply.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// SQLite rejected the statement for any other reason.
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// No connection became free within `connect_timeout`.
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Decoding and other driver-side failures.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DbError {
    /// `NotFound` for `entity` with the given id.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// `UniqueViolation` on `field`.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Fills in the offending value of a UniqueViolation.
    ///
    /// SQLite only names the column, so repositories attach the value they
    /// tried to write.
    pub(crate) fn with_value(self, value: &str) -> Self {
        match self {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: value.to_string(),
            },
            other => other,
        }
    }
}

/// Classifies sqlx failures.
///
/// ```text
/// RowNotFound                              → NotFound
/// "UNIQUE constraint failed: fees.label"   → UniqueViolation { field: "label" }
/// "CHECK constraint failed: ..."           → ConstraintViolation
/// other database message                   → QueryFailed
/// PoolTimedOut / PoolClosed                → PoolExhausted / ConnectionFailed
/// ```
impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "?"),

            sqlx::Error::Database(db_err) => {
                let message = db_err.message();

                if let Some(target) = message.strip_prefix("UNIQUE constraint failed: ") {
                    // "products.code" names the column after the dot
                    let field = target.rsplit('.').next().unwrap_or(target);
                    DbError::duplicate(field, "?")
                } else if message.contains("CHECK constraint failed") {
                    DbError::ConstraintViolation(message.to_string())
                } else {
                    DbError::QueryFailed(message.to_string())
                }
            }

            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_value_only_touches_unique_violation() {
        let err = DbError::duplicate("label", "?").with_value("3x");
        assert_eq!(err.to_string(), "Duplicate label: '3x' already exists");

        let err = DbError::not_found("Fee", 7).with_value("3x");
        assert_eq!(err.to_string(), "Fee not found: 7");
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            DbError::from(sqlx::Error::RowNotFound),
            DbError::NotFound { .. }
        ));
        assert!(matches!(
            DbError::from(sqlx::Error::PoolTimedOut),
            DbError::PoolExhausted
        ));
    }
}
