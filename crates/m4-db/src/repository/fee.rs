//! # Fee Repository
//!
//! Database operations for the installment fee table.
//!
//! ## Installment Count at Creation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert(NewFee { label: "10x", installment_count: None, .. })          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  parse_installment_count("10x") = 10  ──►  stored in installment_count │
//! │                                                                         │
//! │  Rows written before the column existed keep NULL; the simulator       │
//! │  falls back to the label for those.                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use m4_core::{parse_installment_count, Fee, FeeRecord, Percentage};

const FEE_COLUMNS: &str = "id, label, fee_bps, installment_count, created_at, updated_at";

/// Data for a new fee row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFee {
    pub label: String,
    pub fee_percent: Percentage,
    /// `None` derives the count from the label before storing it.
    pub installment_count: Option<u32>,
}

/// Repository for fee table operations.
#[derive(Debug, Clone)]
pub struct FeeRepository {
    pool: SqlitePool,
}

impl FeeRepository {
    /// Creates a new FeeRepository.
    pub fn new(pool: SqlitePool) -> Self {
        FeeRepository { pool }
    }

    /// Lists every fee in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Fee>> {
        debug!("Listing fees");

        let sql = format!("SELECT {} FROM fees ORDER BY id ASC", FEE_COLUMNS);
        let fees = sqlx::query_as::<_, Fee>(&sql).fetch_all(&self.pool).await?;

        Ok(fees)
    }

    /// Gets a fee by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Fee))` - Fee found
    /// * `Ok(None)` - Fee not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Fee>> {
        let sql = format!("SELECT {} FROM fees WHERE id = ?1", FEE_COLUMNS);
        let fee = sqlx::query_as::<_, Fee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(fee)
    }

    /// Inserts a new fee.
    ///
    /// ## Returns
    /// * `Ok(Fee)` - Inserted row
    /// * `Err(DbError::UniqueViolation)` - Label already exists
    pub async fn insert(&self, fee: &NewFee) -> DbResult<Fee> {
        let installment_count = fee
            .installment_count
            .unwrap_or_else(|| parse_installment_count(&fee.label));

        debug!(label = %fee.label, bps = fee.fee_percent.bps(), installment_count, "Inserting fee");

        let now = Utc::now();
        let sql = format!(
            "INSERT INTO fees (label, fee_bps, installment_count, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?4) RETURNING {}",
            FEE_COLUMNS
        );

        let inserted = sqlx::query_as::<_, Fee>(&sql)
            .bind(&fee.label)
            .bind(fee.fee_percent.bps())
            .bind(installment_count)
            .bind(now)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_value(&fee.label))?;

        Ok(inserted)
    }

    /// Updates the rate of a fee and, when given, its installment count.
    ///
    /// ## Returns
    /// * `Ok(Fee)` - Updated row
    /// * `Err(DbError::NotFound)` - Fee doesn't exist
    pub async fn update_rate(
        &self,
        id: i64,
        fee_percent: Percentage,
        installment_count: Option<u32>,
    ) -> DbResult<Fee> {
        debug!(id, bps = fee_percent.bps(), ?installment_count, "Updating fee rate");

        let sql = format!(
            "UPDATE fees SET \
                 fee_bps = ?2, \
                 installment_count = COALESCE(?3, installment_count), \
                 updated_at = ?4 \
             WHERE id = ?1 RETURNING {}",
            FEE_COLUMNS
        );

        sqlx::query_as::<_, Fee>(&sql)
            .bind(id)
            .bind(fee_percent.bps())
            .bind(installment_count)
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Fee", id))
    }

    /// Deletes a fee and returns the removed row.
    pub async fn delete(&self, id: i64) -> DbResult<Fee> {
        debug!(id, "Deleting fee");

        let sql = format!("DELETE FROM fees WHERE id = ?1 RETURNING {}", FEE_COLUMNS);

        sqlx::query_as::<_, Fee>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Fee", id))
    }

    /// Loads the fee table as the simulator's input snapshot.
    pub async fn snapshot(&self) -> DbResult<Vec<FeeRecord>> {
        let fees = self.list().await?;
        Ok(fees.iter().map(Fee::to_record).collect())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
