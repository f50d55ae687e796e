//! # Product Repository
//!
//! Database operations for the product catalog.
//!
//! Prices are stored in centavos; callers hand in a [`Money`] and read back
//! `Product::cash_price()`.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use m4_core::{Money, Product};

const PRODUCT_COLUMNS: &str = "id, code, name, cash_price_cents, created_at, updated_at";

/// Data for creating or replacing a product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    /// Supplier code, unique when present.
    pub code: Option<String>,
    pub name: String,
    pub cash_price: Money,
}

/// Repository for product database operations.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists the catalog in insertion order.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        debug!("Listing products");

        let sql = format!("SELECT {} FROM products ORDER BY id ASC", PRODUCT_COLUMNS);
        let products = sqlx::query_as::<_, Product>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", PRODUCT_COLUMNS);
        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(product)
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted row
    /// * `Err(DbError::UniqueViolation)` - Code already exists
    pub async fn insert(&self, product: &NewProduct) -> DbResult<Product> {
        debug!(code = ?product.code, name = %product.name, "Inserting product");

        let sql = format!(
            "INSERT INTO products (code, name, cash_price_cents, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?4) RETURNING {}",
            PRODUCT_COLUMNS
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(&product.code)
            .bind(&product.name)
            .bind(product.cash_price.cents())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_value(product.code.as_deref().unwrap_or("")))
    }

    /// Replaces code, name and price of an existing product.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Updated row
    /// * `Err(DbError::NotFound)` - Product doesn't exist
    /// * `Err(DbError::UniqueViolation)` - Code taken by another product
    pub async fn update(&self, id: i64, product: &NewProduct) -> DbResult<Product> {
        debug!(id, code = ?product.code, "Updating product");

        let sql = format!(
            "UPDATE products SET \
                 code = ?2, \
                 name = ?3, \
                 cash_price_cents = ?4, \
                 updated_at = ?5 \
             WHERE id = ?1 RETURNING {}",
            PRODUCT_COLUMNS
        );

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .bind(&product.code)
            .bind(&product.name)
            .bind(product.cash_price.cents())
            .bind(Utc::now())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DbError::from(e).with_value(product.code.as_deref().unwrap_or("")))?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Deletes a product and returns the removed row.
    pub async fn delete(&self, id: i64) -> DbResult<Product> {
        debug!(id, "Deleting product");

        let sql = format!("DELETE FROM products WHERE id = ?1 RETURNING {}", PRODUCT_COLUMNS);

        sqlx::query_as::<_, Product>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use rust_decimal_macros::dec;

    async fn setup() -> ProductRepository {
        Database::new(DbConfig::in_memory()).await.unwrap().products()
    }

    fn holster(code: Option<&str>) -> NewProduct {
        NewProduct {
            code: code.map(str::to_string),
            name: "Coldre Kydex G2C".to_string(),
            cash_price: Money::from_cents(34990),
        }
    }

    #[tokio::test]
    async fn test_seeded_catalog() {
        let repo = setup().await;
        let products = repo.list().await.unwrap();

        assert_eq!(products.len(), 4);
        assert_eq!(products[0].code.as_deref(), Some("TAU0001"));
        assert_eq!(products[0].name, "Pistola Taurus G2C .38TPC");
        assert_eq!(products[0].cash_price().to_decimal(), dec!(5350.00));
        assert_eq!(products[3].cash_price_cents, 629900);
    }

    #[tokio::test]
    async fn test_insert_and_get() {
        let repo = setup().await;

        let inserted = repo.insert(&holster(Some("ACS-001"))).await.unwrap();
        assert_eq!(inserted.code.as_deref(), Some("ACS-001"));
        assert_eq!(inserted.cash_price(), Money::from_cents(34990));

        let fetched = repo.get_by_id(inserted.id).await.unwrap().unwrap();
        assert_eq!(fetched, inserted);

        assert!(repo.get_by_id(-1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_products_without_code() {
        let repo = setup().await;

        // NULL codes never collide
        repo.insert(&holster(None)).await.unwrap();
        let second = repo.insert(&holster(None)).await.unwrap();
        assert!(second.code.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_code() {
        let repo = setup().await;

        let err = repo.insert(&holster(Some("TAU0001"))).await.unwrap_err();
        match err {
            DbError::UniqueViolation { field, value } => {
                assert_eq!(field, "code");
                assert_eq!(value, "TAU0001");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_update() {
        let repo = setup().await;
        let first = repo.list().await.unwrap()[0].clone();

        let changes = NewProduct {
            code: Some("TAU0001".to_string()),
            name: "Pistola Taurus G2C .38TPC (Promo)".to_string(),
            cash_price: Money::from_cents(499000),
        };
        let updated = repo.update(first.id, &changes).await.unwrap();
        assert_eq!(updated.name, "Pistola Taurus G2C .38TPC (Promo)");
        assert_eq!(updated.cash_price_cents, 499000);
        assert_eq!(updated.created_at, first.created_at);

        let taken = NewProduct {
            code: Some("TAU00050".to_string()),
            ..changes.clone()
        };
        assert!(matches!(
            repo.update(first.id, &taken).await,
            Err(DbError::UniqueViolation { .. })
        ));

        assert!(matches!(
            repo.update(9999, &changes).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_delete_returns_row() {
        let repo = setup().await;
        let last = repo.list().await.unwrap()[3].clone();

        let deleted = repo.delete(last.id).await.unwrap();
        assert_eq!(deleted.code.as_deref(), Some("TAU00239"));
        assert_eq!(repo.list().await.unwrap().len(), 3);

        assert!(matches!(
            repo.delete(last.id).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_non_positive_price_is_rejected() {
        let repo = setup().await;
        let free = NewProduct {
            cash_price: Money::zero(),
            ..holster(None)
        };

        assert!(matches!(
            repo.insert(&free).await,
            Err(DbError::ConstraintViolation(_))
        ));
    }
}
