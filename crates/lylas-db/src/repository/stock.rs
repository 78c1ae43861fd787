//! # Stock Repository
//!
//! CRUD over the inventory ledger (stock batches) plus the two ledger
//! primitives every quantity mutation in the system goes through.
//!
//! ## The Ledger Primitives
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  decrement_if_available(conn, batch, qty)                              │
//! │      UPDATE stock_batches                                              │
//! │      SET    quantity = quantity - ?                                    │
//! │      WHERE  id = ? AND quantity >= ?                                   │
//! │                                                                         │
//! │      rows_affected == 1  →  Ok(())                                     │
//! │      rows_affected == 0  →  Err(InsufficientStock)                     │
//! │                                                                         │
//! │  restore(conn, batch, qty)                                             │
//! │      UPDATE stock_batches SET quantity = quantity + ? WHERE id = ?     │
//! │                                                                         │
//! │      rows_affected == 0  →  Err(NotFound)                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both take `&mut SqliteConnection` so checkout and reversal can run them
//! inside their own transaction. The availability check and the decrement
//! are one statement, so concurrent checkouts against the same batch
//! serialize at the store and can never drive quantity negative.

use chrono::NaiveDate;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use lylas_core::{StockBatch, StockBatchDetail};

use crate::error::{DbError, DbResult};

// =============================================================================
// Ledger Primitives
// =============================================================================

/// Conditionally decrements a batch's quantity.
///
/// This is the sole oversell guard in the system. There is no prior
/// SELECT of the quantity; the condition travels with the UPDATE.
pub async fn decrement_if_available(
    conn: &mut SqliteConnection,
    stock_batch_id: i64,
    quantity: i64,
) -> DbResult<()> {
    let result = sqlx::query(
        "UPDATE stock_batches
         SET quantity = quantity - ?
         WHERE id = ? AND quantity >= ?",
    )
    .bind(quantity)
    .bind(stock_batch_id)
    .bind(quantity)
    .execute(conn)
    .await?;

    if result.rows_affected() == 0 {
        warn!(
            stock_batch_id,
            requested = quantity,
            "Conditional decrement affected zero rows"
        );
        return Err(DbError::InsufficientStock {
            stock_batch_id,
            requested: quantity,
        });
    }

    debug!(stock_batch_id, quantity, "Stock decremented");
    Ok(())
}

/// Adds quantity back to a batch (reversal compensation).
///
/// No upper bound check: a reversed sale restores exactly what it took,
/// and the ledger keeps no high-water mark to clamp against.
pub async fn restore(
    conn: &mut SqliteConnection,
    stock_batch_id: i64,
    quantity: i64,
) -> DbResult<()> {
    let result = sqlx::query("UPDATE stock_batches SET quantity = quantity + ? WHERE id = ?")
        .bind(quantity)
        .bind(stock_batch_id)
        .execute(conn)
        .await?;

    if result.rows_affected() == 0 {
        return Err(DbError::not_found("StockBatch", stock_batch_id));
    }

    debug!(stock_batch_id, quantity, "Stock restored");
    Ok(())
}

// =============================================================================
// New Stock Batch
// =============================================================================

/// Data for receiving a new inventory lot.
#[derive(Debug, Clone)]
pub struct NewStockBatch {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub expiry_date: NaiveDate,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for stock batch CRUD.
#[derive(Debug, Clone)]
pub struct StockRepository {
    pool: SqlitePool,
}

impl StockRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StockRepository { pool }
    }

    /// Lists all stock batches with product and category names.
    pub async fn list(&self) -> DbResult<Vec<StockBatchDetail>> {
        let batches = sqlx::query_as::<_, StockBatchDetail>(
            "SELECT sb.id, sb.product_id, p.name AS product_name,
                    c.name AS category_name, sb.quantity,
                    sb.unit_price_cents, sb.expiry_date
             FROM stock_batches sb
             JOIN products p ON p.id = sb.product_id
             JOIN categories c ON c.id = p.category_id
             ORDER BY sb.id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    /// Lists sellable batches: quantity > 0, unexpired, soonest expiry
    /// first.
    ///
    /// The caller (the register UI) picks the lot; the server does not
    /// auto-select, it only orders the candidates.
    pub async fn list_available(&self) -> DbResult<Vec<StockBatchDetail>> {
        let batches = sqlx::query_as::<_, StockBatchDetail>(
            "SELECT sb.id, sb.product_id, p.name AS product_name,
                    c.name AS category_name, sb.quantity,
                    sb.unit_price_cents, sb.expiry_date
             FROM stock_batches sb
             JOIN products p ON p.id = sb.product_id
             JOIN categories c ON c.id = p.category_id
             WHERE sb.quantity > 0 AND sb.expiry_date >= date('now')
             ORDER BY sb.expiry_date, p.name, sb.id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(batches)
    }

    /// Fetches a single batch by ID.
    pub async fn get(&self, id: i64) -> DbResult<StockBatch> {
        let batch = sqlx::query_as::<_, StockBatch>(
            "SELECT id, product_id, quantity, unit_price_cents, expiry_date
             FROM stock_batches WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("StockBatch", id))?;

        Ok(batch)
    }

    /// Receives a new lot into the ledger. Returns the stored row.
    pub async fn create(&self, new: NewStockBatch) -> DbResult<StockBatch> {
        if new.quantity < 0 {
            return Err(DbError::QueryFailed(
                "stock batch quantity must be non-negative".to_string(),
            ));
        }

        let result = sqlx::query(
            "INSERT INTO stock_batches (product_id, quantity, unit_price_cents, expiry_date)
             VALUES (?, ?, ?, ?)",
        )
        .bind(new.product_id)
        .bind(new.quantity)
        .bind(new.unit_price_cents)
        .bind(new.expiry_date)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        debug!(id, product_id = new.product_id, "Stock batch created");

        self.get(id).await
    }

    /// Updates a batch's receipt data (quantity, price, expiry).
    ///
    /// This is the manual correction path, not the sales path; sales go
    /// through the ledger primitives.
    pub async fn update(&self, id: i64, new: NewStockBatch) -> DbResult<StockBatch> {
        if new.quantity < 0 {
            return Err(DbError::QueryFailed(
                "stock batch quantity must be non-negative".to_string(),
            ));
        }

        let result = sqlx::query(
            "UPDATE stock_batches
             SET product_id = ?, quantity = ?, unit_price_cents = ?, expiry_date = ?
             WHERE id = ?",
        )
        .bind(new.product_id)
        .bind(new.quantity)
        .bind(new.unit_price_cents)
        .bind(new.expiry_date)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("StockBatch", id));
        }

        self.get(id).await
    }

    /// Deletes a batch. Fails with a foreign key violation if any order
    /// line references it.
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM stock_batches WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("StockBatch", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Seeds a category, product, and one batch; returns the batch id.
    async fn seed_batch(db: &Database, quantity: i64) -> i64 {
        sqlx::query("INSERT INTO categories (name) VALUES ('Drinks')")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO products (name, category_id, price_cents) VALUES ('Lemonade', 1, 250)",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let result = sqlx::query(
            "INSERT INTO stock_batches (product_id, quantity, unit_price_cents, expiry_date)
             VALUES (1, ?, 250, '2027-01-01')",
        )
        .bind(quantity)
        .execute(db.pool())
        .await
        .unwrap();

        result.last_insert_rowid()
    }

    #[tokio::test]
    async fn test_decrement_exact_boundary() {
        let db = test_db().await;
        let batch_id = seed_batch(&db, 5).await;

        let mut conn = db.pool().acquire().await.unwrap();
        decrement_if_available(&mut *conn, batch_id, 5).await.unwrap();
        drop(conn);

        let batch = db.stock().get(batch_id).await.unwrap();
        assert_eq!(batch.quantity, 0);
    }

    #[tokio::test]
    async fn test_decrement_insufficient_leaves_quantity_untouched() {
        let db = test_db().await;
        let batch_id = seed_batch(&db, 5).await;

        let mut conn = db.pool().acquire().await.unwrap();
        let err = decrement_if_available(&mut *conn, batch_id, 6)
            .await
            .unwrap_err();
        drop(conn);

        assert!(matches!(
            err,
            DbError::InsufficientStock {
                stock_batch_id,
                requested: 6,
            } if stock_batch_id == batch_id
        ));

        let batch = db.stock().get(batch_id).await.unwrap();
        assert_eq!(batch.quantity, 5);
    }

    #[tokio::test]
    async fn test_restore_adds_back() {
        let db = test_db().await;
        let batch_id = seed_batch(&db, 2).await;

        let mut conn = db.pool().acquire().await.unwrap();
        restore(&mut *conn, batch_id, 3).await.unwrap();
        drop(conn);

        let batch = db.stock().get(batch_id).await.unwrap();
        assert_eq!(batch.quantity, 5);
    }

    #[tokio::test]
    async fn test_restore_unknown_batch_is_not_found() {
        let db = test_db().await;

        let mut conn = db.pool().acquire().await.unwrap();
        let err = restore(&mut *conn, 999, 1).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_available_excludes_empty_and_expired_batches() {
        let db = test_db().await;
        seed_batch(&db, 0).await;

        // One sellable lot, one expired years ago.
        sqlx::query(
            "INSERT INTO stock_batches (product_id, quantity, unit_price_cents, expiry_date)
             VALUES (1, 4, 250, '2030-06-01'), (1, 9, 250, '2020-01-01')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let available = db.stock().list_available().await.unwrap();
        assert_eq!(available.len(), 1);
        assert_eq!(available[0].quantity, 4);
    }

    #[tokio::test]
    async fn test_crud_roundtrip() {
        let db = test_db().await;
        seed_batch(&db, 1).await;

        let created = db
            .stock()
            .create(NewStockBatch {
                product_id: 1,
                quantity: 10,
                unit_price_cents: 300,
                expiry_date: NaiveDate::from_ymd_opt(2027, 6, 1).unwrap(),
            })
            .await
            .unwrap();
        assert_eq!(created.quantity, 10);

        let updated = db
            .stock()
            .update(
                created.id,
                NewStockBatch {
                    product_id: 1,
                    quantity: 8,
                    unit_price_cents: 300,
                    expiry_date: created.expiry_date,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.quantity, 8);

        db.stock().delete(created.id).await.unwrap();
        assert!(db.stock().get(created.id).await.is_err());
    }
}
