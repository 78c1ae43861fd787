//! # Checkout Repository
//!
//! The atomic checkout unit of work, its compensating reversal, and the
//! transaction read models.
//!
//! ## Checkout Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    1. INSERT transaction header (server timestamp)                      │
//! │    2. For each item, in request order:                                  │
//! │         INSERT order line                                               │
//! │         conditional decrement of the stock batch                        │
//! │         └─ zero rows affected → ROLLBACK, return InsufficientStock      │
//! │    3. Non-cash payment → INSERT payment record with reference token     │
//! │  COMMIT                                                                 │
//! │                                                                         │
//! │  Partial states (header without lines, lines without decrements,        │
//! │  decrements without a committed sale) are unrepresentable: they only    │
//! │  ever exist inside an uncommitted transaction.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reversal Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BEGIN                                                                  │
//! │    1. Confirm the transaction exists (else NotFound)                    │
//! │    2. Read its order lines (stock_batch_id, quantity)                   │
//! │    3. Restore each quantity to its batch                                │
//! │    4. DELETE payment record → order lines → transaction                 │
//! │  COMMIT                                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{info, instrument};
use uuid::Uuid;

use lylas_core::{CheckoutDraft, OrderLineDetail, TransactionDetail};

use crate::error::{DbError, DbResult};
use crate::repository::stock;

// =============================================================================
// Checkout Receipt
// =============================================================================

/// What a committed checkout returns to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub transaction_id: i64,
    pub total_cents: i64,
    pub discounted_total_cents: i64,
    pub cash_received_cents: i64,
    pub change_cents: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for checkout, reversal, and transaction reads.
#[derive(Debug, Clone)]
pub struct CheckoutRepository {
    pool: SqlitePool,
}

impl CheckoutRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CheckoutRepository { pool }
    }

    /// Commits a checkout atomically.
    ///
    /// The draft must already be validated ([`CheckoutDraft::validate`]);
    /// this method only runs the unit of work. On any error nothing is
    /// persisted, including order lines written before a later item's
    /// stock ran out.
    #[instrument(skip(self, draft), fields(employee_id = draft.employee_id, items = draft.items.len()))]
    pub async fn process(&self, draft: &CheckoutDraft) -> DbResult<CheckoutReceipt> {
        let mut tx = self.pool.begin().await?;

        // The timestamp is computed here, never accepted from the client.
        let created_at = Utc::now();
        let discounted_total_cents = draft.discounted_total_cents();

        let result = sqlx::query(
            "INSERT INTO transactions
                 (employee_id, schedule_id, total_cents,
                  discounted_total_cents, cash_tendered_cents, created_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(draft.employee_id)
        .bind(draft.schedule_id)
        .bind(draft.total_cents)
        .bind(discounted_total_cents)
        .bind(draft.cash_received_cents)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        let transaction_id = result.last_insert_rowid();

        for item in &draft.items {
            let discounted_price_cents =
                lylas_core::discounted_unit_price(item.unit_price_cents, draft.discount_percent);

            sqlx::query(
                "INSERT INTO order_lines
                     (transaction_id, stock_batch_id, quantity,
                      subtotal_cents, discounted_price_cents)
                 VALUES (?, ?, ?, ?, ?)",
            )
            .bind(transaction_id)
            .bind(item.stock_batch_id)
            .bind(item.quantity)
            .bind(item.subtotal_cents)
            .bind(discounted_price_cents)
            .execute(&mut *tx)
            .await?;

            if let Err(err) =
                stock::decrement_if_available(&mut *tx, item.stock_batch_id, item.quantity).await
            {
                tx.rollback().await?;
                return Err(err);
            }
        }

        if draft.payment_method.needs_reference() {
            let reference = format!("REF-{}", Uuid::new_v4().simple());
            sqlx::query(
                "INSERT INTO payment_records (transaction_id, method, reference)
                 VALUES (?, ?, ?)",
            )
            .bind(transaction_id)
            .bind(draft.payment_method)
            .bind(&reference)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        info!(
            transaction_id,
            total_cents = draft.total_cents,
            "Checkout committed"
        );

        Ok(CheckoutReceipt {
            transaction_id,
            total_cents: draft.total_cents,
            discounted_total_cents,
            cash_received_cents: draft.cash_received_cents,
            change_cents: draft.change_cents(),
            created_at,
        })
    }

    /// Reverses a committed transaction atomically.
    ///
    /// Restores every order line's quantity to its batch, then deletes
    /// the payment record, the lines, and the transaction header. A
    /// transaction that does not exist (or was already reversed) yields
    /// [`DbError::NotFound`].
    #[instrument(skip(self))]
    pub async fn cancel(&self, transaction_id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM transactions WHERE id = ?")
            .bind(transaction_id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            tx.rollback().await?;
            return Err(DbError::not_found("Transaction", transaction_id));
        }

        let lines: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT stock_batch_id, quantity FROM order_lines WHERE transaction_id = ?",
        )
        .bind(transaction_id)
        .fetch_all(&mut *tx)
        .await?;

        for (stock_batch_id, quantity) in &lines {
            stock::restore(&mut *tx, *stock_batch_id, *quantity).await?;
        }

        // Child rows first, header last.
        sqlx::query("DELETE FROM payment_records WHERE transaction_id = ?")
            .bind(transaction_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM order_lines WHERE transaction_id = ?")
            .bind(transaction_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM transactions WHERE id = ?")
            .bind(transaction_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(transaction_id, lines = lines.len(), "Transaction reversed");
        Ok(())
    }

    /// Lists all transactions, newest first.
    pub async fn list(&self) -> DbResult<Vec<TransactionDetail>> {
        let transactions = sqlx::query_as::<_, TransactionDetail>(
            "SELECT t.id, t.employee_id, e.username AS employee_username,
                    t.schedule_id, t.total_cents, t.discounted_total_cents,
                    t.cash_tendered_cents, t.created_at
             FROM transactions t
             JOIN employees e ON e.id = t.employee_id
             ORDER BY t.created_at DESC, t.id DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(transactions)
    }

    /// Fetches a single transaction.
    pub async fn get(&self, id: i64) -> DbResult<TransactionDetail> {
        let transaction = sqlx::query_as::<_, TransactionDetail>(
            "SELECT t.id, t.employee_id, e.username AS employee_username,
                    t.schedule_id, t.total_cents, t.discounted_total_cents,
                    t.cash_tendered_cents, t.created_at
             FROM transactions t
             JOIN employees e ON e.id = t.employee_id
             WHERE t.id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DbError::not_found("Transaction", id))?;

        Ok(transaction)
    }

    /// Lists a transaction's order lines with product detail.
    pub async fn lines(&self, transaction_id: i64) -> DbResult<Vec<OrderLineDetail>> {
        let lines = sqlx::query_as::<_, OrderLineDetail>(
            "SELECT ol.id, ol.transaction_id, ol.stock_batch_id,
                    p.name AS product_name, sb.unit_price_cents,
                    ol.quantity, ol.subtotal_cents, ol.discounted_price_cents
             FROM order_lines ol
             JOIN stock_batches sb ON sb.id = ol.stock_batch_id
             JOIN products p ON p.id = sb.product_id
             WHERE ol.transaction_id = ?
             ORDER BY ol.id",
        )
        .bind(transaction_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use lylas_core::{CheckoutItem, PaymentMethod};

    async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    /// Seeds one employee, one category/product, and two batches
    /// (ids 1 and 2) with the given quantities.
    async fn seed(db: &Database, qty_a: i64, qty_b: i64) {
        sqlx::query(
            "INSERT INTO employees (username, full_name, password)
             VALUES ('maria', 'Maria Cruz', 'secret')",
        )
        .execute(db.pool())
        .await
        .unwrap();
        sqlx::query("INSERT INTO categories (name) VALUES ('Drinks')")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO products (name, category_id, price_cents) VALUES ('Lemonade', 1, 2000)",
        )
        .execute(db.pool())
        .await
        .unwrap();
        for qty in [qty_a, qty_b] {
            sqlx::query(
                "INSERT INTO stock_batches (product_id, quantity, unit_price_cents, expiry_date)
                 VALUES (1, ?, 2000, '2027-01-01')",
            )
            .bind(qty)
            .execute(db.pool())
            .await
            .unwrap();
        }
    }

    fn draft(items: Vec<CheckoutItem>) -> CheckoutDraft {
        let total_cents = items.iter().map(|i| i.subtotal_cents).sum();
        CheckoutDraft {
            employee_id: 1,
            schedule_id: None,
            items,
            total_cents,
            discount_percent: 0,
            payment_method: PaymentMethod::Cash,
            cash_received_cents: total_cents,
        }
    }

    fn item(stock_batch_id: i64, quantity: i64) -> CheckoutItem {
        CheckoutItem {
            stock_batch_id,
            quantity,
            unit_price_cents: 2000,
            subtotal_cents: 2000 * quantity,
        }
    }

    async fn batch_quantity(db: &Database, id: i64) -> i64 {
        sqlx::query_scalar("SELECT quantity FROM stock_batches WHERE id = ?")
            .bind(id)
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    async fn count(db: &Database, table: &str) -> i64 {
        sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_checkout_commits_and_decrements() {
        let db = test_db().await;
        seed(&db, 5, 5).await;

        let receipt = db
            .checkout()
            .process(&draft(vec![item(1, 2), item(2, 1)]))
            .await
            .unwrap();

        assert_eq!(receipt.total_cents, 6000);
        assert_eq!(receipt.change_cents, 0);
        assert_eq!(batch_quantity(&db, 1).await, 3);
        assert_eq!(batch_quantity(&db, 2).await, 4);
        assert_eq!(count(&db, "order_lines").await, 2);
    }

    #[tokio::test]
    async fn test_checkout_exact_stock_boundary() {
        let db = test_db().await;
        seed(&db, 5, 5).await;

        db.checkout()
            .process(&draft(vec![item(1, 5)]))
            .await
            .unwrap();

        assert_eq!(batch_quantity(&db, 1).await, 0);
    }

    #[tokio::test]
    async fn test_checkout_oversell_rejected() {
        let db = test_db().await;
        seed(&db, 5, 5).await;

        let err = db
            .checkout()
            .process(&draft(vec![item(1, 6)]))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::InsufficientStock { requested: 6, .. }));
        assert_eq!(batch_quantity(&db, 1).await, 5);
        assert_eq!(count(&db, "transactions").await, 0);
    }

    #[tokio::test]
    async fn test_midway_failure_leaves_no_partial_state() {
        let db = test_db().await;
        seed(&db, 5, 1).await;

        // First item succeeds, second exceeds its batch.
        let err = db
            .checkout()
            .process(&draft(vec![item(1, 3), item(2, 2)]))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InsufficientStock { .. }));

        // Everything rolled back, including the first item's decrement.
        assert_eq!(batch_quantity(&db, 1).await, 5);
        assert_eq!(batch_quantity(&db, 2).await, 1);
        assert_eq!(count(&db, "transactions").await, 0);
        assert_eq!(count(&db, "order_lines").await, 0);
    }

    #[tokio::test]
    async fn test_non_cash_checkout_creates_payment_record() {
        let db = test_db().await;
        seed(&db, 5, 5).await;

        let mut d = draft(vec![item(1, 1)]);
        d.payment_method = PaymentMethod::Card;
        let receipt = db.checkout().process(&d).await.unwrap();

        let reference: String =
            sqlx::query_scalar("SELECT reference FROM payment_records WHERE transaction_id = ?")
                .bind(receipt.transaction_id)
                .fetch_one(db.pool())
                .await
                .unwrap();
        assert!(reference.starts_with("REF-"));
    }

    #[tokio::test]
    async fn test_cash_checkout_creates_no_payment_record() {
        let db = test_db().await;
        seed(&db, 5, 5).await;

        db.checkout()
            .process(&draft(vec![item(1, 1)]))
            .await
            .unwrap();

        assert_eq!(count(&db, "payment_records").await, 0);
    }

    #[tokio::test]
    async fn test_discount_applied_to_totals_and_lines() {
        let db = test_db().await;
        seed(&db, 5, 5).await;

        let mut d = draft(vec![item(1, 1)]);
        d.discount_percent = 10;
        let receipt = db.checkout().process(&d).await.unwrap();

        assert_eq!(receipt.discounted_total_cents, 1800);

        let lines = db.checkout().lines(receipt.transaction_id).await.unwrap();
        assert_eq!(lines[0].discounted_price_cents, 1800);
    }

    #[tokio::test]
    async fn test_reversal_restores_exactly() {
        let db = test_db().await;
        seed(&db, 5, 5).await;

        let mut d = draft(vec![item(1, 2), item(2, 3)]);
        d.payment_method = PaymentMethod::Card;
        let receipt = db.checkout().process(&d).await.unwrap();
        assert_eq!(batch_quantity(&db, 1).await, 3);
        assert_eq!(batch_quantity(&db, 2).await, 2);

        db.checkout().cancel(receipt.transaction_id).await.unwrap();

        assert_eq!(batch_quantity(&db, 1).await, 5);
        assert_eq!(batch_quantity(&db, 2).await, 5);
        assert_eq!(count(&db, "transactions").await, 0);
        assert_eq!(count(&db, "order_lines").await, 0);
        assert_eq!(count(&db, "payment_records").await, 0);
    }

    #[tokio::test]
    async fn test_reversal_of_unknown_transaction_is_not_found() {
        let db = test_db().await;
        seed(&db, 5, 5).await;

        let err = db.checkout().cancel(42).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_double_reversal_is_not_found() {
        let db = test_db().await;
        seed(&db, 5, 5).await;

        let receipt = db
            .checkout()
            .process(&draft(vec![item(1, 2)]))
            .await
            .unwrap();

        db.checkout().cancel(receipt.transaction_id).await.unwrap();
        let err = db
            .checkout()
            .cancel(receipt.transaction_id)
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));

        // The second attempt must not restore again.
        assert_eq!(batch_quantity(&db, 1).await, 5);
    }

    #[tokio::test]
    async fn test_concurrent_checkouts_cannot_oversell() {
        // A file-backed database with a multi-connection pool, so the
        // two checkouts genuinely contend for the write lock instead of
        // serializing on a single in-memory connection.
        let path =
            std::env::temp_dir().join(format!("lylas-concurrent-{}.db", std::process::id()));
        let _ = std::fs::remove_file(&path);

        let db = Database::new(DbConfig::new(&path).max_connections(4))
            .await
            .unwrap();
        seed(&db, 5, 5).await;

        // Batch 1 holds 5; two overlapping checkouts each want 3.
        let first = db.checkout();
        let second = db.checkout();
        let first_draft = draft(vec![item(1, 3)]);
        let second_draft = draft(vec![item(1, 3)]);
        let (a, b) = tokio::join!(
            first.process(&first_draft),
            second.process(&second_draft)
        );

        // Exactly one wins; the loser's conditional decrement sees 2 < 3.
        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        let loser = if a.is_err() {
            a.unwrap_err()
        } else {
            b.unwrap_err()
        };
        assert!(matches!(loser, DbError::InsufficientStock { .. }));

        assert_eq!(batch_quantity(&db, 1).await, 2);
        assert_eq!(count(&db, "transactions").await, 1);
        assert_eq!(count(&db, "order_lines").await, 1);

        db.close().await;
        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[tokio::test]
    async fn test_transaction_reads() {
        let db = test_db().await;
        seed(&db, 5, 5).await;

        let receipt = db
            .checkout()
            .process(&draft(vec![item(1, 2)]))
            .await
            .unwrap();

        let all = db.checkout().list().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].employee_username, "maria");

        let one = db.checkout().get(receipt.transaction_id).await.unwrap();
        assert_eq!(one.total_cents, 4000);

        let lines = db.checkout().lines(receipt.transaction_id).await.unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].product_name, "Lemonade");
        assert_eq!(lines[0].quantity, 2);
    }
}
