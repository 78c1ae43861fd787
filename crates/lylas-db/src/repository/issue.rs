//! # Stock Issue Repository
//!
//! "Stock-out" issuances: stock leaving the ledger for a non-sale reason
//! (spoilage, event provisioning, internal use). An issuance is a header
//! plus one line per batch, and it moves quantity through the same
//! ledger primitives as checkout, so an issuance can no more oversell
//! than a sale can.
//!
//! Deleting an issuance is a reversal: quantities go back to their
//! batches and the rows disappear, all in one unit of work.

use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::{info, instrument};

use lylas_core::StockIssueDetail;

use crate::error::{DbError, DbResult};
use crate::repository::stock;

/// One line of a new issuance.
#[derive(Debug, Clone)]
pub struct NewStockIssueLine {
    pub stock_batch_id: i64,
    pub quantity: i64,
    pub remarks: Option<String>,
}

/// Data for creating an issuance.
#[derive(Debug, Clone)]
pub struct NewStockIssue {
    pub employee_id: i64,
    pub issued_on: NaiveDate,
    pub lines: Vec<NewStockIssueLine>,
}

/// Repository for stock issuance operations.
#[derive(Debug, Clone)]
pub struct StockIssueRepository {
    pool: SqlitePool,
}

impl StockIssueRepository {
    pub fn new(pool: SqlitePool) -> Self {
        StockIssueRepository { pool }
    }

    /// Creates an issuance and decrements each line's batch atomically.
    ///
    /// Returns the new issuance's ID. Any line exceeding its batch's
    /// on-hand quantity aborts the whole issuance.
    #[instrument(skip(self, new), fields(employee_id = new.employee_id, lines = new.lines.len()))]
    pub async fn create(&self, new: NewStockIssue) -> DbResult<i64> {
        if new.lines.is_empty() {
            return Err(DbError::QueryFailed(
                "stock issue must have at least one line".to_string(),
            ));
        }

        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO stock_issues (employee_id, issued_on) VALUES (?, ?)")
            .bind(new.employee_id)
            .bind(new.issued_on)
            .execute(&mut *tx)
            .await?;
        let issue_id = result.last_insert_rowid();

        for line in &new.lines {
            sqlx::query(
                "INSERT INTO stock_issue_lines
                     (stock_issue_id, stock_batch_id, quantity, remarks)
                 VALUES (?, ?, ?, ?)",
            )
            .bind(issue_id)
            .bind(line.stock_batch_id)
            .bind(line.quantity)
            .bind(&line.remarks)
            .execute(&mut *tx)
            .await?;

            if let Err(err) =
                stock::decrement_if_available(&mut *tx, line.stock_batch_id, line.quantity).await
            {
                tx.rollback().await?;
                return Err(err);
            }
        }

        tx.commit().await?;

        info!(issue_id, "Stock issue committed");
        Ok(issue_id)
    }

    /// Lists issuance lines with employee and product detail.
    pub async fn list(&self) -> DbResult<Vec<StockIssueDetail>> {
        let details = sqlx::query_as::<_, StockIssueDetail>(
            "SELECT si.id AS issue_id, si.issued_on,
                    e.username AS employee_username,
                    p.name AS product_name, sil.quantity, sil.remarks
             FROM stock_issues si
             JOIN employees e ON e.id = si.employee_id
             JOIN stock_issue_lines sil ON sil.stock_issue_id = si.id
             JOIN stock_batches sb ON sb.id = sil.stock_batch_id
             JOIN products p ON p.id = sb.product_id
             ORDER BY si.issued_on DESC, si.id DESC, sil.id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(details)
    }

    /// Deletes an issuance, restoring each line's quantity first.
    #[instrument(skip(self))]
    pub async fn delete(&self, issue_id: i64) -> DbResult<()> {
        let mut tx = self.pool.begin().await?;

        let exists: Option<i64> = sqlx::query_scalar("SELECT id FROM stock_issues WHERE id = ?")
            .bind(issue_id)
            .fetch_optional(&mut *tx)
            .await?;

        if exists.is_none() {
            tx.rollback().await?;
            return Err(DbError::not_found("StockIssue", issue_id));
        }

        let lines: Vec<(i64, i64)> = sqlx::query_as(
            "SELECT stock_batch_id, quantity FROM stock_issue_lines WHERE stock_issue_id = ?",
        )
        .bind(issue_id)
        .fetch_all(&mut *tx)
        .await?;

        for (stock_batch_id, quantity) in &lines {
            stock::restore(&mut *tx, *stock_batch_id, *quantity).await?;
        }

        sqlx::query("DELETE FROM stock_issue_lines WHERE stock_issue_id = ?")
            .bind(issue_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM stock_issues WHERE id = ?")
            .bind(issue_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(issue_id, lines = lines.len(), "Stock issue deleted");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
