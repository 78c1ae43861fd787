//! # Domain Types
//!
//! Core domain types used throughout Lylas POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │   StockBatch    │   │  Transaction    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  id (i64)       │       │
//! │  │  name           │   │  product_id     │   │  employee_id    │       │
//! │  │  category_id    │   │  quantity ≥ 0   │   │  total_cents    │       │
//! │  │  price_cents    │   │  expiry_date    │   │  created_at     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   OrderLine     │   │ PaymentRecord   │    plus reference entities: │
//! │  │  ─────────────  │   │  ─────────────  │    Employee, Category,      │
//! │  │  transaction_id │   │  transaction_id │    Event, Schedule,         │
//! │  │  stock_batch_id │   │  method         │    EventType, StockIssue    │
//! │  │  quantity       │   │  reference      │                             │
//! │  └─────────────────┘   └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The relational store is the system of record; these types are row images
//! and read models, not caches. Identities are auto-increment i64 keys
//! returned by the store on insert.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Lookup Entities
// =============================================================================

/// A product category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// An employee. Read-only from the core's perspective; login is a
/// plaintext-comparison lookup carried over from the legacy system.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Employee {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub password: String,
}

/// A type/category of event (e.g. "Wedding", "Corporate").
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct EventType {
    pub id: i64,
    pub category: String,
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale. Immutable once referenced by stock.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category_id: i64,
    /// Unit list price in cents.
    pub price_cents: i64,
}

impl Product {
    /// Returns the list price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }
}

/// Product joined with its category name (list read model).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct ProductDetail {
    pub id: i64,
    pub name: String,
    pub price_cents: i64,
    pub category_id: i64,
    pub category_name: String,
}

// =============================================================================
// Stock Batch (the inventory ledger)
// =============================================================================

/// One inventory lot for a product, with its own quantity and expiry.
///
/// ## Invariant
/// `quantity >= 0` at all times. The only mutation paths are the
/// conditional decrement during checkout and the compensating increment
/// during reversal; both live in the database layer so every check hits
/// the store (no in-process quantity caching).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockBatch {
    pub id: i64,
    pub product_id: i64,
    /// On-hand quantity of record.
    pub quantity: i64,
    /// Unit price at time of receipt, in cents.
    pub unit_price_cents: i64,
    pub expiry_date: NaiveDate,
}

/// Stock batch joined with product and category names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockBatchDetail {
    pub id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub category_name: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub expiry_date: NaiveDate,
}

// =============================================================================
// Payment Method
// =============================================================================

/// How a transaction was paid.
///
/// Cash is the default; non-cash methods additionally get a
/// [`PaymentRecord`] with a generated reference token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash payment.
    Cash,
    /// Card payment on external terminal.
    Card,
    /// Any other non-cash method (e-wallet, voucher).
    Other,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl PaymentMethod {
    /// Whether this method requires a payment record with a reference token.
    #[inline]
    pub fn needs_reference(&self) -> bool {
        !matches!(self, PaymentMethod::Cash)
    }
}

// =============================================================================
// Transaction
// =============================================================================

/// A committed sale. Created atomically with its order lines and the
/// inventory decrement; immutable once committed except via full reversal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Transaction {
    pub id: i64,
    pub employee_id: i64,
    pub schedule_id: Option<i64>,
    pub total_cents: i64,
    pub discounted_total_cents: i64,
    pub cash_tendered_cents: i64,
    /// Server-computed timestamp (never client-supplied).
    pub created_at: DateTime<Utc>,
}

/// Transaction joined with the employee who rang it up.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct TransactionDetail {
    pub id: i64,
    pub employee_id: i64,
    pub employee_username: String,
    pub schedule_id: Option<i64>,
    pub total_cents: i64,
    pub discounted_total_cents: i64,
    pub cash_tendered_cents: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Order Line
// =============================================================================

/// A line item of a transaction. Exactly one row per checkout item.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLine {
    pub id: i64,
    pub transaction_id: i64,
    pub stock_batch_id: i64,
    pub quantity: i64,
    pub subtotal_cents: i64,
    /// Unit price after the checkout discount, in cents.
    pub discounted_price_cents: i64,
}

/// Order line joined with product detail (read model).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct OrderLineDetail {
    pub id: i64,
    pub transaction_id: i64,
    pub stock_batch_id: i64,
    pub product_name: String,
    pub unit_price_cents: i64,
    pub quantity: i64,
    pub subtotal_cents: i64,
    pub discounted_price_cents: i64,
}

// =============================================================================
// Payment Record
// =============================================================================

/// Non-cash payment reference. One-to-one-or-zero with a transaction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct PaymentRecord {
    pub id: i64,
    pub transaction_id: i64,
    pub method: PaymentMethod,
    pub reference: String,
}

// =============================================================================
// Events & Schedules
// =============================================================================

/// A scheduled event the business sells at.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub event_type_id: i64,
}

/// The date range an event runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Schedule {
    pub id: i64,
    pub event_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

/// Event joined with its schedule and type (list read model).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct EventDetail {
    pub id: i64,
    pub title: String,
    pub event_category: String,
    pub schedule_id: i64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

// =============================================================================
// Stock Issues ("stock-out")
// =============================================================================

/// A stock issuance header: who took stock out, and when.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockIssue {
    pub id: i64,
    pub employee_id: i64,
    pub issued_on: NaiveDate,
}

/// One issued lot within a stock issuance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockIssueLine {
    pub id: i64,
    pub stock_issue_id: i64,
    pub stock_batch_id: i64,
    pub quantity: i64,
    pub remarks: Option<String>,
}

/// Issuance line joined with employee and product detail.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockIssueDetail {
    pub issue_id: i64,
    pub issued_on: NaiveDate,
    pub employee_username: String,
    pub product_name: String,
    pub quantity: i64,
    pub remarks: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_default() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
    }

    #[test]
    fn test_payment_method_needs_reference() {
        assert!(!PaymentMethod::Cash.needs_reference());
        assert!(PaymentMethod::Card.needs_reference());
        assert!(PaymentMethod::Other.needs_reference());
    }

    #[test]
    fn test_product_price() {
        let product = Product {
            id: 1,
            name: "Lemonade".to_string(),
            category_id: 1,
            price_cents: 250,
        };
        assert_eq!(product.price().cents(), 250);
    }
}
