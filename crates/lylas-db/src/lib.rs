//! # lylas-db: Database Layer
//!
//! SQLite persistence for Lylas POS.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         lylas-db                                        │
//! │                                                                         │
//! │  ┌──────────────┐  ┌──────────────┐  ┌──────────────────────────────┐  │
//! │  │    pool      │  │  migrations  │  │        repository            │  │
//! │  │  ──────────  │  │  ──────────  │  │  ──────────────────────────  │  │
//! │  │  DbConfig    │  │  Embedded    │  │  product / stock / checkout  │  │
//! │  │  Database    │  │  SQL files   │  │  employee / event / issue    │  │
//! │  └──────────────┘  └──────────────┘  └──────────────────────────────┘  │
//! │                                                                         │
//! │  The database is the system of record. All invariant checks that       │
//! │  depend on current quantities run as SQL against live rows, never      │
//! │  against values read earlier in the request.                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! use lylas_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("lylas.db")).await?;
//! let products = db.products().list().await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::checkout::{CheckoutReceipt, CheckoutRepository};
pub use repository::employee::EmployeeRepository;
pub use repository::event::{EventRepository, NewEvent};
pub use repository::issue::{NewStockIssue, NewStockIssueLine, StockIssueRepository};
pub use repository::product::{NewProduct, ProductRepository};
pub use repository::stock::{NewStockBatch, StockRepository};
