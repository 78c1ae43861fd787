//! # Repository Layer
//!
//! One repository per aggregate. Each wraps the shared pool and exposes
//! async methods returning `DbResult`.
//!
//! ## Transaction Discipline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Reads and single-row writes   →  run directly on the pool             │
//! │                                                                         │
//! │  Multi-row units of work       →  BEGIN .. COMMIT on one connection    │
//! │  (checkout, reversal,             Every exit path either commits or   │
//! │   event create/delete,            rolls back; the ledger primitives   │
//! │   stock issuance)                 in `stock` join the caller's tx     │
//! │                                   via &mut SqliteConnection.           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod checkout;
pub mod employee;
pub mod event;
pub mod issue;
pub mod product;
pub mod stock;
