//! Route handlers, one module per resource.
//!
//! DTOs live next to their handlers and use camelCase on the wire.
//! Monetary fields are integer cents end to end (`totalCents`, never a
//! float dollar amount).

pub mod checkout;
pub mod employees;
pub mod events;
pub mod health;
pub mod issues;
pub mod products;
pub mod stock;
pub mod transactions;
