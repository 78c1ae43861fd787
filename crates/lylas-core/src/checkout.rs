//! # Checkout Math
//!
//! Pure checkout computations: the typed checkout draft, per-line discount
//! pricing, totals reconciliation, and change due.
//!
//! ## Where This Sits
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Checkout Flow                                     │
//! │                                                                         │
//! │  POST /api/checkout (typed request body)                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CheckoutDraft::validate() ← THIS MODULE (no store interaction yet)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  lylas-db CheckoutRepository::process() ← atomic unit of work          │
//! │       │     insert transaction → lines → conditional decrements        │
//! │       ▼                                                                 │
//! │  201 { transactionId, totalCents, changeCents, date }                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Everything here is deterministic integer math. Failing validation means
//! the request never opens a unit of work, so no partial write can occur.

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};
use crate::money::Money;
use crate::types::PaymentMethod;
use crate::validation::{validate_price_cents, validate_quantity};
use crate::MAX_CHECKOUT_ITEMS;

// =============================================================================
// Checkout Draft
// =============================================================================

/// One line of a checkout request: a stock batch and how much of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutItem {
    pub stock_batch_id: i64,
    pub quantity: i64,
    /// Unit price at checkout time, in cents.
    pub unit_price_cents: i64,
    /// Client-computed `unit_price * quantity`, re-checked on validation.
    pub subtotal_cents: i64,
}

/// A validated-but-not-yet-committed checkout.
///
/// This is the typed replacement for the duck-typed request bodies of the
/// legacy system: every field the orchestrator needs is present and typed
/// before the atomic unit of work opens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutDraft {
    pub employee_id: i64,
    /// Optional reference to the event schedule the sale happened at.
    pub schedule_id: Option<i64>,
    pub items: Vec<CheckoutItem>,
    /// Declared total, in cents. Must reconcile with the line subtotals.
    pub total_cents: i64,
    /// Whole-percent discount applied per line (0..=100). Default 0.
    pub discount_percent: u32,
    pub payment_method: PaymentMethod,
    pub cash_received_cents: i64,
}

impl CheckoutDraft {
    /// Validates the draft before any store interaction.
    ///
    /// ## Rules
    /// - `employee_id` must be positive
    /// - `items` must be non-empty and within [`MAX_CHECKOUT_ITEMS`]
    /// - every quantity positive and within bounds, prices non-negative
    /// - `discount_percent` within 0..=100
    /// - `cash_received_cents` non-negative
    /// - declared total reconciles with the sum of line subtotals
    pub fn validate(&self) -> ValidationResult<()> {
        if self.employee_id <= 0 {
            return Err(ValidationError::Required {
                field: "employeeId".to_string(),
            });
        }

        if self.items.is_empty() {
            return Err(ValidationError::Empty {
                field: "items".to_string(),
            });
        }

        if self.items.len() > MAX_CHECKOUT_ITEMS {
            return Err(ValidationError::OutOfRange {
                field: "items".to_string(),
                min: 1,
                max: MAX_CHECKOUT_ITEMS as i64,
            });
        }

        for item in &self.items {
            validate_quantity(item.quantity)?;
            validate_price_cents(item.unit_price_cents)?;
            validate_price_cents(item.subtotal_cents)?;
        }

        if self.discount_percent > 100 {
            return Err(ValidationError::OutOfRange {
                field: "discountPercent".to_string(),
                min: 0,
                max: 100,
            });
        }

        if self.total_cents <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "totalCents".to_string(),
            });
        }

        if self.cash_received_cents < 0 {
            return Err(ValidationError::MustBePositive {
                field: "cashReceivedCents".to_string(),
            });
        }

        // Reconciling check: the store does not constrain
        // transactions.total_cents against the order lines, so drifted
        // client totals are refused here instead.
        let computed: i64 = self.items.iter().map(|i| i.subtotal_cents).sum();
        if computed != self.total_cents {
            return Err(ValidationError::TotalMismatch {
                declared: self.total_cents,
                computed,
            });
        }

        Ok(())
    }

    /// The total after the checkout-level discount, in cents.
    pub fn discounted_total_cents(&self) -> i64 {
        Money::from_cents(self.total_cents)
            .apply_percentage_discount(self.discount_percent * 100)
            .cents()
    }

    /// Change due to the customer, in cents.
    #[inline]
    pub fn change_cents(&self) -> i64 {
        change_due(self.cash_received_cents, self.total_cents)
    }
}

// =============================================================================
// Pricing Functions
// =============================================================================

/// Computes the discounted unit price for one line.
///
/// `discounted = unit_price * (1 - discount/100)`, in integer cents with
/// half-up rounding on the discount amount.
///
/// ## Example
/// ```rust
/// use lylas_core::checkout::discounted_unit_price;
///
/// // $50.00 at 10% off = $45.00
/// assert_eq!(discounted_unit_price(5000, 10), 4500);
/// ```
pub fn discounted_unit_price(unit_price_cents: i64, discount_percent: u32) -> i64 {
    Money::from_cents(unit_price_cents)
        .apply_percentage_discount(discount_percent * 100)
        .cents()
}

/// Change due: `cash received - total`.
///
/// ## Example
/// ```rust
/// use lylas_core::checkout::change_due;
///
/// // $100.00 tendered on a $75.50 total leaves $24.50 change
/// assert_eq!(change_due(10000, 7550), 2450);
/// ```
#[inline]
pub const fn change_due(cash_received_cents: i64, total_cents: i64) -> i64 {
    cash_received_cents - total_cents
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> CheckoutDraft {
        CheckoutDraft {
            employee_id: 1,
            schedule_id: None,
            items: vec![CheckoutItem {
                stock_batch_id: 10,
                quantity: 2,
                unit_price_cents: 2000,
                subtotal_cents: 4000,
            }],
            total_cents: 4000,
            discount_percent: 0,
            payment_method: PaymentMethod::Cash,
            cash_received_cents: 5000,
        }
    }

    #[test]
    fn test_valid_draft() {
        assert!(draft().validate().is_ok());
    }

    #[test]
    fn test_missing_employee() {
        let mut d = draft();
        d.employee_id = 0;
        assert!(matches!(
            d.validate(),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_empty_items() {
        let mut d = draft();
        d.items.clear();
        assert!(matches!(d.validate(), Err(ValidationError::Empty { .. })));
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut d = draft();
        d.items[0].quantity = 0;
        // Subtotal no longer matters; quantity is checked first.
        assert!(matches!(
            d.validate(),
            Err(ValidationError::MustBePositive { .. })
        ));
    }

    #[test]
    fn test_discount_out_of_range() {
        let mut d = draft();
        d.discount_percent = 101;
        assert!(matches!(
            d.validate(),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_total_mismatch_rejected() {
        let mut d = draft();
        d.total_cents = 3900;
        match d.validate() {
            Err(ValidationError::TotalMismatch { declared, computed }) => {
                assert_eq!(declared, 3900);
                assert_eq!(computed, 4000);
            }
            other => panic!("expected TotalMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_change_due() {
        assert_eq!(change_due(10000, 7550), 2450);
        assert_eq!(change_due(4000, 4000), 0);
        // Undertender is representable; policy is the caller's concern.
        assert_eq!(change_due(3000, 4000), -1000);
    }

    #[test]
    fn test_discounted_unit_price() {
        assert_eq!(discounted_unit_price(5000, 10), 4500);
        assert_eq!(discounted_unit_price(5000, 0), 5000);
        assert_eq!(discounted_unit_price(5000, 100), 0);
    }

    #[test]
    fn test_discounted_total() {
        let mut d = draft();
        d.discount_percent = 10;
        assert_eq!(d.discounted_total_cents(), 3600);
    }

    #[test]
    fn test_change_cents_on_draft() {
        assert_eq!(draft().change_cents(), 1000);
    }
}
