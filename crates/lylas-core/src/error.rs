//! # Error Types
//!
//! Validation error types for lylas-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  lylas-core errors (this file)                                         │
//! │  └── ValidationError  - Request validation failures (no side effects)  │
//! │                                                                         │
//! │  lylas-db errors (separate crate)                                      │
//! │  └── DbError          - Store failures, insufficient stock, not found  │
//! │                                                                         │
//! │  HTTP errors (apps/server)                                             │
//! │  └── ApiError         - Maps the above to status codes + JSON bodies   │
//! │                                                                         │
//! │  Flow: ValidationError → ApiError (400), DbError → ApiError (404/500)  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (field names, ids)
//! 3. Errors are enum variants, never String
//! 4. Validation happens before any store interaction

use thiserror::Error;

/// Input validation errors.
///
/// These are detected before the atomic unit of work is opened, so a
/// validation failure never leaves partial writes behind.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// A collection field must have at least one element.
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// The declared total does not reconcile with the line subtotals.
    ///
    /// ## When This Occurs
    /// The client computed `totalCents` independently of its line items.
    /// The server re-sums the subtotals and refuses drifted requests.
    #[error("total mismatch: declared {declared} cents, line items sum to {computed}")]
    TotalMismatch { declared: i64, computed: i64 },
}

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::Required {
            field: "employeeId".to_string(),
        };
        assert_eq!(err.to_string(), "employeeId is required");

        let err = ValidationError::TotalMismatch {
            declared: 4000,
            computed: 3900,
        };
        assert_eq!(
            err.to_string(),
            "total mismatch: declared 4000 cents, line items sum to 3900"
        );
    }
}
