//! # Error Types
//!
//! Domain-specific error types for ppcp-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ppcp-core errors (this file)                                          │
//! │  ├── CoreError        - Arithmetic and allocation failures             │
//! │  └── ValidationError  - Cart snapshot construction failures            │
//! │                                                                         │
//! │  ppcp-orders errors (separate crate)                                   │
//! │  └── OrdersError      - Settings and input file failures               │
//! │                                                                         │
//! │  Flow: CoreError → OrdersError → caller                                │
//! │        ValidationError → serde error → OrdersError::Json              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Where Errors Stop
//! The public allocator surface never returns these errors. A failed
//! allocation is logged and reported as an empty result, because line items
//! are optional enrichment on a gateway order.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core allocation errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A decimal amount does not fit in the `i64` cent range.
    ///
    /// ## When This Occurs
    /// - Corrupt cart data (e.g., an amount of 10^25)
    /// - `unit_amount × quantity` overflowing for absurd quantities
    #[error("Amount {amount} cannot be represented in cents")]
    AmountOutOfRange { amount: String },

    /// A quantity does not fit the integer range PayPal accepts.
    #[error("Quantity {quantity} for {sku} is out of range")]
    QuantityOutOfRange { sku: String, quantity: String },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors raised while building a cart snapshot.
///
/// Entries validate on construction, so these surface through the
/// deserializer (`serde(try_from)`) rather than through [`CoreError`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be strictly positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must be zero or greater.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., a currency code that is not ISO 4217 shaped).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityOutOfRange {
            sku: "MUG-1".to_string(),
            quantity: "1e30".to_string(),
        };
        assert_eq!(err.to_string(), "Quantity 1e30 for MUG-1 is out of range");

        let err = CoreError::AmountOutOfRange {
            amount: "99999999999999999999".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Amount 99999999999999999999 cannot be represented in cents"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        assert_eq!(err.to_string(), "quantity must be positive");

        let err = ValidationError::InvalidFormat {
            field: "currency".to_string(),
            reason: "expected three letters".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "currency has invalid format: expected three letters"
        );
    }
}
