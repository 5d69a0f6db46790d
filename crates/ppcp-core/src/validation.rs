//! # Validation Module
//!
//! Input validation for cart snapshots.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Cart source (platform)                                       │
//! │  └── Produces decimal quantities and amounts                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Snapshot construction (Rust)                                 │
//! │  ├── Type validation (deserialization)                                 │
//! │  └── THIS MODULE: positive quantity, non-negative amounts, currency    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Allocator reconciliation                                     │
//! │  └── Totals must match to the cent, else the data is omitted           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ppcp_core::validation::{validate_currency_code, validate_quantity};
//! use rust_decimal::Decimal;
//!
//! validate_currency_code("USD").unwrap();
//! validate_quantity(Decimal::ONE).unwrap();
//! assert!(validate_quantity(Decimal::ZERO).is_err());
//! ```

use rust_decimal::Decimal;

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates an ISO 4217 shaped currency code.
///
/// ## Rules
/// - Exactly three ASCII letters
/// - Upper case (callers normalize before validating)
pub fn validate_currency_code(code: &str) -> ValidationResult<()> {
    if code.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "currency_code".to_string(),
        });
    }

    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::InvalidFormat {
            field: "currency_code".to_string(),
            reason: "must be three upper-case letters".to_string(),
        });
    }

    Ok(())
}

/// Validates that a text field is present.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a cart quantity.
///
/// ## Rules
/// - Must be strictly positive
/// - May be fractional (weight-based products); the allocator emits those
///   as a single unit
pub fn validate_quantity(qty: Decimal) -> ValidationResult<()> {
    if qty <= Decimal::ZERO {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates that an amount is zero or greater.
///
/// Row amounts, row tax and row discount are all stored unsigned on the
/// cart line; only address-level discount totals carry a sign.
pub fn validate_amount(field: &str, amount: Decimal) -> ValidationResult<()> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
