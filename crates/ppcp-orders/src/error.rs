//! # Orders Error Types
//!
//! Error types for settings loading and request assembly.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Orders Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │     Input       │  │     Domain              │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Io             │  │  Core (ppcp-core)       │ │
//! │  │  ConfigLoad...  │  │  Json           │  │                         │ │
//! │  │  TomlParse      │  │                 │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Building a purchase unit never fails: omitted breakdown or items are
//! not errors. These variants cover the edges around it.

use ppcp_core::CoreError;
use thiserror::Error;

/// Result type alias for orders operations.
pub type OrdersResult<T> = Result<T, OrdersError>;

#[derive(Debug, Error)]
pub enum OrdersError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Settings loaded but failed validation.
    #[error("Invalid orders configuration: {0}")]
    InvalidConfig(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Config file is not valid TOML for the settings schema.
    #[error("Failed to parse config: {0}")]
    TomlParse(#[from] toml::de::Error),

    // =========================================================================
    // Input Errors
    // =========================================================================
    /// Reading an input file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A cart snapshot file could not be decoded (includes validation
    /// failures of its entries).
    #[error("Invalid cart JSON: {0}")]
    Json(#[from] serde_json::Error),

    // =========================================================================
    // Domain Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = OrdersError::InvalidConfig("unit_of_measure must not be empty".into());
        assert_eq!(
            err.to_string(),
            "Invalid orders configuration: unit_of_measure must not be empty"
        );
    }

    #[test]
    fn test_core_error_is_transparent() {
        let core = CoreError::AmountOutOfRange {
            amount: "1e30".into(),
        };
        let err: OrdersError = core.into();
        assert_eq!(err.to_string(), "Amount 1e30 cannot be represented in cents");
    }
}
