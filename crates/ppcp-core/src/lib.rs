//! # ppcp-core: Pure Line Item Allocation for PayPal Orders
//!
//! This crate converts a cart snapshot into PayPal-compliant line items and
//! an amount breakdown. It has zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Order Request Preparation                          │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Cart / Quote source (platform, external)           │   │
//! │  │    items, address totals, currency                              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ CartSnapshot                           │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ ppcp-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │ allocator │  │  format   │  │   │
//! │  │   │   Cart    │  │   Money   │  │ LineItems │  │  names    │  │   │
//! │  │   │ LineItem  │  │  cents    │  │ Breakdown │  │  sku/url  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ppcp-orders (purchase unit, settings)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Cart snapshot and gateway wire types
//! - [`money`] - Integer-cent money and the decimal conversions
//! - [`allocator`] - Line item proration, correction units, reconciliation
//! - [`format`] - Name/SKU/URL cleaning and truncation
//! - [`error`] - Domain error types
//! - [`validation`] - Snapshot validation rules
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same snapshot in, same items out
//! 2. **Integer Money**: every sum and comparison happens in cents
//! 3. **Fail Closed**: data that does not reconcile is omitted, never sent
//!
//! ## Example Usage
//!
//! ```rust
//! use ppcp_core::{CartLineData, CartLineEntry, CartSnapshot, CartTotals, CurrencyCode};
//! use ppcp_core::allocator::LineItemAllocator;
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! let d = |s: &str| Decimal::from_str(s).unwrap();
//! let cart = CartSnapshot {
//!     reference: Some("000000001".into()),
//!     currency: CurrencyCode::new("USD").unwrap(),
//!     entries: vec![CartLineEntry::new(CartLineData {
//!         product_id: "1".into(),
//!         name: "Mug".into(),
//!         sku: "MUG".into(),
//!         quantity: d("4"),
//!         unit_amount: d("15.00"),
//!         row_tax: d("9.30"),
//!         ..Default::default()
//!     }).unwrap()],
//!     totals: CartTotals {
//!         subtotal: d("60.00"),
//!         tax_amount: d("9.30"),
//!         grand_total: d("69.30"),
//!         ..Default::default()
//!     },
//! };
//!
//! let items = LineItemAllocator::default().line_items(&cart);
//! assert_eq!(items.len(), 2); // qty 3 @ tax 2.32, qty 1 @ tax 2.34
//! assert_eq!(items[1].tax.value.to_string(), "2.34");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocator;
pub mod error;
pub mod format;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use allocator::{AllocatorSettings, LineItemAllocator};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Placeholder for a name with nothing printable left after cleaning.
pub const NOT_AVAILABLE: &str = "not available";

/// PayPal limit on item `name` and `description`.
pub const MAX_NAME_LENGTH: usize = 127;

/// PayPal limit on item `sku`.
pub const MAX_SKU_LENGTH: usize = 127;

/// PayPal limit on item `url`.
pub const MAX_URL_LENGTH: usize = 2048;

/// Level 3 limit on `commodity_code`.
pub const MAX_COMMODITY_CODE_LENGTH: usize = 12;

/// Unit of measure sent with Level 3 items unless configured otherwise.
pub const DEFAULT_UNIT_OF_MEASURE: &str = "ITM";

/// `upc.type` for catalog barcodes.
pub const UPC_TYPE: &str = "UPC-A";
