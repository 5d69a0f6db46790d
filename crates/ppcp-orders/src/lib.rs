//! # ppcp-orders: Orders API Request Assembly
//!
//! Wraps [`ppcp_core`] with the pieces that touch the outside world:
//! settings files, environment overrides, and the JSON body handed to the
//! gateway HTTP client.
//!
//! ## Quick Start
//! ```rust,no_run
//! use ppcp_orders::{load_cart, OrdersConfig, PurchaseUnitBuilder};
//!
//! let config = OrdersConfig::load_or_default(None);
//! let cart = load_cart("cart.json".as_ref()).unwrap();
//!
//! let unit = PurchaseUnitBuilder::new(&config).build(&cart).unwrap();
//! println!("{}", serde_json::to_string_pretty(&unit).unwrap());
//! ```
//!
//! ## Modules
//! - [`config`] - `OrdersConfig` (TOML + env)
//! - [`purchase_unit`] - `PurchaseUnitBuilder`
//! - [`error`] - `OrdersError`

pub mod config;
pub mod error;
pub mod purchase_unit;

pub use config::{LineItemSettings, OrdersConfig};
pub use error::{OrdersError, OrdersResult};
pub use purchase_unit::{OrderAmount, PurchaseUnit, PurchaseUnitBuilder};

use ppcp_core::CartSnapshot;
use std::path::Path;
use tracing::debug;

/// Reads a cart snapshot from a JSON file.
///
/// Entry validation runs during decoding, so an invalid row (zero
/// quantity, negative tax) fails here with [`OrdersError::Json`].
pub fn load_cart(path: &Path) -> OrdersResult<CartSnapshot> {
    let contents = std::fs::read_to_string(path)?;
    let cart: CartSnapshot = serde_json::from_str(&contents)?;
    debug!(?path, entries = cart.entries.len(), "Cart snapshot loaded");
    Ok(cart)
}
