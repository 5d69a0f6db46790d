//! # Domain Types
//!
//! Cart snapshot types (input) and gateway wire types (output).
//!
//! ## Type Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUT (immutable snapshot)          OUTPUT (PayPal Orders API shapes)  │
//! │  ┌─────────────────┐                 ┌─────────────────┐                │
//! │  │  CartSnapshot   │                 │ GatewayLineItem │                │
//! │  │  ─────────────  │   allocator     │  ─────────────  │                │
//! │  │  reference      │ ──────────────► │  name           │                │
//! │  │  currency       │                 │  quantity "3"   │                │
//! │  │  entries[]      │                 │  unit_amount    │                │
//! │  │  totals         │                 │  tax            │                │
//! │  └─────────────────┘                 │  detail (mode)  │                │
//! │                                      └─────────────────┘                │
//! │  ┌─────────────────┐                 ┌─────────────────┐                │
//! │  │ CartLineEntry   │                 │ AmountBreakdown │                │
//! │  │ qty: Decimal    │                 │ item_total      │                │
//! │  │ unit_amount     │                 │ shipping        │                │
//! │  │ row_tax         │                 │ tax_total       │                │
//! │  │ row_discount    │                 │ discount        │                │
//! │  └─────────────────┘                 └─────────────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Entries are frozen copies of cart rows taken when a gateway request is
//! prepared. Nothing here is mutated after construction.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    validate_amount, validate_currency_code, validate_quantity, validate_required,
    ValidationResult,
};

// =============================================================================
// Currency Code
// =============================================================================

/// ISO 4217 currency code, e.g. `USD`.
///
/// Lower-case input is normalized; anything that is not three letters is
/// rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CurrencyCode(String);

impl CurrencyCode {
    /// Parses and normalizes a currency code.
    pub fn new(code: &str) -> ValidationResult<Self> {
        let normalized = code.trim().to_ascii_uppercase();
        validate_currency_code(&normalized)?;
        Ok(CurrencyCode(normalized))
    }

    /// Returns the code as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for CurrencyCode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CurrencyCode::new(s)
    }
}

impl TryFrom<String> for CurrencyCode {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        CurrencyCode::new(&value)
    }
}

impl From<CurrencyCode> for String {
    fn from(code: CurrencyCode) -> Self {
        code.0
    }
}

// =============================================================================
// Cart Line Entry
// =============================================================================

/// Raw field set for a cart row, before validation.
///
/// This is also the JSON shape a [`CartLineEntry`] is read from.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CartLineData {
    pub product_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub sku: String,
    pub quantity: Decimal,
    /// Unit price in the store's base currency.
    pub unit_amount: Decimal,
    #[serde(default)]
    pub row_tax: Decimal,
    #[serde(default)]
    pub row_discount: Decimal,
    #[serde(default)]
    pub is_virtual: bool,
    #[serde(default)]
    pub product_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// UPC-A barcode, if the catalog carries one.
    #[serde(default)]
    pub upc: Option<String>,
}

/// One cart row, frozen at allocation time.
///
/// ## Invariants
/// - `quantity > 0` (possibly fractional)
/// - `unit_amount`, `row_tax`, `row_discount` are never negative
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "CartLineData")]
pub struct CartLineEntry {
    product_id: String,
    name: String,
    sku: String,
    quantity: Decimal,
    unit_amount: Decimal,
    row_tax: Decimal,
    row_discount: Decimal,
    is_virtual: bool,
    product_url: Option<String>,
    description: Option<String>,
    upc: Option<String>,
}

impl CartLineEntry {
    /// Validates raw row data and freezes it.
    ///
    /// ## Example
    /// ```rust
    /// use ppcp_core::types::{CartLineData, CartLineEntry};
    /// use rust_decimal::Decimal;
    ///
    /// let entry = CartLineEntry::new(CartLineData {
    ///     product_id: "42".into(),
    ///     sku: "MUG-1".into(),
    ///     quantity: Decimal::from(2),
    ///     unit_amount: Decimal::from(15),
    ///     ..Default::default()
    /// })
    /// .unwrap();
    /// assert_eq!(entry.sku(), "MUG-1");
    ///
    /// let zero_qty = CartLineEntry::new(CartLineData {
    ///     product_id: "42".into(),
    ///     ..Default::default()
    /// });
    /// assert!(zero_qty.is_err());
    /// ```
    pub fn new(data: CartLineData) -> ValidationResult<Self> {
        validate_required("product_id", &data.product_id)?;
        validate_quantity(data.quantity)?;
        validate_amount("unit_amount", data.unit_amount)?;
        validate_amount("row_tax", data.row_tax)?;
        validate_amount("row_discount", data.row_discount)?;

        Ok(CartLineEntry {
            product_id: data.product_id,
            name: data.name,
            sku: data.sku,
            quantity: data.quantity,
            unit_amount: data.unit_amount,
            row_tax: data.row_tax,
            row_discount: data.row_discount,
            is_virtual: data.is_virtual,
            product_url: data.product_url.filter(|url| !url.trim().is_empty()),
            description: data.description,
            upc: data.upc.filter(|code| !code.trim().is_empty()),
        })
    }

    pub fn product_id(&self) -> &str {
        &self.product_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sku(&self) -> &str {
        &self.sku
    }

    pub fn quantity(&self) -> Decimal {
        self.quantity
    }

    pub fn unit_amount(&self) -> Decimal {
        self.unit_amount
    }

    /// Row total before tax: `unit_amount × quantity`.
    ///
    /// `None` only when the multiplication overflows `Decimal`.
    pub fn row_amount(&self) -> Option<Decimal> {
        self.unit_amount.checked_mul(self.quantity)
    }

    pub fn row_tax(&self) -> Decimal {
        self.row_tax
    }

    pub fn row_discount(&self) -> Decimal {
        self.row_discount
    }

    pub fn is_virtual(&self) -> bool {
        self.is_virtual
    }

    pub fn product_url(&self) -> Option<&str> {
        self.product_url.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn upc(&self) -> Option<&str> {
        self.upc.as_deref()
    }

    /// Returns true when the quantity has a fractional part (e.g. 1.5 kg).
    pub fn has_fractional_quantity(&self) -> bool {
        !self.quantity.fract().is_zero()
    }

    /// Returns the category PayPal should see for this row.
    pub fn category(&self) -> ItemCategory {
        if self.is_virtual {
            ItemCategory::DigitalGoods
        } else {
            ItemCategory::PhysicalGoods
        }
    }
}

impl TryFrom<CartLineData> for CartLineEntry {
    type Error = ValidationError;

    fn try_from(data: CartLineData) -> Result<Self, Self::Error> {
        CartLineEntry::new(data)
    }
}

// =============================================================================
// Cart Totals & Snapshot
// =============================================================================

/// Address-level totals, as computed by the cart's own totals collectors.
///
/// These are authoritative: the allocator never trusts its own sums over
/// these values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    #[serde(default)]
    pub shipping_amount: Decimal,
    /// Tax charged on shipping, included in `tax_amount`.
    #[serde(default)]
    pub shipping_tax: Decimal,
    /// Total tax, shipping tax included.
    #[serde(default)]
    pub tax_amount: Decimal,
    /// Discount total. The platform stores this negative; the sign is ignored.
    #[serde(default)]
    pub discount_amount: Decimal,
    pub grand_total: Decimal,
}

/// Everything the allocator reads for one gateway request.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CartSnapshot {
    /// Order increment id (or quote id); only used in log output.
    #[serde(default)]
    pub reference: Option<String>,
    pub currency: CurrencyCode,
    pub entries: Vec<CartLineEntry>,
    pub totals: CartTotals,
}

impl CartSnapshot {
    /// Returns the reference for log fields, or `"-"` when unknown.
    pub fn reference_or_dash(&self) -> &str {
        self.reference.as_deref().unwrap_or("-")
    }
}

// =============================================================================
// Line Item Mode & Category
// =============================================================================

/// Which optional field set each emitted line item carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineItemMode {
    /// `sku`, `url`, `category`.
    #[default]
    Standard,
    /// Level 3 card data: `commodity_code`, `discount_amount`,
    /// `unit_of_measure`.
    #[serde(alias = "l3")]
    Commercial,
}

impl fmt::Display for LineItemMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineItemMode::Standard => write!(f, "standard"),
            LineItemMode::Commercial => write!(f, "commercial"),
        }
    }
}

impl FromStr for LineItemMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "standard" => Ok(LineItemMode::Standard),
            "commercial" | "l3" => Ok(LineItemMode::Commercial),
            other => Err(ValidationError::InvalidFormat {
                field: "mode".to_string(),
                reason: format!("unknown line item mode '{}'", other),
            }),
        }
    }
}

/// PayPal item category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemCategory {
    DigitalGoods,
    PhysicalGoods,
}

// =============================================================================
// Wire Types
// =============================================================================

/// `{ "currency_code": "USD", "value": "15.00" }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WireAmount {
    pub currency_code: CurrencyCode,
    pub value: Money,
}

impl WireAmount {
    pub fn new(currency: &CurrencyCode, value: Money) -> Self {
        WireAmount {
            currency_code: currency.clone(),
            value,
        }
    }
}

/// Universal product code attached to a line item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Upc {
    #[serde(rename = "type")]
    pub kind: String,
    pub code: String,
}

/// Mode-specific fields of a line item, flattened into the item object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ItemDetail {
    Standard {
        sku: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        url: Option<String>,
        category: ItemCategory,
    },
    Commercial {
        commodity_code: String,
        discount_amount: WireAmount,
        unit_of_measure: String,
    },
}

/// One entry of the Orders API `items` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GatewayLineItem {
    pub name: String,
    /// Whole units; PayPal wants this as a string.
    #[serde(serialize_with = "quantity_as_string")]
    pub quantity: i64,
    pub unit_amount: WireAmount,
    pub tax: WireAmount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upc: Option<Upc>,
    #[serde(flatten)]
    pub detail: ItemDetail,
}

impl GatewayLineItem {
    /// `unit_amount × quantity`, or `None` on overflow.
    pub fn amount_total(&self) -> Option<Money> {
        self.unit_amount.value.checked_mul(self.quantity)
    }

    /// `tax × quantity`, or `None` on overflow.
    pub fn tax_total(&self) -> Option<Money> {
        self.tax.value.checked_mul(self.quantity)
    }
}

fn quantity_as_string<S: Serializer>(quantity: &i64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(quantity)
}

/// The `amount.breakdown` object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AmountBreakdown {
    pub item_total: WireAmount,
    pub shipping: WireAmount,
    pub tax_total: WireAmount,
    pub discount: WireAmount,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn usd() -> CurrencyCode {
        CurrencyCode::new("USD").unwrap()
    }

    #[test]
    fn test_currency_code_normalizes() {
        assert_eq!(CurrencyCode::new(" usd ").unwrap().as_str(), "USD");
        assert!(CurrencyCode::new("dollars").is_err());
        assert!("EU".parse::<CurrencyCode>().is_err());
    }

    #[test]
    fn test_cart_line_entry_validation() {
        let base = CartLineData {
            product_id: "1".into(),
            quantity: dec!(1),
            unit_amount: dec!(5),
            ..Default::default()
        };
        assert!(CartLineEntry::new(base.clone()).is_ok());

        let negative_tax = CartLineData {
            row_tax: dec!(-1),
            ..base.clone()
        };
        assert!(CartLineEntry::new(negative_tax).is_err());

        let missing_id = CartLineData {
            product_id: String::new(),
            ..base
        };
        assert!(CartLineEntry::new(missing_id).is_err());
    }

    #[test]
    fn test_fractional_quantity_detection() {
        let entry = CartLineEntry::new(CartLineData {
            product_id: "1".into(),
            quantity: dec!(1.5),
            unit_amount: dec!(5),
            ..Default::default()
        })
        .unwrap();
        assert!(entry.has_fractional_quantity());
        assert_eq!(entry.row_amount(), Some(dec!(7.5)));

        let whole = CartLineEntry::new(CartLineData {
            product_id: "1".into(),
            quantity: dec!(2.0000),
            unit_amount: dec!(5),
            ..Default::default()
        })
        .unwrap();
        assert!(!whole.has_fractional_quantity());
    }

    #[test]
    fn test_snapshot_deserializes_and_validates() {
        let snapshot: CartSnapshot = serde_json::from_value(json!({
            "reference": "000000123",
            "currency": "usd",
            "entries": [{
                "product_id": "7",
                "name": "Mug",
                "sku": "MUG-1",
                "quantity": "2",
                "unit_amount": "15.00",
                "row_tax": "4.00",
                "product_url": ""
            }],
            "totals": { "subtotal": "30.00", "grand_total": "34.00", "tax_amount": "4.00" }
        }))
        .unwrap();

        assert_eq!(snapshot.currency, usd());
        assert_eq!(snapshot.entries[0].product_url(), None);
        assert_eq!(snapshot.totals.shipping_amount, dec!(0));

        let bad = serde_json::from_value::<CartSnapshot>(json!({
            "currency": "USD",
            "entries": [{ "product_id": "7", "quantity": "0", "unit_amount": "1" }],
            "totals": { "subtotal": "0", "grand_total": "0" }
        }));
        let err = bad.unwrap_err().to_string();
        assert!(err.contains("quantity must be positive"), "{}", err);
    }

    #[test]
    fn test_line_item_mode_parsing() {
        assert_eq!("standard".parse::<LineItemMode>().unwrap(), LineItemMode::Standard);
        assert_eq!("L3".parse::<LineItemMode>().unwrap(), LineItemMode::Commercial);
        assert_eq!(
            "commercial".parse::<LineItemMode>().unwrap(),
            LineItemMode::Commercial
        );
        assert!("level4".parse::<LineItemMode>().is_err());
    }

    #[test]
    fn test_standard_item_wire_shape() {
        let item = GatewayLineItem {
            name: "Mug".into(),
            quantity: 3,
            unit_amount: WireAmount::new(&usd(), Money::from_cents(1500)),
            tax: WireAmount::new(&usd(), Money::from_cents(232)),
            description: None,
            upc: Some(Upc {
                kind: "UPC-A".into(),
                code: "012345678905".into(),
            }),
            detail: ItemDetail::Standard {
                sku: "MUG-1".into(),
                url: None,
                category: ItemCategory::PhysicalGoods,
            },
        };

        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({
                "name": "Mug",
                "quantity": "3",
                "unit_amount": { "currency_code": "USD", "value": "15.00" },
                "tax": { "currency_code": "USD", "value": "2.32" },
                "upc": { "type": "UPC-A", "code": "012345678905" },
                "sku": "MUG-1",
                "category": "PHYSICAL_GOODS"
            })
        );
        assert_eq!(item.amount_total(), Some(Money::from_cents(4500)));
        assert_eq!(item.tax_total(), Some(Money::from_cents(696)));
    }

    #[test]
    fn test_commercial_item_wire_shape() {
        let item = GatewayLineItem {
            name: "Bolt".into(),
            quantity: 1,
            unit_amount: WireAmount::new(&usd(), Money::from_cents(99)),
            tax: WireAmount::new(&usd(), Money::from_cents(8)),
            description: Some("Steel".into()),
            upc: None,
            detail: ItemDetail::Commercial {
                commodity_code: "BOLT-M8".into(),
                discount_amount: WireAmount::new(&usd(), Money::zero()),
                unit_of_measure: "ITM".into(),
            },
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["commodity_code"], "BOLT-M8");
        assert_eq!(value["discount_amount"]["value"], "0.00");
        assert_eq!(value["unit_of_measure"], "ITM");
        assert_eq!(value["description"], "Steel");
        assert!(value.get("category").is_none());
        assert!(value.get("sku").is_none());
    }
}
