//! # Purchase Unit Assembly
//!
//! Builds the `purchase_units[]` element of an Orders API create/update
//! request from a cart snapshot.
//!
//! ## What Gets Sent
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  amount.value          always (grand total)                            │
//! │  amount.breakdown      if enabled AND it reconciles with grand total   │
//! │  items[]               if enabled AND breakdown present                │
//! │                        AND line items reconcile with subtotal/tax      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! PayPal validates `items` against `breakdown.item_total` and
//! `breakdown.tax_total`, so items are dropped whenever the breakdown is.

use ppcp_core::allocator::LineItemAllocator;
use ppcp_core::money::to_cents;
use ppcp_core::{AmountBreakdown, CartSnapshot, CurrencyCode, GatewayLineItem, Money};
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{LineItemSettings, OrdersConfig};
use crate::error::OrdersResult;

/// `purchase_units[].amount`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderAmount {
    pub currency_code: CurrencyCode,
    pub value: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakdown: Option<AmountBreakdown>,
}

/// One `purchase_units[]` element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PurchaseUnit {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reference_id: Option<String>,
    pub amount: OrderAmount,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<GatewayLineItem>>,
}

/// Assembles purchase units with the configured optional data.
#[derive(Debug, Clone)]
pub struct PurchaseUnitBuilder {
    allocator: LineItemAllocator,
    settings: LineItemSettings,
}

impl PurchaseUnitBuilder {
    pub fn new(config: &OrdersConfig) -> Self {
        PurchaseUnitBuilder {
            allocator: LineItemAllocator::new(config.allocator_settings()),
            settings: config.line_items.clone(),
        }
    }

    /// Builds the purchase unit for a cart.
    ///
    /// ## Errors
    /// Only when the grand total itself cannot be expressed in cents. Missing
    /// breakdown or items are logged, not raised.
    pub fn build(&self, cart: &CartSnapshot) -> OrdersResult<PurchaseUnit> {
        let value = to_cents(cart.totals.grand_total)?;
        let breakdown = self.breakdown(cart);
        let items = self.items(cart, breakdown.is_some());

        debug!(
            reference = %cart.reference_or_dash(),
            has_breakdown = breakdown.is_some(),
            item_count = items.as_ref().map_or(0, Vec::len),
            "Purchase unit assembled"
        );

        Ok(PurchaseUnit {
            reference_id: cart.reference.clone(),
            amount: OrderAmount {
                currency_code: cart.currency.clone(),
                value,
                breakdown,
            },
            items,
        })
    }

    fn breakdown(&self, cart: &CartSnapshot) -> Option<AmountBreakdown> {
        if !self.settings.breakdown_enabled {
            return None;
        }
        self.allocator.amount_breakdown(cart)
    }

    fn items(&self, cart: &CartSnapshot, has_breakdown: bool) -> Option<Vec<GatewayLineItem>> {
        if !self.settings.enabled || cart.entries.is_empty() {
            return None;
        }

        if !has_breakdown {
            info!(
                reference = %cart.reference_or_dash(),
                "No amount breakdown, omitting line items"
            );
            return None;
        }

        let items = self.allocator.line_items(cart);
        (!items.is_empty()).then_some(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ppcp_core::{CartLineData, CartLineEntry, CartTotals};
    use rust_decimal_macros::dec;

    fn cart(subtotal: rust_decimal::Decimal) -> CartSnapshot {
        CartSnapshot {
            reference: Some("000000007".into()),
            currency: CurrencyCode::new("EUR").unwrap(),
            entries: vec![CartLineEntry::new(CartLineData {
                product_id: "1".into(),
                name: "Mug".into(),
                sku: "MUG".into(),
                quantity: dec!(2),
                unit_amount: dec!(15.00),
                row_tax: dec!(4.00),
                ..Default::default()
            })
            .unwrap()],
            totals: CartTotals {
                subtotal,
                tax_amount: dec!(4.00),
                grand_total: dec!(34.00),
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_full_purchase_unit() {
        let builder = PurchaseUnitBuilder::new(&OrdersConfig::default());
        let unit = builder.build(&cart(dec!(30.00))).unwrap();

        assert_eq!(unit.reference_id.as_deref(), Some("000000007"));
        assert_eq!(unit.amount.value.cents(), 3400);
        assert!(unit.amount.breakdown.is_some());
        assert_eq!(unit.items.as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_broken_totals_drop_breakdown_and_items() {
        let builder = PurchaseUnitBuilder::new(&OrdersConfig::default());
        let unit = builder.build(&cart(dec!(30.01))).unwrap();

        assert_eq!(unit.amount.value.cents(), 3400);
        assert!(unit.amount.breakdown.is_none());
        assert!(unit.items.is_none());
    }

    #[test]
    fn test_items_disabled() {
        let mut config = OrdersConfig::default();
        config.line_items.enabled = false;

        let unit = PurchaseUnitBuilder::new(&config)
            .build(&cart(dec!(30.00)))
            .unwrap();
        assert!(unit.amount.breakdown.is_some());
        assert!(unit.items.is_none());
    }

    #[test]
    fn test_breakdown_disabled_also_drops_items() {
        let mut config = OrdersConfig::default();
        config.line_items.breakdown_enabled = false;

        let unit = PurchaseUnitBuilder::new(&config)
            .build(&cart(dec!(30.00)))
            .unwrap();
        assert!(unit.amount.breakdown.is_none());
        assert!(unit.items.is_none());
    }
}
