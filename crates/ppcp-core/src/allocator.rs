//! # Line Item Allocator
//!
//! Turns cart rows into PayPal line items whose sums match the cart totals
//! to the cent.
//!
//! ## The Conflict
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cart row:  qty 4, row total $60.00, row tax $9.30                     │
//! │                                                                         │
//! │  PayPal item: whole quantity, 2dp unit amount, 2dp unit tax            │
//! │                                                                         │
//! │  930 cents / 4 = 232 cents per unit, 2 cents left over                 │
//! │  4 × $2.32 = $9.28  ≠  $9.30  → gateway rejects the order              │
//! │                                                                         │
//! │  SPLIT THE ROW:                                                         │
//! │    qty 3 @ $15.00, tax $2.32            (base units)                   │
//! │    qty 1 @ $15.00, tax $2.34            (correction unit, +2 cents)    │
//! │    3 × 232 + 234 = 930 ✓                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Rules
//! - Fractional quantities (1.5 kg) are emitted as one unit carrying the
//!   whole row.
//! - At most one correction unit per cart row; it absorbs the amount
//!   remainder and the tax remainder together.
//! - A zero per-unit basis reports no remainder. The reconciliation pass
//!   catches the resulting shortfall.
//! - Anything that does not reconcile is dropped entirely. Line items are
//!   optional on a gateway order; a wrong one is fatal.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::error::{CoreError, CoreResult};
use crate::format::{format_description, format_name, truncate};
use crate::money::{to_cents, Money};
use crate::types::{
    AmountBreakdown, CartLineEntry, CartSnapshot, CartTotals, CurrencyCode, GatewayLineItem,
    ItemDetail, LineItemMode, Upc, WireAmount,
};
use crate::{
    DEFAULT_UNIT_OF_MEASURE, MAX_COMMODITY_CODE_LENGTH, MAX_SKU_LENGTH, MAX_URL_LENGTH, UPC_TYPE,
};

// =============================================================================
// Settings
// =============================================================================

/// Allocator settings, passed in by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllocatorSettings {
    /// Which optional field set each item carries.
    pub mode: LineItemMode,
    /// Unit of measure for commercial (L3) items.
    pub unit_of_measure: String,
}

impl Default for AllocatorSettings {
    fn default() -> Self {
        AllocatorSettings {
            mode: LineItemMode::Standard,
            unit_of_measure: DEFAULT_UNIT_OF_MEASURE.to_string(),
        }
    }
}

// =============================================================================
// Row Allocation
// =============================================================================

/// Cent-level split of one cart row.
///
/// `base_quantity` units at the per-unit values, plus an optional single
/// correction unit carrying the per-unit values and every remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowAllocation {
    pub quantity: i64,
    pub unit_amount: Money,
    pub unit_tax: Money,
    pub unit_discount: Money,
    pub amount_remainder: Money,
    pub tax_remainder: Money,
    pub discount_remainder: Money,
}

impl RowAllocation {
    /// Splits row totals across `quantity` whole units.
    ///
    /// ## Example
    /// ```rust
    /// use ppcp_core::allocator::RowAllocation;
    /// use ppcp_core::money::Money;
    ///
    /// let row = RowAllocation::split(4, Money::from_cents(6000), Money::from_cents(930), Money::zero());
    /// assert_eq!(row.unit_tax.cents(), 232);
    /// assert_eq!(row.tax_remainder.cents(), 2);
    /// assert!(row.needs_correction());
    /// ```
    pub fn split(quantity: i64, row_amount: Money, row_tax: Money, row_discount: Money) -> Self {
        let (unit_amount, amount_remainder) = row_amount.split_per_unit(quantity);
        let (unit_tax, tax_remainder) = row_tax.split_per_unit(quantity);
        let (unit_discount, discount_remainder) = row_discount.split_per_unit(quantity);

        RowAllocation {
            quantity,
            unit_amount,
            unit_tax,
            unit_discount,
            amount_remainder,
            tax_remainder,
            discount_remainder,
        }
    }

    /// A correction unit is needed when the amount or the tax does not
    /// divide evenly. Discount drift alone never splits a row.
    pub fn needs_correction(&self) -> bool {
        !self.amount_remainder.is_zero() || !self.tax_remainder.is_zero()
    }
}

// =============================================================================
// Allocator
// =============================================================================

/// Builds line items and the amount breakdown for a cart snapshot.
///
/// ## User Workflow
/// ```text
/// Order create/update request being prepared
///      │
///      ▼
/// amount_breakdown(cart) ── None ──► send amount without breakdown
///      │ Some
///      ▼
/// line_items(cart) ── empty ──► send order without items
///      │ non-empty
///      ▼
/// purchase unit with breakdown + items
/// ```
#[derive(Debug, Clone, Default)]
pub struct LineItemAllocator {
    settings: AllocatorSettings,
}

impl LineItemAllocator {
    pub fn new(settings: AllocatorSettings) -> Self {
        LineItemAllocator { settings }
    }

    pub fn settings(&self) -> &AllocatorSettings {
        &self.settings
    }

    /// Allocates every entry into one or two gateway line items.
    ///
    /// This does not reconcile against cart totals; use
    /// [`line_items`](Self::line_items) for that.
    ///
    /// ## Errors
    /// Only for values that cannot be represented: an amount outside the
    /// `i64` cent range or a quantity outside `i64`.
    pub fn allocate_line_items(
        &self,
        entries: &[CartLineEntry],
        currency: &CurrencyCode,
    ) -> CoreResult<Vec<GatewayLineItem>> {
        let mut items = Vec::with_capacity(entries.len());

        for entry in entries {
            let quantity = emitted_quantity(entry)?;
            let row_amount = entry.row_amount().ok_or_else(|| CoreError::AmountOutOfRange {
                amount: format!("{} x {}", entry.unit_amount(), entry.quantity()),
            })?;

            let row = RowAllocation::split(
                quantity,
                to_cents(row_amount)?,
                to_cents(entry.row_tax())?,
                to_cents(entry.row_discount())?,
            );

            if row.needs_correction() {
                debug!(
                    sku = %entry.sku(),
                    quantity,
                    amount_remainder = row.amount_remainder.cents(),
                    tax_remainder = row.tax_remainder.cents(),
                    "Splitting row with a correction unit"
                );

                if row.quantity > 1 {
                    items.push(self.build_item(
                        entry,
                        currency,
                        row.quantity - 1,
                        row.unit_amount,
                        row.unit_tax,
                        row.unit_discount,
                    ));
                }
                items.push(self.build_item(
                    entry,
                    currency,
                    1,
                    row.unit_amount + row.amount_remainder,
                    row.unit_tax + row.tax_remainder,
                    row.unit_discount + row.discount_remainder,
                ));
            } else {
                items.push(self.build_item(
                    entry,
                    currency,
                    row.quantity,
                    row.unit_amount,
                    row.unit_tax,
                    row.unit_discount,
                ));
            }
        }

        Ok(items)
    }

    /// Line items for the cart, or an empty vector when they would not add
    /// up to the cart's own subtotal and item tax.
    ///
    /// The sums are recomputed from the emitted items, independently of the
    /// allocation arithmetic.
    pub fn line_items(&self, cart: &CartSnapshot) -> Vec<GatewayLineItem> {
        let items = match self.allocate_line_items(&cart.entries, &cart.currency) {
            Ok(items) => items,
            Err(e) => {
                warn!(reference = %cart.reference_or_dash(), error = %e, "Line item allocation failed, omitting items");
                return Vec::new();
            }
        };

        let expected = match expected_item_totals(&cart.totals) {
            Ok(expected) => expected,
            Err(e) => {
                warn!(reference = %cart.reference_or_dash(), error = %e, "Cart totals unusable, omitting items");
                return Vec::new();
            }
        };

        let Some((amount_sum, tax_sum)) = item_sums(&items) else {
            warn!(reference = %cart.reference_or_dash(), count = items.len(), "Line item sums overflow, omitting items");
            return Vec::new();
        };

        if amount_sum != expected.subtotal || tax_sum != expected.item_tax {
            info!(
                reference = %cart.reference_or_dash(),
                expected_subtotal = expected.subtotal.cents(),
                actual_subtotal = amount_sum.cents(),
                expected_tax = expected.item_tax.cents(),
                actual_tax = tax_sum.cents(),
                "Line items do not reconcile with cart totals, omitting items"
            );
            return Vec::new();
        }

        debug!(reference = %cart.reference_or_dash(), count = items.len(), "Line items reconciled");
        items
    }

    /// The `amount.breakdown` object, or `None` when its parts do not add up
    /// to the grand total.
    ///
    /// ```text
    /// item_total + shipping + tax_total - discount == grand_total
    ///
    /// shipping  = shipping_amount + shipping_tax
    /// tax_total = tax_amount - shipping_tax
    /// discount  = |discount_amount|
    /// ```
    pub fn amount_breakdown(&self, cart: &CartSnapshot) -> Option<AmountBreakdown> {
        let parts = match BreakdownCents::from_totals(&cart.totals) {
            Ok(parts) => parts,
            Err(e) => {
                warn!(reference = %cart.reference_or_dash(), error = %e, "Cart totals unusable, omitting breakdown");
                return None;
            }
        };

        let Some(computed) = parts.computed_total() else {
            warn!(reference = %cart.reference_or_dash(), "Amount breakdown sum overflows, omitting breakdown");
            return None;
        };

        if computed != parts.grand_total {
            info!(
                reference = %cart.reference_or_dash(),
                expected_total = parts.grand_total.cents(),
                actual_total = computed.cents(),
                "Amount breakdown does not reconcile with grand total, omitting breakdown"
            );
            return None;
        }

        let currency = &cart.currency;
        Some(AmountBreakdown {
            item_total: WireAmount::new(currency, parts.item_total),
            shipping: WireAmount::new(currency, parts.shipping),
            tax_total: WireAmount::new(currency, parts.tax_total),
            discount: WireAmount::new(currency, parts.discount),
        })
    }

    fn build_item(
        &self,
        entry: &CartLineEntry,
        currency: &CurrencyCode,
        quantity: i64,
        unit_amount: Money,
        unit_tax: Money,
        unit_discount: Money,
    ) -> GatewayLineItem {
        let detail = match self.settings.mode {
            LineItemMode::Standard => ItemDetail::Standard {
                sku: truncate(entry.sku(), MAX_SKU_LENGTH),
                url: entry.product_url().map(|url| truncate(url, MAX_URL_LENGTH)),
                category: entry.category(),
            },
            LineItemMode::Commercial => ItemDetail::Commercial {
                commodity_code: truncate(entry.sku(), MAX_COMMODITY_CODE_LENGTH),
                discount_amount: WireAmount::new(currency, unit_discount),
                unit_of_measure: self.settings.unit_of_measure.clone(),
            },
        };

        GatewayLineItem {
            name: format_name(entry.name()),
            quantity,
            unit_amount: WireAmount::new(currency, unit_amount),
            tax: WireAmount::new(currency, unit_tax),
            description: format_description(entry.description()),
            upc: entry.upc().map(|code| Upc {
                kind: UPC_TYPE.to_string(),
                code: code.to_string(),
            }),
            detail,
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Whole-unit quantity to emit for an entry.
///
/// Fractional quantities always become a single unit, whatever their size.
fn emitted_quantity(entry: &CartLineEntry) -> CoreResult<i64> {
    if entry.has_fractional_quantity() {
        return Ok(1);
    }

    entry
        .quantity()
        .to_i64()
        .filter(|qty| *qty > 0)
        .ok_or_else(|| CoreError::QuantityOutOfRange {
            sku: entry.sku().to_string(),
            quantity: entry.quantity().to_string(),
        })
}

/// Re-sums emitted items as `(Σ unit_amount × quantity, Σ tax × quantity)`.
fn item_sums(items: &[GatewayLineItem]) -> Option<(Money, Money)> {
    items
        .iter()
        .try_fold((Money::zero(), Money::zero()), |(amount, tax), item| {
            Some((
                amount.checked_add(item.amount_total()?)?,
                tax.checked_add(item.tax_total()?)?,
            ))
        })
}

/// What the emitted items must add up to.
struct ExpectedItemTotals {
    subtotal: Money,
    item_tax: Money,
}

fn expected_item_totals(totals: &CartTotals) -> CoreResult<ExpectedItemTotals> {
    Ok(ExpectedItemTotals {
        subtotal: to_cents(totals.subtotal)?,
        item_tax: to_cents(checked_sub(totals.tax_amount, totals.shipping_tax)?)?,
    })
}

/// Breakdown parts in cents.
struct BreakdownCents {
    item_total: Money,
    shipping: Money,
    tax_total: Money,
    discount: Money,
    grand_total: Money,
}

impl BreakdownCents {
    fn from_totals(totals: &CartTotals) -> CoreResult<Self> {
        let shipping = totals
            .shipping_amount
            .checked_add(totals.shipping_tax)
            .ok_or_else(|| out_of_range(totals.shipping_amount))?;

        Ok(BreakdownCents {
            item_total: to_cents(totals.subtotal)?,
            shipping: to_cents(shipping)?,
            tax_total: to_cents(checked_sub(totals.tax_amount, totals.shipping_tax)?)?,
            discount: to_cents(totals.discount_amount.abs())?,
            grand_total: to_cents(totals.grand_total)?,
        })
    }

    /// `item_total + shipping + tax_total - discount`.
    fn computed_total(&self) -> Option<Money> {
        self.item_total
            .checked_add(self.shipping)?
            .checked_add(self.tax_total)?
            .checked_sub(self.discount)
    }
}

fn checked_sub(a: Decimal, b: Decimal) -> CoreResult<Decimal> {
    a.checked_sub(b).ok_or_else(|| out_of_range(a))
}

fn out_of_range(amount: Decimal) -> CoreError {
    CoreError::AmountOutOfRange {
        amount: amount.to_string(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
