//! # Money Module
//!
//! Provides the `Money` type and the two conversions every amount in this
//! crate passes through.
//!
//! ## Why Integer Cents?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE RECONCILIATION PROBLEM                                             │
//! │                                                                         │
//! │  PayPal re-adds every line item and compares against item_total:       │
//! │    Σ unit_amount × quantity  ==  item_total   (or the order fails)     │
//! │                                                                         │
//! │  With 2dp strings per unit:                                             │
//! │    $10.00 / 3 = $3.33 (×3 = $9.99)  → 1 cent of drift!                 │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    1000 cents / 3 = 333 cents, remainder 1                             │
//! │    We KNOW we lost 1 cent, and the allocator puts it back explicitly   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ppcp_core::money::{to_cents, to_currency, Money};
//! use rust_decimal::Decimal;
//! use std::str::FromStr;
//!
//! let price = to_cents(Decimal::from_str("10.995").unwrap()).unwrap();
//! assert_eq!(price.cents(), 1100); // half-up
//!
//! assert_eq!(to_currency(Money::from_cents(930)).to_string(), "9.30");
//! assert_eq!(Money::from_cents(930).to_string(), "9.30");
//! ```

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{CoreError, CoreResult};

/// Number of minor units in one major unit.
const CENTS_PER_UNIT: i64 = 100;

/// Decimal places on the wire.
const WIRE_SCALE: u32 = 2;

// =============================================================================
// Conversions
// =============================================================================

/// Converts a decimal amount to integer cents, rounding half-up.
///
/// "Half-up" here means midpoint away from zero, so `-0.005` becomes `-1`
/// cent. Every sum and comparison in the allocator happens on the result.
///
/// ## Example
/// ```rust
/// use ppcp_core::money::to_cents;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(to_cents(Decimal::from_str("2.325").unwrap()).unwrap().cents(), 233);
/// assert_eq!(to_cents(Decimal::from_str("2.324").unwrap()).unwrap().cents(), 232);
/// ```
pub fn to_cents(amount: Decimal) -> CoreResult<Money> {
    Money::try_from_decimal(amount)
}

/// Converts integer cents back to a 2-decimal amount.
#[inline]
pub fn to_currency(money: Money) -> Decimal {
    money.to_decimal()
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: breakdown math subtracts discounts
/// - **No currency field**: one allocation shares one currency, carried by
///   the wire amount type instead
/// - **Serialized as a 2dp string**: that is what the gateway expects
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a decimal amount to cents (half-up).
    ///
    /// ## Errors
    /// [`CoreError::AmountOutOfRange`] when the amount does not fit in `i64`
    /// cents.
    pub fn try_from_decimal(amount: Decimal) -> CoreResult<Self> {
        amount
            .checked_mul(Decimal::ONE_HUNDRED)
            .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
            .and_then(|rounded| rounded.to_i64())
            .map(Money)
            .ok_or_else(|| CoreError::AmountOutOfRange {
                amount: amount.to_string(),
            })
    }

    /// Returns the value as a decimal with exactly two places.
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, WIRE_SCALE)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition; `None` on `i64` overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Checked subtraction; `None` on `i64` overflow.
    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Multiplies money by a quantity; `None` on `i64` overflow.
    ///
    /// ## Example
    /// ```rust
    /// use ppcp_core::money::Money;
    ///
    /// let unit = Money::from_cents(232);
    /// assert_eq!(unit.checked_mul(3), Some(Money::from_cents(696)));
    /// assert_eq!(Money::from_cents(i64::MAX).checked_mul(2), None);
    /// ```
    #[inline]
    pub const fn checked_mul(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Sums an iterator, stopping at the first overflow.
    pub fn checked_sum<I: IntoIterator<Item = Money>>(iter: I) -> Option<Money> {
        iter.into_iter()
            .try_fold(Money::zero(), |acc, money| acc.checked_add(money))
    }

    /// Splits a row amount into a per-unit amount and the drift it leaves.
    ///
    /// The per-unit amount is floor division. The remainder is only computed
    /// when the per-unit amount is non-zero; a zero basis reports no
    /// remainder at all.
    ///
    /// ## Example
    /// ```rust
    /// use ppcp_core::money::Money;
    ///
    /// let (unit, rest) = Money::from_cents(930).split_per_unit(4);
    /// assert_eq!((unit.cents(), rest.cents()), (232, 2));
    ///
    /// let (unit, rest) = Money::from_cents(3).split_per_unit(4);
    /// assert_eq!((unit.cents(), rest.cents()), (0, 0));
    /// ```
    pub fn split_per_unit(&self, qty: i64) -> (Money, Money) {
        let per_unit = self.0.div_euclid(qty.max(1));
        let remainder = if per_unit != 0 {
            self.0 - per_unit * qty.max(1)
        } else {
            0
        };
        (Money(per_unit), Money(remainder))
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Fixed two-decimal rendering, e.g. `15.00` or `-0.05`.
///
/// This is the wire format, so no currency symbol is printed.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let per_unit = CENTS_PER_UNIT.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / per_unit, abs % per_unit)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = rust_decimal::serde::str::deserialize(deserializer)?;
        Money::try_from_decimal(amount).map_err(serde::de::Error::custom)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_to_cents_rounds_half_up() {
        assert_eq!(to_cents(dec!(15.00)).unwrap().cents(), 1500);
        assert_eq!(to_cents(dec!(0.005)).unwrap().cents(), 1);
        assert_eq!(to_cents(dec!(0.0049)).unwrap().cents(), 0);
        assert_eq!(to_cents(dec!(2.675)).unwrap().cents(), 268);
        assert_eq!(to_cents(dec!(-0.005)).unwrap().cents(), -1);
    }

    #[test]
    fn test_to_cents_out_of_range() {
        let huge = Decimal::MAX;
        assert!(matches!(
            to_cents(huge),
            Err(CoreError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn test_to_currency_has_two_places() {
        assert_eq!(to_currency(Money::from_cents(930)), dec!(9.30));
        assert_eq!(to_currency(Money::from_cents(930)).scale(), 2);
        assert_eq!(to_currency(Money::from_cents(-5)).to_string(), "-0.05");
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::from_cents(0).to_string(), "0.00");
        assert_eq!(Money::from_cents(7).to_string(), "0.07");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.checked_mul(3), Some(Money::from_cents(3000)));
        assert_eq!(a.checked_sub(b), Some(b));
        assert_eq!(Money::checked_sum([a, b, b]), Some(Money::from_cents(2000)));
        assert_eq!(Money::checked_sum(Vec::new()), Some(Money::zero()));
    }

    #[test]
    fn test_checked_arithmetic_overflow() {
        let max = Money::from_cents(i64::MAX);
        let min = Money::from_cents(i64::MIN);

        assert_eq!(max.checked_add(Money::from_cents(1)), None);
        assert_eq!(min.checked_sub(Money::from_cents(1)), None);
        assert_eq!(Money::from_cents(5_000_000_000_000_000_000).checked_mul(2), None);
        assert_eq!(
            Money::checked_sum([Money::from_cents(5_000_000_000_000_000_000); 2]),
            None
        );
    }

    #[test]
    fn test_split_per_unit_exact() {
        let (unit, rest) = Money::from_cents(3000).split_per_unit(2);
        assert_eq!(unit.cents(), 1500);
        assert!(rest.is_zero());
    }

    #[test]
    fn test_split_per_unit_with_remainder() {
        let (unit, rest) = Money::from_cents(1000).split_per_unit(3);
        assert_eq!(unit.cents(), 333);
        assert_eq!(rest.cents(), 1);
        assert_eq!(
            unit.checked_mul(3).and_then(|sum| sum.checked_add(rest)),
            Some(Money::from_cents(1000))
        );
    }

    #[test]
    fn test_split_per_unit_zero_basis_reports_no_remainder() {
        let (unit, rest) = Money::from_cents(3).split_per_unit(4);
        assert!(unit.is_zero());
        assert!(rest.is_zero());
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Money::from_cents(1500)).unwrap();
        assert_eq!(json, "\"15.00\"");

        let back: Money = serde_json::from_str("\"2.345\"").unwrap();
        assert_eq!(back.cents(), 235);
    }
}
