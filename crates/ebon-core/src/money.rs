//! # Money Module
//!
//! Provides the `Money` type for monetary values on a receipt.
//!
//! ## Why Decimal Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The parser hands us JSON numbers:                                      │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Exact Decimals                                           │
//! │    "subTotal": 2.99       →  Money(2.99)   →  "subTotal": 2.99          │
//! │    "pricePerUnit": 1.799  →  Money(1.799)  →  "pricePerUnit": 1.799     │
//! │    Nothing is rounded on decode; comparisons are exact decimal math     │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use ebon_core::money::Money;
//!
//! let net = Money::from_cents(1099); // 10.99 €
//! let tax = Money::from_cents(209);  //  2.09 €
//! assert_eq!(net.checked_add(tax), Some(Money::from_cents(1308)));
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use ts_rs::TS;

use crate::number;

/// Decimal places a till prints for an amount.
const MONEY_SCALE: u32 = 2;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in euros.
///
/// ## Design Decisions
/// - **Decimal, not cents**: per-unit prices such as fuel or per-kg base
///   prices carry a third decimal (`1.799`), and decoding must not lose it
/// - **Signed**: Deposit returns ("Leergut") produce negative lines
/// - **Checked arithmetic only**: amounts come from untrusted input
/// - **Wire format**: A JSON number in euros (`2.99`), see [`crate::number`]
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  ReceiptItem.subTotal / pricePerUnit                                    │
/// │  Receipt.total / change / payout                                        │
/// │  Payment.value                                                          │
/// │  PaybackData.qualifiedRevenue / usedREWECredit / newREWECredit          │
/// │  TaxDetailsEntry.net / tax / gross                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct Money(#[ts(type = "number")] Decimal);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use ebon_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.to_string(), "10.99 €");
    /// ```
    #[inline]
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, MONEY_SCALE))
    }

    /// Wraps a decimal euro amount as is.
    ///
    /// ## Example
    /// ```rust
    /// use ebon_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let per_litre = Money::from_decimal(Decimal::new(1799, 3)); // 1.799 €
    /// assert_eq!(per_litre.to_decimal(), Decimal::new(1799, 3));
    /// ```
    #[inline]
    pub const fn from_decimal(amount: Decimal) -> Self {
        Money(amount)
    }

    /// Returns the amount as a decimal in euros.
    #[inline]
    pub const fn to_decimal(&self) -> Decimal {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Returns the absolute value.
    #[inline]
    pub fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Adds two amounts. Returns `None` on overflow.
    #[inline]
    pub fn checked_add(self, other: Money) -> Option<Self> {
        self.0.checked_add(other.0).map(Money)
    }

    /// Subtracts `other`. Returns `None` on overflow.
    #[inline]
    pub fn checked_sub(self, other: Money) -> Option<Self> {
        self.0.checked_sub(other.0).map(Money)
    }

    /// Multiplies a unit price by a (possibly fractional) quantity.
    ///
    /// The result is rounded half away from zero to whole cents, the way a
    /// till prints the line. Returns `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use ebon_core::money::Money;
    /// use rust_decimal::Decimal;
    ///
    /// let per_kg = Money::from_cents(299);  // 2.99 €/kg
    /// let weight = Decimal::new(456, 3);    // 0.456 kg
    /// // 2.99 × 0.456 = 1.36344 → 1.36 €
    /// assert_eq!(per_kg.multiply_quantity(weight), Some(Money::from_cents(136)));
    /// ```
    pub fn multiply_quantity(&self, quantity: Decimal) -> Option<Self> {
        let amount = self.0.checked_mul(quantity)?;
        Some(Money(amount.round_dp_with_strategy(
            MONEY_SCALE,
            RoundingStrategy::MidpointAwayFromZero,
        )))
    }

    /// Returns true if the two amounts differ by at most `tolerance`.
    ///
    /// A difference too large to compute is never within tolerance.
    #[inline]
    pub fn within(&self, other: Money, tolerance: Money) -> bool {
        match self.checked_sub(other) {
            Some(diff) => diff.abs() <= tolerance.abs(),
            None => false,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `10.99 €`, with more places only when the amount has them.
///
/// ## Note
/// This is for logs and the CLI summary. Receipt consumers do their own
/// localized formatting.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let places = self.0.scale().max(MONEY_SCALE) as usize;
        write!(f, "{:.*} €", places, self.0)
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Serialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        number::serialize_decimal(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        number::deserialize_decimal(deserializer).map(Money)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn euros(raw: &str) -> Money {
        Money::from_decimal(Decimal::from_str(raw).unwrap())
    }

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.to_decimal(), Decimal::from_str("10.99").unwrap());
        assert_eq!(Money::from_cents(-550), euros("-5.5"));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "10.99 €");
        assert_eq!(format!("{}", Money::from_cents(500)), "5.00 €");
        assert_eq!(format!("{}", Money::from_cents(-25)), "-0.25 €");
        assert_eq!(format!("{}", Money::zero()), "0.00 €");
        assert_eq!(format!("{}", euros("4")), "4.00 €");
        assert_eq!(format!("{}", euros("1.799")), "1.799 €");
    }

    #[test]
    fn test_checked_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!(a.checked_add(b), Some(Money::from_cents(1500)));
        assert_eq!(a.checked_sub(b), Some(Money::from_cents(500)));
        assert_eq!(b.checked_sub(a), Some(Money::from_cents(-500)));

        let max = Money::from_decimal(Decimal::MAX);
        assert_eq!(max.checked_add(a), None);
        assert_eq!(Money::from_decimal(Decimal::MIN).checked_sub(a), None);
    }

    #[test]
    fn test_abs() {
        let deposit_return = Money::from_cents(-25);
        assert_eq!(deposit_return.abs(), Money::from_cents(25));
        assert_eq!(Money::zero().abs(), Money::zero());
    }

    #[test]
    fn test_equality_ignores_trailing_zeros() {
        assert_eq!(euros("1.36"), euros("1.360"));
        assert_eq!(euros("5"), Money::from_cents(500));
    }

    #[test]
    fn test_multiply_weighed_quantity() {
        let per_kg = Money::from_cents(1999);
        let weight = Decimal::from_str("0.352").unwrap();
        // 19.99 × 0.352 = 7.03648
        assert_eq!(per_kg.multiply_quantity(weight), Some(Money::from_cents(704)));
    }

    #[test]
    fn test_multiply_three_decimal_unit_price() {
        // 1.799 €/l × 20 l = 35.98 €
        let per_litre = euros("1.799");
        assert_eq!(
            per_litre.multiply_quantity(Decimal::from(20)),
            Some(Money::from_cents(3598))
        );
    }

    #[test]
    fn test_multiply_piece_quantity() {
        let unit_price = Money::from_cents(89);
        assert_eq!(
            unit_price.multiply_quantity(Decimal::from(3)),
            Some(Money::from_cents(267))
        );
    }

    #[test]
    fn test_multiply_overflow() {
        let huge = Money::from_decimal(Decimal::MAX);
        assert_eq!(huge.multiply_quantity(Decimal::from(2)), None);
    }

    #[test]
    fn test_within_tolerance() {
        let a = Money::from_cents(1000);
        assert!(a.within(Money::from_cents(1001), Money::from_cents(1)));
        assert!(!a.within(Money::from_cents(1002), Money::from_cents(1)));
        assert!(a.within(a, Money::zero()));
        assert!(!a.within(euros("10.001"), Money::zero()));
    }

    #[test]
    fn test_within_never_overflows() {
        let max = Money::from_decimal(Decimal::MAX);
        let min = Money::from_decimal(Decimal::MIN);
        assert!(!max.within(min, Money::from_cents(1)));
        assert!(!min.within(max, Money::from_decimal(Decimal::MAX)));
    }

    #[test]
    fn test_json_uses_euro_numbers() {
        assert_eq!(serde_json::to_string(&Money::from_cents(299)).unwrap(), "2.99");
        assert_eq!(serde_json::to_string(&Money::from_cents(500)).unwrap(), "5");
        assert_eq!(serde_json::to_string(&Money::from_cents(-25)).unwrap(), "-0.25");

        let parsed: Money = serde_json::from_str("12.3").unwrap();
        assert_eq!(parsed, Money::from_cents(1230));
        let parsed: Money = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, Money::from_cents(400));
    }

    #[test]
    fn test_json_keeps_sub_cent_digits() {
        let parsed: Money = serde_json::from_str("1.799").unwrap();
        assert_eq!(parsed, euros("1.799"));
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "1.799");
    }

    #[test]
    fn test_json_rejects_non_numbers() {
        assert!(serde_json::from_str::<Money>("true").is_err());
        assert!(serde_json::from_str::<Money>("null").is_err());
    }
}
