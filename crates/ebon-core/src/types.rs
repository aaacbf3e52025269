//! # Domain Types
//!
//! The receipt model as produced by the eBon parser.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                            Receipt                                      │
//! │   date, market, cashier, checkout, vatin, total, change?, payout?       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  ReceiptItem[]  │   │   Payment[]     │   │  PaybackData?   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  taxCategory    │   │  type           │   │  card           │       │
//! │  │  name           │   │  value          │   │  points...      │       │
//! │  │  subTotal       │   └─────────────────┘   │  usedCoupons[]  │       │
//! │  │  amount, unit?  │                         │  REWE credit?   │       │
//! │  └─────────────────┘                         └─────────────────┘       │
//! │                                                                         │
//! │  ┌───────────────────────────────────────────────────────────────┐     │
//! │  │  TaxDetails: total + A? + B?  (TaxDetailsEntry per category)  │     │
//! │  └───────────────────────────────────────────────────────────────┘     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Optional Fields
//! Optional fields are omitted from JSON when absent, never written as
//! `null`. "Feature not used" and "zero" stay distinguishable.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::{number, CASH_PAYMENT_TYPES};

// =============================================================================
// Tax Category
// =============================================================================

/// Tax class printed next to every receipt line.
///
/// In Germany `A` is the standard VAT rate (19 %) and `B` the reduced rate
/// (7 %), but the model does not tie a category to a rate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum TaxCategory {
    A,
    B,
}

impl TaxCategory {
    /// Every category in receipt order.
    pub const ALL: [TaxCategory; 2] = [TaxCategory::A, TaxCategory::B];

    pub const fn as_str(&self) -> &'static str {
        match self {
            TaxCategory::A => "A",
            TaxCategory::B => "B",
        }
    }
}

impl fmt::Display for TaxCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxCategory {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(TaxCategory::A),
            "B" => Ok(TaxCategory::B),
            _ => Err(ValidationError::NotAllowed {
                field: "taxCategory".to_string(),
                allowed: TaxCategory::ALL.iter().map(|c| c.to_string()).collect(),
            }),
        }
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate as a percentage, e.g. `19`, `7` or `5.5`.
///
/// Stored as an exact decimal. On the wire the rate is a plain percentage
/// number (`19`) and is written back with the same digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export)]
pub struct TaxRate(#[ts(type = "number")] Decimal);

impl TaxRate {
    /// Creates a tax rate from a whole percentage.
    #[inline]
    pub fn from_percent(percent: u32) -> Self {
        TaxRate(Decimal::from(percent))
    }

    /// Wraps a decimal percentage (e.g. `5.5`) as is.
    #[inline]
    pub const fn from_percent_decimal(percent: Decimal) -> Self {
        TaxRate(percent)
    }

    /// Returns the rate as a decimal percentage.
    #[inline]
    pub const fn percent(&self) -> Decimal {
        self.0
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0.normalize())
    }
}

impl Serialize for TaxRate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        number::serialize_decimal(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        number::deserialize_decimal(deserializer).map(TaxRate)
    }
}

// =============================================================================
// Receipt Item
// =============================================================================

/// One purchased line.
///
/// ## Quantities
/// ```text
/// Piece goods:   "amount": 2,     no unit,            subTotal 1.78
/// Counted:       "amount": 3,     "unit": "Stk",      pricePerUnit 0.89
/// Weighed:       "amount": 0.456, "unit": "kg",       pricePerUnit 2.99
/// ```
/// When `unit` or `pricePerUnit` is present, `amount` is in that unit and
/// `subTotal` is expected to equal `amount × pricePerUnit`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptItem {
    /// The tax category of this item.
    pub tax_category: TaxCategory,

    /// Name as printed on the receipt.
    pub name: String,

    /// Line value including all units.
    pub sub_total: Money,

    /// Whether the item earns PayBack points.
    pub payback_qualified: bool,

    /// Quantity; see `unit`.
    #[serde(with = "number::decimal")]
    #[ts(type = "number")]
    pub amount: Decimal,

    /// Unit of `amount` (piece, kg etc.).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub unit: Option<String>,

    /// Price per unit.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub price_per_unit: Option<Money>,
}

impl ReceiptItem {
    /// True if the line carries a unit or a per-unit price.
    #[inline]
    pub fn is_unit_priced(&self) -> bool {
        self.unit.is_some() || self.price_per_unit.is_some()
    }
}

// =============================================================================
// Payment
// =============================================================================

/// A tender line. A receipt can have several for split payments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Payment {
    /// Payment method label as printed (`BAR`, `EC-Cash`, `REWE Guthaben`...).
    #[serde(rename = "type")]
    pub method: String,

    /// Amount paid with this tender.
    pub value: Money,
}

impl Payment {
    /// True for cash tenders.
    ///
    /// Matches the whole label, so `EC-Cash` (a debit card) is not cash.
    pub fn is_cash(&self) -> bool {
        let label = self.method.trim();
        CASH_PAYMENT_TYPES
            .iter()
            .any(|cash| label.eq_ignore_ascii_case(cash))
    }
}

// =============================================================================
// PayBack
// =============================================================================

/// A coupon activated for this purchase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaybackCoupon {
    pub name: String,

    /// Points generated by this coupon.
    #[serde(with = "number::decimal")]
    #[ts(type = "number")]
    pub points: Decimal,
}

/// Loyalty data, only present when a PayBack card was scanned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PaybackData {
    /// Card identification (usually masked).
    pub card: String,

    /// Point balance before this purchase.
    #[serde(with = "number::decimal")]
    #[ts(type = "number")]
    pub points_before: Decimal,

    /// Points earned with this purchase; `base_points + coupon_points`.
    #[serde(with = "number::decimal")]
    #[ts(type = "number")]
    pub earned_points: Decimal,

    /// Points excluding coupons.
    #[serde(with = "number::decimal")]
    #[ts(type = "number")]
    pub base_points: Decimal,

    /// Points generated by coupons.
    #[serde(with = "number::decimal")]
    #[ts(type = "number")]
    pub coupon_points: Decimal,

    /// PayBack-qualified revenue in this purchase.
    pub qualified_revenue: Money,

    pub used_coupons: Vec<PaybackCoupon>,

    /// REWE credit spent on this purchase.
    #[serde(rename = "usedREWECredit", default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub used_rewe_credit: Option<Money>,

    /// REWE credit left after this purchase.
    #[serde(rename = "newREWECredit", default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub new_rewe_credit: Option<Money>,
}

impl PaybackData {
    /// True if the customer paid with REWE credit.
    #[inline]
    pub fn used_credit(&self) -> bool {
        self.used_rewe_credit.is_some() || self.new_rewe_credit.is_some()
    }
}

// =============================================================================
// Tax Details
// =============================================================================

/// One tax bracket: `gross = net + tax`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxDetailsEntry {
    /// Tax percentage, e.g. 19.
    pub tax_percent: TaxRate,
    pub net: Money,
    pub tax: Money,
    pub gross: Money,
}

/// Receipt-wide tax sums. Like [`TaxDetailsEntry`] without a percentage,
/// which has no meaning across brackets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxTotal {
    pub net: Money,
    pub tax: Money,
    pub gross: Money,
}

impl From<TaxDetailsEntry> for TaxTotal {
    fn from(entry: TaxDetailsEntry) -> Self {
        TaxTotal {
            net: entry.net,
            tax: entry.tax,
            gross: entry.gross,
        }
    }
}

/// Tax breakdown. Category entries exist only for categories on the receipt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxDetails {
    pub total: TaxTotal,

    #[serde(rename = "A", default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub a: Option<TaxDetailsEntry>,

    #[serde(rename = "B", default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub b: Option<TaxDetailsEntry>,
}

impl TaxDetails {
    /// Returns the entry for a category, if the receipt has one.
    pub fn entry(&self, category: TaxCategory) -> Option<&TaxDetailsEntry> {
        match category {
            TaxCategory::A => self.a.as_ref(),
            TaxCategory::B => self.b.as_ref(),
        }
    }

    /// Present category entries, A before B.
    pub fn entries(&self) -> impl Iterator<Item = (TaxCategory, &TaxDetailsEntry)> + '_ {
        TaxCategory::ALL
            .into_iter()
            .filter_map(move |category| self.entry(category).map(|entry| (category, entry)))
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// A parsed receipt. The aggregate root; owns everything below it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Date and time of the purchase.
    #[ts(as = "String")]
    pub date: DateTime<Utc>,

    /// Market identifier.
    pub market: String,

    /// Cashier identifier.
    pub cashier: String,

    /// Checkout identifier.
    pub checkout: String,

    /// Value Added Tax Identification Number of the seller.
    pub vatin: String,

    pub items: Vec<ReceiptItem>,

    /// Total sum.
    pub total: Money,

    /// The customer's payments, in printed order.
    pub given: Vec<Payment>,

    /// Change handed back when cash exceeded the total.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub change: Option<Money>,

    /// Cash withdrawn at the till ("Auszahlung").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub payout: Option<Money>,

    /// Only present if a PayBack card was used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub payback: Option<PaybackData>,

    pub tax_details: TaxDetails,
}

impl Receipt {
    /// Cash tenders, in printed order.
    pub fn cash_payments(&self) -> impl Iterator<Item = &Payment> + '_ {
        self.given.iter().filter(|payment| payment.is_cash())
    }

    /// Items of one tax category, in printed order.
    pub fn items_in(&self, category: TaxCategory) -> impl Iterator<Item = &ReceiptItem> + '_ {
        self.items
            .iter()
            .filter(move |item| item.tax_category == category)
    }

    #[inline]
    pub fn has_payback(&self) -> bool {
        self.payback.is_some()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
