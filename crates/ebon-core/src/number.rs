//! # Wire Numbers
//!
//! Conversions between in-memory decimals and plain JSON numbers.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  JSON (from parser)         In memory                 JSON (written)    │
//! │                                                                         │
//! │  "subTotal": 2.99    ──►    Money(2.99)        ──►    2.99              │
//! │  "subTotal": 5       ──►    Money(5)           ──►    5                 │
//! │  "pricePerUnit": 1.799 ─►   Money(1.799)       ──►    1.799             │
//! │  "taxPercent": 5.5   ──►    TaxRate(5.5)       ──►    5.5               │
//! │  "earnedPoints": 8.0 ──►    Decimal(8)         ──►    8                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Nothing is rounded on the way in. Integral values are written as JSON
//! integers so a re-encoded receipt reads the same as the parser's output.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::ser::Error as _;
use serde::{Deserializer, Serializer};

/// Writes a decimal as a JSON number, without a fraction when it is integral.
pub(crate) fn serialize_decimal<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    if value.fract().is_zero() {
        if let Some(whole) = value.to_i64() {
            return serializer.serialize_i64(whole);
        }
    }

    match value.to_f64() {
        Some(float) => serializer.serialize_f64(float),
        None => Err(S::Error::custom(format!(
            "{value} cannot be represented as a JSON number"
        ))),
    }
}

/// Reads a JSON number (integer or float) into a decimal.
///
/// Floats go through their shortest string form, so `2.99` becomes exactly
/// `2.99` and not the nearest binary fraction.
pub(crate) fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    rust_decimal::serde::float::deserialize(deserializer)
}

/// `#[serde(with = "crate::number::decimal")]` for plain decimal fields.
pub(crate) mod decimal {
    pub(crate) use super::deserialize_decimal as deserialize;
    pub(crate) use super::serialize_decimal as serialize;
}
