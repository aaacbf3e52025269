//! # JSON Codec
//!
//! In-memory encoding and decoding of receipts.
//!
//! ```text
//! parser output (JSON) ──► from_json_* ──► Receipt ──► to_json_* ──► exporters
//! ```
//!
//! Absent optional fields are left out of the output entirely; an explicit
//! `null` in the input is read as absent. Decoding then encoding a receipt
//! therefore never turns a missing `payout` into `"payout": null` or `0`.
//!
//! Decoding checks shape only. Run [`crate::validation::validate_receipt`]
//! for the arithmetic.

use serde_json::Value;

use crate::error::CoreResult;
use crate::types::Receipt;

/// Decodes a receipt from a JSON string.
pub fn from_json_str(json: &str) -> CoreResult<Receipt> {
    Ok(serde_json::from_str(json)?)
}

/// Decodes a receipt from JSON bytes.
pub fn from_json_slice(json: &[u8]) -> CoreResult<Receipt> {
    Ok(serde_json::from_slice(json)?)
}

/// Decodes a receipt from an already parsed JSON value.
pub fn from_json_value(value: Value) -> CoreResult<Receipt> {
    Ok(serde_json::from_value(value)?)
}

/// Encodes a receipt as compact JSON.
pub fn to_json_string(receipt: &Receipt) -> CoreResult<String> {
    Ok(serde_json::to_string(receipt)?)
}

/// Encodes a receipt as indented JSON.
pub fn to_json_pretty(receipt: &Receipt) -> CoreResult<String> {
    Ok(serde_json::to_string_pretty(receipt)?)
}

/// Encodes a receipt as a JSON value.
pub fn to_json_value(receipt: &Receipt) -> CoreResult<Value> {
    Ok(serde_json::to_value(receipt)?)
}

// =============================================================================
// Unit Tests
// =============================================================================
