//! # Error Types
//!
//! Domain-specific error types for ebon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  ebon-core errors (this file)                                          │
//! │  ├── CoreError        - Decoding failures, rejected receipts           │
//! │  └── ValidationError  - One broken field rule or invariant             │
//! │                                                                         │
//! │  ebon-cli errors (separate crate)                                      │
//! │  └── CliError         - File, config and export failures               │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → CliError → exit code              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

use crate::money::Money;
use crate::validation::Issue;

// =============================================================================
// Core Error
// =============================================================================

/// Errors returned by the codec and by [`crate::validation::ValidationReport::into_result`].
#[derive(Debug, Error)]
pub enum CoreError {
    /// Input is not valid JSON or does not match the receipt shape.
    ///
    /// ## When This Occurs
    /// - Missing required field (`market`, `taxDetails`...)
    /// - Unknown tax category (`"C"`)
    /// - Wrong type (string where a number is expected)
    #[error("Malformed receipt JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A single validation rule failed.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// A full receipt validation found one or more issues.
    #[error("Receipt failed validation with {} issue(s)", .issues.len())]
    InvalidReceipt { issues: Vec<Issue> },
}

// =============================================================================
// Validation Error
// =============================================================================

/// A broken field rule or cross-field invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Invalid format (e.g. malformed VATIN).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },

    /// `net + tax` does not add up to `gross`.
    #[error("{scope}: net {net} + tax {tax} does not equal gross {gross}")]
    TaxMismatch {
        scope: String,
        net: Money,
        tax: Money,
        gross: Money,
    },

    /// `basePoints + couponPoints` does not add up to `earnedPoints`.
    #[error("earned points {earned} do not equal base points {base} + coupon points {coupon}")]
    PaybackPointsMismatch {
        earned: Decimal,
        base: Decimal,
        coupon: Decimal,
    },

    /// `amount × pricePerUnit` does not match the printed subtotal.
    ///
    /// ## Example
    /// ```text
    /// BANANE  0.456 kg × 2.99 €/kg
    ///   expected 1.36 €, printed 1.63 €
    ///      │
    ///      ▼
    /// SubtotalMismatch { item: "BANANE", expected: 1.36 €, actual: 1.63 € }
    /// ```
    #[error("{item}: amount × price per unit is {expected}, but subtotal is {actual}")]
    SubtotalMismatch {
        item: String,
        expected: Money,
        actual: Money,
    },

    /// Change was given but no cash payment covers the total.
    #[error("change of {change} given, but no cash payment covers the total of {total}")]
    ChangeWithoutCash { change: Money, total: Money },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = ValidationError::TaxMismatch {
            scope: "taxDetails.A".to_string(),
            net: Money::from_cents(1000),
            tax: Money::from_cents(190),
            gross: Money::from_cents(1200),
        };
        assert_eq!(
            err.to_string(),
            "taxDetails.A: net 10.00 € + tax 1.90 € does not equal gross 12.00 €"
        );

        let err = ValidationError::PaybackPointsMismatch {
            earned: Decimal::from(10),
            base: Decimal::from(4),
            coupon: Decimal::from(5),
        };
        assert_eq!(
            err.to_string(),
            "earned points 10 do not equal base points 4 + coupon points 5"
        );

        let err = ValidationError::PaybackPointsMismatch {
            earned: Decimal::from(8),
            base: Decimal::new(25, 1),
            coupon: Decimal::from(5),
        };
        assert_eq!(
            err.to_string(),
            "earned points 8 do not equal base points 2.5 + coupon points 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "market".to_string(),
        };
        assert_eq!(err.to_string(), "market is required");

        let err = ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        };
        assert_eq!(err.to_string(), "name must be at most 200 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "vatin".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_invalid_receipt_message_counts_issues() {
        let issue = Issue {
            path: "change".to_string(),
            error: ValidationError::ChangeWithoutCash {
                change: Money::from_cents(100),
                total: Money::from_cents(900),
            },
        };
        let err = CoreError::InvalidReceipt {
            issues: vec![issue.clone(), issue],
        };
        assert_eq!(err.to_string(), "Receipt failed validation with 2 issue(s)");
    }
}
