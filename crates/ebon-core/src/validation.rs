//! # Validation Module
//!
//! Opt-in checks for receipts handed over by the parser.
//!
//! The model does not enforce arithmetic at the type level: a receipt whose
//! tax lines do not add up still decodes. Callers that care run the checks
//! here.
//!
//! ## Checks
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Receipt Invariants                                 │
//! │                                                                         │
//! │  TaxDetails (total, A, B)   gross == net + tax          ± tolerance    │
//! │  ReceiptItem                subTotal == amount × ppu    ± tolerance    │
//! │  PaybackData                earned == base + coupon     exact          │
//! │  Receipt.change             some cash payment >= total                 │
//! │                                                                         │
//! │  Field rules: market/cashier/checkout present, VATIN shape, item name  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust,no_run
//! use ebon_core::codec;
//! use ebon_core::validation::{validate_receipt, ValidationOptions};
//!
//! # let json = "";
//! let receipt = codec::from_json_str(json).unwrap();
//! let report = validate_receipt(&receipt, &ValidationOptions::default());
//! for issue in report.issues() {
//!     println!("{issue}");
//! }
//! ```

use std::fmt;

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{PaybackData, Receipt, ReceiptItem, TaxDetails};
use crate::{DEFAULT_TOLERANCE_CENTS, MAX_IDENTIFIER_LENGTH, MAX_ITEM_NAME_LENGTH};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Options & Report
// =============================================================================

/// Knobs for [`validate_receipt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationOptions {
    /// Largest accepted rounding difference for money comparisons.
    pub tolerance: Money,
}

impl ValidationOptions {
    pub fn with_tolerance_cents(cents: i64) -> Self {
        ValidationOptions {
            tolerance: Money::from_cents(cents),
        }
    }
}

impl Default for ValidationOptions {
    fn default() -> Self {
        ValidationOptions::with_tolerance_cents(DEFAULT_TOLERANCE_CENTS)
    }
}

/// A validation failure and where in the receipt it was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    /// JSON-style path, e.g. `items[2]` or `taxDetails.A`.
    pub path: String,
    pub error: ValidationError,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.error)
    }
}

/// Every issue found in one receipt.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    issues: Vec<Issue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// `Ok(())` for a clean report, otherwise [`CoreError::InvalidReceipt`].
    pub fn into_result(self) -> CoreResult<()> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(CoreError::InvalidReceipt {
                issues: self.issues,
            })
        }
    }

    fn record(&mut self, path: impl Into<String>, result: ValidationResult<()>) {
        if let Err(error) = result {
            self.issues.push(Issue {
                path: path.into(),
                error,
            });
        }
    }
}

// =============================================================================
// Receipt Validation
// =============================================================================

/// Runs every check on a receipt and collects all issues.
///
/// ## Flow
/// ```text
/// Receipt ──► header fields ──► items ──► payments ──► change
///                                                        │
///            report ◄── taxDetails ◄── payback ◄─────────┘
/// ```
/// Nothing short-circuits: a receipt with three broken items yields three
/// issues.
pub fn validate_receipt(receipt: &Receipt, options: &ValidationOptions) -> ValidationReport {
    let mut report = ValidationReport::default();

    report.record("market", validate_identifier("market", &receipt.market));
    report.record("cashier", validate_identifier("cashier", &receipt.cashier));
    report.record("checkout", validate_identifier("checkout", &receipt.checkout));
    report.record("vatin", validate_vatin(&receipt.vatin));

    for (index, item) in receipt.items.iter().enumerate() {
        let path = format!("items[{index}]");
        report.record(path.clone(), validate_item_name(&item.name));
        report.record(path, check_item_subtotal(item, options.tolerance));
    }

    for (index, payment) in receipt.given.iter().enumerate() {
        report.record(
            format!("given[{index}]"),
            validate_identifier("type", &payment.method),
        );
    }

    report.record("change", check_change(receipt));

    if let Some(payback) = &receipt.payback {
        report.record("payback", validate_identifier("card", &payback.card));
        report.record("payback", check_payback_points(payback));
    }

    let details = &receipt.tax_details;
    let total = &details.total;
    report.record(
        "taxDetails.total",
        check_tax_entry("taxDetails.total", total.net, total.tax, total.gross, options.tolerance),
    );
    for (category, entry) in details.entries() {
        let scope = format!("taxDetails.{category}");
        report.record(
            scope.clone(),
            check_tax_entry(&scope, entry.net, entry.tax, entry.gross, options.tolerance),
        );
    }

    report
}

// =============================================================================
// Invariant Checks
// =============================================================================

/// Checks `net + tax == gross` within `tolerance`.
///
/// A sum too large to compute counts as a mismatch.
///
/// ## Example
/// ```rust
/// use ebon_core::money::Money;
/// use ebon_core::validation::check_tax_entry;
///
/// let ok = check_tax_entry(
///     "A",
///     Money::from_cents(840),
///     Money::from_cents(160),
///     Money::from_cents(1000),
///     Money::zero(),
/// );
/// assert!(ok.is_ok());
/// ```
pub fn check_tax_entry(
    scope: &str,
    net: Money,
    tax: Money,
    gross: Money,
    tolerance: Money,
) -> ValidationResult<()> {
    let sum = net.checked_add(tax);
    if sum.is_some_and(|sum| sum.within(gross, tolerance)) {
        return Ok(());
    }

    Err(ValidationError::TaxMismatch {
        scope: scope.to_string(),
        net,
        tax,
        gross,
    })
}

/// Checks the total entry and every category entry; stops at the first
/// mismatch.
pub fn check_tax_details(details: &TaxDetails, tolerance: Money) -> ValidationResult<()> {
    let total = &details.total;
    check_tax_entry("total", total.net, total.tax, total.gross, tolerance)?;

    for (category, entry) in details.entries() {
        check_tax_entry(
            category.as_str(),
            entry.net,
            entry.tax,
            entry.gross,
            tolerance,
        )?;
    }

    Ok(())
}

/// Checks `earnedPoints == basePoints + couponPoints`.
///
/// Points are compared exactly, without tolerance. A sum too large to
/// compute counts as a mismatch.
pub fn check_payback_points(payback: &PaybackData) -> ValidationResult<()> {
    let expected = payback.base_points.checked_add(payback.coupon_points);
    if expected == Some(payback.earned_points) {
        return Ok(());
    }

    Err(ValidationError::PaybackPointsMismatch {
        earned: payback.earned_points,
        base: payback.base_points,
        coupon: payback.coupon_points,
    })
}

/// Checks `subTotal == amount × pricePerUnit` for unit-priced items.
///
/// Items without a per-unit price pass.
pub fn check_item_subtotal(item: &ReceiptItem, tolerance: Money) -> ValidationResult<()> {
    let Some(price_per_unit) = item.price_per_unit else {
        return Ok(());
    };

    let expected = price_per_unit
        .multiply_quantity(item.amount)
        .ok_or_else(|| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("{} × {} is out of range", item.amount, price_per_unit),
        })?;

    if expected.within(item.sub_total, tolerance) {
        return Ok(());
    }

    Err(ValidationError::SubtotalMismatch {
        item: item.name.clone(),
        expected,
        actual: item.sub_total,
    })
}

/// Checks that change only appears next to a cash payment covering the total.
///
/// Receipts without `change` pass.
pub fn check_change(receipt: &Receipt) -> ValidationResult<()> {
    let Some(change) = receipt.change else {
        return Ok(());
    };

    if receipt
        .cash_payments()
        .any(|payment| payment.value >= receipt.total)
    {
        return Ok(());
    }

    Err(ValidationError::ChangeWithoutCash {
        change,
        total: receipt.total,
    })
}

// =============================================================================
// Field Validators
// =============================================================================

/// Validates an identifier such as market, cashier or checkout.
///
/// ## Rules
/// - Must not be empty
/// - At most MAX_IDENTIFIER_LENGTH (64) characters
pub fn validate_identifier(field: &str, value: &str) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > MAX_IDENTIFIER_LENGTH {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: MAX_IDENTIFIER_LENGTH,
        });
    }

    Ok(())
}

/// Validates a VAT identification number.
///
/// ## Rules
/// - Spaces are ignored (`DE 812 706 034` is printed on some receipts)
/// - Two-letter country prefix, upper case
/// - Followed by 2 to 13 letters or digits
///
/// ## Example
/// ```rust
/// use ebon_core::validation::validate_vatin;
///
/// assert!(validate_vatin("DE812706034").is_ok());
/// assert!(validate_vatin("DE 812 706 034").is_ok());
/// assert!(validate_vatin("812706034").is_err());
/// ```
pub fn validate_vatin(vatin: &str) -> ValidationResult<()> {
    let compact: String = vatin.chars().filter(|c| !c.is_whitespace()).collect();

    if compact.is_empty() {
        return Err(ValidationError::Required {
            field: "vatin".to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "vatin".to_string(),
        reason: reason.to_string(),
    };

    let mut chars = compact.chars();
    let country_ok = chars.by_ref().take(2).filter(char::is_ascii_uppercase).count() == 2;
    if !country_ok {
        return Err(invalid("must start with a two-letter country code"));
    }

    let rest: Vec<char> = chars.collect();
    if !(2..=13).contains(&rest.len()) {
        return Err(invalid("must have 2 to 13 characters after the country code"));
    }
    if !rest.iter().all(char::is_ascii_alphanumeric) {
        return Err(invalid("must contain only letters and digits"));
    }

    Ok(())
}

/// Validates an item name.
///
/// ## Rules
/// - Must not be empty
/// - At most MAX_ITEM_NAME_LENGTH (200) characters
pub fn validate_item_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_ITEM_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_ITEM_NAME_LENGTH,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
