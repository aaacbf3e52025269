//! # ebon-core: Receipt Data Model
//!
//! The shape of a parsed retail receipt ("eBon") with its tax breakdown and
//! PayBack loyalty data, plus the pure functions that work on it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   eBon parser (external) ──► receipt JSON                               │
//! │                                   │                                     │
//! │  ┌────────────────────────────────▼────────────────────────────────┐   │
//! │  │               ★ ebon-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   codec   │  │ validation│  │   │
//! │  │   │  Receipt  │  │   Money   │  │   JSON    │  │ invariants│  │   │
//! │  │   │  Payback  │  │           │  │           │  │  report   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOGGING SETUP • PURE FUNCTIONS                    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                   │                                     │
//! │   ebon-cli, reporting/export (external) ◄──┘                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Receipt, items, payments, PayBack and tax types
//! - [`money`] - Exact decimal Money type
//! - [`codec`] - JSON encode/decode
//! - [`validation`] - Invariant and field checks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use ebon_core::money::Money;
//! use ebon_core::validation::check_tax_entry;
//!
//! let net = Money::from_cents(503);
//! let tax = Money::from_cents(96);
//! let gross = Money::from_cents(599);
//!
//! assert!(check_tax_entry("A", net, tax, gross, Money::zero()).is_ok());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod codec;
pub mod error;
pub mod money;
mod number;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use validation::{validate_receipt, Issue, ValidationOptions, ValidationReport};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Payment labels that mean cash. Compared case-insensitively against the
/// whole label.
pub const CASH_PAYMENT_TYPES: &[&str] = &["BAR", "CASH"];

/// Default rounding tolerance for money comparisons, in cents.
///
/// Tax lines on a receipt are rounded independently, so `net + tax` can
/// miss `gross` by a cent.
pub const DEFAULT_TOLERANCE_CENTS: i64 = 1;

/// Maximum length of market, cashier, checkout, card and payment labels.
pub const MAX_IDENTIFIER_LENGTH: usize = 64;

/// Maximum length of an item name.
pub const MAX_ITEM_NAME_LENGTH: usize = 200;
