//! # Commands
//!
//! One function per subcommand. Each writes to the given writer so tests can
//! capture output; `main` passes stdout.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ebon check FILE...    decode + validate, report per file               │
//! │  ebon normalize FILE   decode + re-encode (canonical JSON)              │
//! │  ebon summary FILE     human-readable overview                          │
//! │  ebon bindings         write TypeScript definitions                     │
//! │                                                                         │
//! │  FILE may be `-` for stdin                                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use ebon_core::codec;
use ebon_core::validation::{validate_receipt, ValidationOptions, ValidationReport};
use ebon_core::Receipt;
use serde_json::{json, Value};
use tracing::{debug, info, warn};
use ts_rs::TS;

use crate::error::{CliError, CliResult};

/// How a command ended when it did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Every input decoded and validated.
    Clean,
    /// At least one input failed to decode or validate.
    IssuesFound,
}

// =============================================================================
// Input
// =============================================================================

/// Reads a file, or stdin for `-`.
fn read_input(path: &Path) -> CliResult<Vec<u8>> {
    if path == Path::new("-") {
        let mut buffer = Vec::new();
        io::stdin()
            .read_to_end(&mut buffer)
            .map_err(|source| CliError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        return Ok(buffer);
    }

    fs::read(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads and decodes one receipt.
pub fn load_receipt(path: &Path) -> CliResult<Receipt> {
    let bytes = read_input(path)?;
    debug!(path = %path.display(), bytes = bytes.len(), "read receipt input");

    let receipt = codec::from_json_slice(&bytes).map_err(|source| CliError::Decode {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        items = receipt.items.len(),
        payments = receipt.given.len(),
        payback = receipt.has_payback(),
        "decoded receipt"
    );
    Ok(receipt)
}

// =============================================================================
// check
// =============================================================================

/// Result of checking one file.
enum FileCheck {
    Checked(ValidationReport),
    Unreadable(CliError),
}

impl FileCheck {
    fn is_clean(&self) -> bool {
        matches!(self, FileCheck::Checked(report) if report.is_valid())
    }
}

/// Decodes and validates every file. Files that cannot be read or decoded
/// are reported like files with issues; checking continues with the next.
pub fn check<W: Write>(
    files: &[PathBuf],
    options: &ValidationOptions,
    as_json: bool,
    out: &mut W,
) -> CliResult<Outcome> {
    let mut results = Vec::with_capacity(files.len());

    for path in files {
        let result = match load_receipt(path) {
            Ok(receipt) => {
                let report = validate_receipt(&receipt, options);
                if report.is_valid() {
                    info!(path = %path.display(), "receipt is valid");
                } else {
                    warn!(path = %path.display(), issues = report.len(), "receipt has issues");
                }
                FileCheck::Checked(report)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not load receipt");
                FileCheck::Unreadable(err)
            }
        };
        results.push((path, result));
    }

    if as_json {
        let entries: Vec<Value> = results
            .iter()
            .map(|(path, result)| check_entry_json(path, result))
            .collect();
        serde_json::to_writer_pretty(&mut *out, &entries).map_err(io::Error::from)?;
        writeln!(out)?;
    } else {
        for (path, result) in &results {
            write_check_entry(out, path, result)?;
        }
    }

    let outcome = if results.iter().all(|(_, result)| result.is_clean()) {
        Outcome::Clean
    } else {
        Outcome::IssuesFound
    };
    Ok(outcome)
}

fn check_entry_json(path: &Path, result: &FileCheck) -> Value {
    match result {
        FileCheck::Checked(report) => json!({
            "file": path.display().to_string(),
            "valid": report.is_valid(),
            "issues": report
                .issues()
                .iter()
                .map(|issue| json!({ "path": issue.path, "message": issue.error.to_string() }))
                .collect::<Vec<_>>(),
        }),
        FileCheck::Unreadable(err) => json!({
            "file": path.display().to_string(),
            "valid": false,
            "error": err.to_string(),
        }),
    }
}

fn write_check_entry<W: Write>(out: &mut W, path: &Path, result: &FileCheck) -> io::Result<()> {
    match result {
        FileCheck::Checked(report) if report.is_valid() => {
            writeln!(out, "ok    {}", path.display())
        }
        FileCheck::Checked(report) => {
            writeln!(out, "FAIL  {} ({} issue(s))", path.display(), report.len())?;
            for issue in report.issues() {
                writeln!(out, "      - {issue}")?;
            }
            Ok(())
        }
        FileCheck::Unreadable(err) => writeln!(out, "ERROR {err}"),
    }
}

// =============================================================================
// normalize
// =============================================================================

/// Decodes a receipt and writes it back as canonical JSON.
pub fn normalize<W: Write>(path: &Path, compact: bool, out: &mut W) -> CliResult<()> {
    let receipt = load_receipt(path)?;

    let encoded = if compact {
        codec::to_json_string(&receipt)
    } else {
        codec::to_json_pretty(&receipt)
    }
    .map_err(CliError::Encode)?;

    writeln!(out, "{encoded}")?;
    Ok(())
}

// =============================================================================
// summary
// =============================================================================

/// Writes a human-readable overview of one receipt.
pub fn summary<W: Write>(path: &Path, out: &mut W) -> CliResult<()> {
    let receipt = load_receipt(path)?;
    write_summary(out, &receipt)?;
    Ok(())
}

fn write_summary<W: Write>(out: &mut W, receipt: &Receipt) -> io::Result<()> {
    writeln!(
        out,
        "Market {}  Checkout {}  Cashier {}",
        receipt.market, receipt.checkout, receipt.cashier
    )?;
    writeln!(out, "Date   {}", receipt.date.format("%Y-%m-%d %H:%M UTC"))?;
    writeln!(out, "VATIN  {}", receipt.vatin)?;

    writeln!(out)?;
    writeln!(out, "Items ({})", receipt.items.len())?;
    for item in &receipt.items {
        let mut label = item.name.clone();
        match (&item.unit, item.price_per_unit) {
            (Some(unit), Some(price)) => {
                label.push_str(&format!("  {} {} × {}", item.amount, unit, price))
            }
            (Some(unit), None) => label.push_str(&format!("  {} {}", item.amount, unit)),
            (None, Some(price)) => label.push_str(&format!("  {} × {}", item.amount, price)),
            (None, None) => {}
        }
        let marker = if item.payback_qualified { "" } else { " *" };
        writeln!(
            out,
            "  {}  {:<40} {:>12}{}",
            item.tax_category, label, item.sub_total.to_string(), marker
        )?;
    }
    writeln!(out, "  {:<43} {:>12}", "Total", receipt.total.to_string())?;

    writeln!(out)?;
    writeln!(out, "Given")?;
    for payment in &receipt.given {
        writeln!(out, "  {:<43} {:>12}", payment.method, payment.value.to_string())?;
    }
    if let Some(change) = receipt.change {
        writeln!(out, "  {:<43} {:>12}", "Change", change.to_string())?;
    }
    if let Some(payout) = receipt.payout {
        writeln!(out, "  {:<43} {:>12}", "Payout", payout.to_string())?;
    }

    if let Some(payback) = &receipt.payback {
        writeln!(out)?;
        writeln!(
            out,
            "PayBack {}: +{} points ({} base, {} coupon), {} before",
            payback.card,
            payback.earned_points,
            payback.base_points,
            payback.coupon_points,
            payback.points_before
        )?;
        writeln!(out, "  Qualified revenue {}", payback.qualified_revenue)?;
        for coupon in &payback.used_coupons {
            writeln!(out, "  Coupon {} (+{})", coupon.name, coupon.points)?;
        }
        if let Some(used) = payback.used_rewe_credit {
            writeln!(out, "  REWE credit used {used}")?;
        }
        if let Some(left) = payback.new_rewe_credit {
            writeln!(out, "  REWE credit left {left}")?;
        }
    }

    writeln!(out)?;
    writeln!(out, "Tax")?;
    for (category, entry) in receipt.tax_details.entries() {
        writeln!(
            out,
            "  {} {:>5}  net {:>10}  tax {:>10}  gross {:>10}",
            category,
            entry.tax_percent.to_string(),
            entry.net.to_string(),
            entry.tax.to_string(),
            entry.gross.to_string()
        )?;
    }
    let total = &receipt.tax_details.total;
    writeln!(
        out,
        "  Total    net {:>10}  tax {:>10}  gross {:>10}",
        total.net.to_string(),
        total.tax.to_string(),
        total.gross.to_string()
    )?;

    Ok(())
}

// =============================================================================
// bindings
// =============================================================================

/// Writes the TypeScript definitions of the receipt model to `dir`.
pub fn bindings(dir: &Path) -> CliResult<()> {
    fs::create_dir_all(dir).map_err(|source| CliError::Io {
        path: dir.to_path_buf(),
        source,
    })?;

    Receipt::export_all_to(dir).map_err(|source| CliError::Bindings {
        dir: dir.to_path_buf(),
        source,
    })?;

    info!(dir = %dir.display(), "exported TypeScript bindings");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const RECEIPT: &str = r##########"{
        "date": "2024-03-09T10:15:00.000Z",
        "market": "4459",
        "cashier": "101010",
        "checkout": "2",
        "vatin": "DE812706034",
        "items": [
            { "taxCategory": "A", "name": "KAFFEE CREMA", "subTotal": 5.99,
              "paybackQualified": true, "amount": 1 },
            { "taxCategory": "B", "name": "BANANE", "subTotal": 1.36,
              "paybackQualified": true, "amount": 0.456, "unit": "kg", "pricePerUnit": 2.99 }
        ],
        "total": 7.35,
        "given": [ { "type": "BAR", "value": 10 } ],
        "change": 2.65,
        "payback": {
            "card": "#########1234", "pointsBefore": 1520, "earnedPoints": 8,
            "basePoints": 3, "couponPoints": 5, "qualifiedRevenue": 7.35,
            "usedCoupons": [ { "name": "5 Extra-Punkte Kaffee", "points": 5 } ]
        },
        "taxDetails": {
            "total": { "net": 6.30, "tax": 1.05, "gross": 7.35 },
            "A": { "taxPercent": 19, "net": 5.03, "tax": 0.96, "gross": 5.99 },
            "B": { "taxPercent": 7, "net": 1.27, "tax": 0.09, "gross": 1.36 }
        }
    }"##########;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn output(buffer: Vec<u8>) -> String {
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_check_clean_receipt() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "good.json", RECEIPT);

        let mut out = Vec::new();
        let outcome = check(&[path], &ValidationOptions::default(), false, &mut out).unwrap();

        assert_eq!(outcome, Outcome::Clean);
        assert!(output(out).starts_with("ok    "));
    }

    #[test]
    fn test_check_reports_issues_and_keeps_going() {
        let dir = TempDir::new().unwrap();
        let broken = RECEIPT.replace("\"earnedPoints\": 8", "\"earnedPoints\": 9");
        let bad = write_file(&dir, "bad.json", &broken);
        let garbage = write_file(&dir, "garbage.json", "{ nope");
        let good = write_file(&dir, "good.json", RECEIPT);

        let mut out = Vec::new();
        let outcome = check(
            &[bad, garbage, good],
            &ValidationOptions::default(),
            false,
            &mut out,
        )
        .unwrap();
        let text = output(out);

        assert_eq!(outcome, Outcome::IssuesFound);
        assert!(text.contains("FAIL"));
        assert!(text.contains("(1 issue(s))"));
        assert!(text.contains("payback: earned points 9 do not equal base points 3 + coupon points 5"));
        assert!(text.contains("ERROR"));
        assert!(text.contains("garbage.json"));
        assert!(text.lines().last().unwrap().starts_with("ok    "));
    }

    #[test]
    fn test_check_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");

        let mut out = Vec::new();
        let outcome = check(&[missing], &ValidationOptions::default(), false, &mut out).unwrap();

        assert_eq!(outcome, Outcome::IssuesFound);
        assert!(output(out).contains("missing.json"));
    }

    #[test]
    fn test_check_json_output() {
        let dir = TempDir::new().unwrap();
        let broken = RECEIPT.replace("\"gross\": 1.36", "\"gross\": 1.46");
        let bad = write_file(&dir, "bad.json", &broken);
        let garbage = write_file(&dir, "garbage.json", "[]");

        let mut out = Vec::new();
        check(&[bad, garbage], &ValidationOptions::default(), true, &mut out).unwrap();
        let report: Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(report[0]["valid"], json!(false));
        assert_eq!(report[0]["issues"][0]["path"], json!("taxDetails.B"));
        assert_eq!(report[1]["valid"], json!(false));
        assert!(report[1]["error"].as_str().unwrap().contains("garbage.json"));
    }

    #[test]
    fn test_check_tolerance_is_applied() {
        let dir = TempDir::new().unwrap();
        let off_by_one = RECEIPT.replace("\"tax\": 0.96", "\"tax\": 0.97");
        let path = write_file(&dir, "rounding.json", &off_by_one);

        let mut out = Vec::new();
        let lenient = ValidationOptions::with_tolerance_cents(1);
        assert_eq!(
            check(&[path.clone()], &lenient, false, &mut out).unwrap(),
            Outcome::Clean
        );

        let strict = ValidationOptions::with_tolerance_cents(0);
        assert_eq!(
            check(&[path], &strict, false, &mut out).unwrap(),
            Outcome::IssuesFound
        );
    }

    #[test]
    fn test_normalize_keeps_absent_fields_absent() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "receipt.json", RECEIPT);

        let mut out = Vec::new();
        normalize(&path, true, &mut out).unwrap();
        let text = output(out);

        assert_eq!(text.lines().count(), 1);
        let value: Value = serde_json::from_str(&text).unwrap();
        assert!(value.get("payout").is_none());
        assert!(value["payback"].get("usedREWECredit").is_none());
        assert_eq!(value["change"], json!(2.65));
        assert_eq!(value["date"], json!("2024-03-09T10:15:00Z"));
    }

    #[test]
    fn test_normalize_keeps_sub_cent_prices() {
        let dir = TempDir::new().unwrap();
        let fuel = RECEIPT.replace(
            "\"subTotal\": 1.36,\n              \"paybackQualified\": true, \"amount\": 0.456, \"unit\": \"kg\", \"pricePerUnit\": 2.99",
            "\"subTotal\": 35.98,\n              \"paybackQualified\": true, \"amount\": 20, \"unit\": \"l\", \"pricePerUnit\": 1.799",
        );
        assert_ne!(fuel, RECEIPT);
        let path = write_file(&dir, "fuel.json", &fuel);

        let mut out = Vec::new();
        normalize(&path, true, &mut out).unwrap();
        let value: Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["items"][1]["pricePerUnit"], json!(1.799));
        assert_eq!(value["items"][1]["subTotal"], json!(35.98));
    }

    #[test]
    fn test_normalize_rejects_non_receipt() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "other.json", r#"{ "hello": "world" }"#);

        let mut out = Vec::new();
        let err = normalize(&path, false, &mut out).unwrap_err();
        assert!(matches!(err, CliError::Decode { .. }));
        assert!(out.is_empty());
    }

    #[test]
    fn test_summary() {
        let dir = TempDir::new().unwrap();
        let path = write_file(&dir, "receipt.json", RECEIPT);

        let mut out = Vec::new();
        summary(&path, &mut out).unwrap();
        let text = output(out);

        assert!(text.starts_with("Market 4459  Checkout 2  Cashier 101010"));
        assert!(text.contains("Date   2024-03-09 10:15 UTC"));
        assert!(text.contains("Items (2)"));
        assert!(text.contains("BANANE  0.456 kg × 2.99 €"));
        assert!(text.contains("Change"));
        assert!(!text.contains("Payout"));
        assert!(text.contains("PayBack #########1234: +8 points (3 base, 5 coupon), 1520 before"));
        assert!(text.contains("Coupon 5 Extra-Punkte Kaffee (+5)"));
        assert!(!text.contains("REWE credit"));
        assert!(text.contains("19%"));
    }

    #[test]
    fn test_bindings_writes_receipt_definition() {
        let dir = TempDir::new().unwrap();
        let out_dir = dir.path().join("types");

        bindings(&out_dir).unwrap();

        let receipt_ts = fs::read_to_string(out_dir.join("Receipt.ts")).unwrap();
        assert!(receipt_ts.contains("taxDetails"));
        assert!(receipt_ts.contains("payout?"));
        assert!(out_dir.join("PaybackData.ts").exists());
    }
}
