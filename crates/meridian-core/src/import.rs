//! # Bulk Import Merger
//!
//! Merges sparse external rows (parsed spreadsheet rows) into an existing
//! keyed collection of price-list entries, overwriting only recognized
//! fields and re-deriving dependent fields through the discount
//! synchronizer.
//!
//! ## Merge Semantics
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Bulk Import Merge                                   │
//! │                                                                         │
//! │  Row: { itemCode: "X", gstPercent: 12 }                                │
//! │       │                                                                 │
//! │       ▼ resolve itemCode → entity id (caller-supplied lookup)          │
//! │       │     └── unresolved? count as SKIPPED, continue (never abort)   │
//! │       ▼                                                                 │
//! │  Overwrite ONLY fields present and non-empty in the row;               │
//! │  absent fields RETAIN their current value (never reset)                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Re-run discount derivation so percent/amount stay consistent for      │
//! │  imported rows exactly as for manually-typed ones                      │
//! │                                                                         │
//! │  Dates: "2024-03-01" | 45352 (serial) | "01/03/2024" → YYYY-MM-DD      │
//! │         unparseable → unset sentinel, row still applies                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Rows are flat key → JSON value maps (`serde_json::Value`): the upstream
//! spreadsheet parser hands over strings and numbers interchangeably, and
//! the loose typing is contained entirely inside this module.

use std::collections::HashMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use ts_rs::TS;

use crate::discount::DiscountSync;
use crate::money::{div_round, Money, Percent};
use crate::types::PriceListEntry;

/// A loosely-typed external row: flat field name → raw value.
pub type ImportRow = HashMap<String, Value>;

/// Natural key → entity id lookup table, supplied by the caller.
pub type KeyLookup = HashMap<String, String>;

/// The row field carrying the natural key.
pub const NATURAL_KEY_FIELD: &str = "itemCode";

// =============================================================================
// Import Report
// =============================================================================

/// Caller-facing outcome counts. Unresolved rows are counted and reported,
/// never treated as fatal for the whole import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    /// Rows whose natural key resolved and whose fields were applied.
    pub applied: usize,
    /// Rows with a missing/unresolvable natural key.
    pub skipped: usize,
}

// =============================================================================
// Merge
// =============================================================================

/// Merges `rows` into `entries` (keyed by entity id) in place.
///
/// Per row: resolve the natural key via `lookup`; overwrite only the fields
/// present and non-empty in the row; re-derive the discount pair whenever a
/// price or discount field was written.
pub fn merge_rows(
    entries: &mut HashMap<String, PriceListEntry>,
    rows: &[ImportRow],
    lookup: &KeyLookup,
) -> ImportReport {
    let mut report = ImportReport::default();

    for row in rows {
        let entity_id = row
            .get(NATURAL_KEY_FIELD)
            .and_then(value_as_string)
            .and_then(|code| lookup.get(code.trim()).cloned());

        let Some(entity_id) = entity_id else {
            report.skipped += 1;
            continue;
        };
        let Some(entry) = entries.get_mut(&entity_id) else {
            report.skipped += 1;
            continue;
        };

        apply_row(entry, row);
        report.applied += 1;
    }

    report
}

/// Applies one resolved row's present fields to an entry.
fn apply_row(entry: &mut PriceListEntry, row: &ImportRow) {
    let selling_price = row.get("sellingPrice").and_then(parse_money);
    let gst_percent = row.get("gstPercent").and_then(parse_percent);
    let discount_percent = row.get("discountPercent").and_then(parse_percent);
    let discount_amount = row.get("discountAmount").and_then(parse_money);

    if let Some(sp) = selling_price {
        entry.selling_price = sp;
    }
    if let Some(gst) = gst_percent {
        entry.gst_percent = gst;
    }

    // Dates normalize independently; an unparseable value leaves the field
    // untouched rather than clearing it
    if let Some(v) = row.get("validFrom") {
        if let Some(d) = normalize_date(v) {
            entry.valid_from = Some(d);
        }
    }
    if let Some(v) = row.get("validUpto") {
        if let Some(d) = normalize_date(v) {
            entry.valid_upto = Some(d);
        }
    }

    // Re-derive the discount pair exactly as a manual edit would: an
    // imported amount wins over an imported percent when both are present,
    // and a price-only import re-derives the dependent side
    let touched_discount =
        selling_price.is_some() || discount_percent.is_some() || discount_amount.is_some();
    if touched_discount {
        let mut sync = DiscountSync::from_row(
            entry.selling_price,
            entry.discount_percent,
            entry.discount_amount,
        );
        if let Some(a) = discount_amount {
            sync.set_amount(Some(a));
        } else if let Some(p) = discount_percent {
            sync.set_percent(Some(p));
        }
        entry.discount_percent = sync.discount_percent();
        entry.discount_amount = sync.discount_amount();
    }
}

// =============================================================================
// Value Coercion
// =============================================================================

/// String view of a JSON value, for the natural key field.
fn value_as_string(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s),
        _ => None,
    }
}

/// Coerces a raw cell to Money. Numbers are rupees (possibly fractional);
/// strings parse the same way. Negative, empty, and garbage values coerce
/// to the unset sentinel - never an error.
fn parse_money(value: &Value) -> Option<Money> {
    parse_number(value)
        .filter(|v| *v >= 0.0)
        .map(|v| Money::from_paise(div_round((v * 10_000.0).round() as i128, 100)))
}

/// Coerces a raw cell to a Percent (bps). Same coercion rules as money;
/// values above 100 are out of range and coerce to unset.
fn parse_percent(value: &Value) -> Option<Percent> {
    parse_number(value)
        .filter(|v| (0.0..=100.0).contains(v))
        .map(|v| Percent::from_bps((v * 100.0).round() as u32))
}

fn parse_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

// =============================================================================
// Date Normalization
// =============================================================================

/// Spreadsheet serial date epoch (the Lotus-compatible 1899-12-30 offset).
const SERIAL_EPOCH: (i32, u32, u32) = (1899, 12, 30);

/// Serials outside this window are treated as not-a-date (plain numbers in
/// a date column).
const SERIAL_RANGE: std::ops::RangeInclusive<i64> = 1..=199_999;

/// Normalizes a raw cell to a canonical date.
///
/// Accepts, in order: already-canonical `YYYY-MM-DD` strings, spreadsheet
/// serial numbers, and common day-first/slash formats. Unparseable values
/// become the unset sentinel rather than failing the row.
pub fn normalize_date(value: &Value) -> Option<NaiveDate> {
    match value {
        Value::Number(n) => serial_to_date(n.as_f64()?),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            // A numeric string may be a serial exported as text
            if let Ok(serial) = s.parse::<f64>() {
                return serial_to_date(serial);
            }
            for format in ["%Y-%m-%d", "%d/%m/%Y", "%m/%d/%Y", "%d-%m-%Y", "%d.%m.%Y"] {
                if let Ok(date) = NaiveDate::parse_from_str(s, format) {
                    return Some(date);
                }
            }
            // ISO timestamps: take the date part
            s.get(..10)
                .and_then(|prefix| NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok())
        }
        _ => None,
    }
}

fn serial_to_date(serial: f64) -> Option<NaiveDate> {
    let days = serial.trunc() as i64;
    if !SERIAL_RANGE.contains(&days) {
        return None;
    }
    let (y, m, d) = SERIAL_EPOCH;
    NaiveDate::from_ymd_opt(y, m, d)?.checked_add_signed(Duration::days(days))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(id: &str, code: &str, price: i64, percent: Option<u32>) -> PriceListEntry {
        PriceListEntry {
            row_id: Some(id.to_string()),
            price_list_id: "PL-1".to_string(),
            warehouse_id: "WH-1".to_string(),
            item_id: id.to_string(),
            item_code: code.to_string(),
            item_name: format!("Item {}", code),
            selling_price: Money::from_paise(price),
            discount_percent: percent.map(Percent::from_bps),
            discount_amount: None,
            gst_percent: Percent::from_bps(1800),
            valid_from: None,
            valid_upto: None,
        }
    }

    fn state_and_lookup() -> (HashMap<String, PriceListEntry>, KeyLookup) {
        let mut entries = HashMap::new();
        entries.insert("E1".to_string(), entry("E1", "X", 10000, Some(1000)));
        let mut lookup = KeyLookup::new();
        lookup.insert("X".to_string(), "E1".to_string());
        (entries, lookup)
    }

    fn row(pairs: &[(&str, Value)]) -> ImportRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_import_non_destructiveness() {
        // Entry {sellingPrice: 100, discountPercent: 10}; row carries only
        // gstPercent: 12 → price and discount unchanged, gst becomes 12
        let (mut entries, lookup) = state_and_lookup();
        let rows = vec![row(&[
            ("itemCode", json!("X")),
            ("gstPercent", json!(12)),
        ])];

        let report = merge_rows(&mut entries, &rows, &lookup);

        assert_eq!(report, ImportReport { applied: 1, skipped: 0 });
        let e = &entries["E1"];
        assert_eq!(e.selling_price.paise(), 10000);
        assert_eq!(e.discount_percent, Some(Percent::from_bps(1000)));
        assert_eq!(e.gst_percent, Percent::from_bps(1200));
    }

    #[test]
    fn test_unresolved_rows_counted_not_fatal() {
        let (mut entries, lookup) = state_and_lookup();
        let rows = vec![
            row(&[("itemCode", json!("NOPE")), ("gstPercent", json!(5))]),
            row(&[("itemCode", json!("X")), ("gstPercent", json!(5))]),
            row(&[("gstPercent", json!(5))]), // no natural key at all
        ];

        let report = merge_rows(&mut entries, &rows, &lookup);

        assert_eq!(report, ImportReport { applied: 1, skipped: 2 });
        assert_eq!(entries["E1"].gst_percent, Percent::from_bps(500));
    }

    #[test]
    fn test_imported_amount_rederives_percent() {
        let (mut entries, lookup) = state_and_lookup();
        let rows = vec![row(&[
            ("itemCode", json!("X")),
            ("discountAmount", json!(25.0)),
            ("sellingPrice", json!(250.0)),
        ])];

        merge_rows(&mut entries, &rows, &lookup);

        let e = &entries["E1"];
        assert_eq!(e.selling_price.paise(), 25000);
        assert_eq!(e.discount_amount, Some(Money::from_paise(2500)));
        // Derived exactly as a manual entry would: 10.00%
        assert_eq!(e.discount_percent, Some(Percent::from_bps(1000)));
    }

    #[test]
    fn test_price_only_import_rederives_existing_percent() {
        // Existing independent percent 10%; new price 200 → amount follows
        let (mut entries, lookup) = state_and_lookup();
        let rows = vec![row(&[
            ("itemCode", json!("X")),
            ("sellingPrice", json!(200.0)),
        ])];

        merge_rows(&mut entries, &rows, &lookup);

        let e = &entries["E1"];
        assert_eq!(e.selling_price.paise(), 20000);
        assert_eq!(e.discount_percent, Some(Percent::from_bps(1000)));
        assert_eq!(e.discount_amount, Some(Money::from_paise(2000)));
    }

    #[test]
    fn test_garbage_values_coerce_silently() {
        let (mut entries, lookup) = state_and_lookup();
        let rows = vec![row(&[
            ("itemCode", json!("X")),
            ("sellingPrice", json!("not a number")),
            ("gstPercent", json!(-5)),
            ("validFrom", json!("yesterday-ish")),
        ])];

        let report = merge_rows(&mut entries, &rows, &lookup);

        // Row applies; the garbage fields simply leave state untouched
        assert_eq!(report.applied, 1);
        let e = &entries["E1"];
        assert_eq!(e.selling_price.paise(), 10000);
        assert_eq!(e.gst_percent, Percent::from_bps(1800));
        assert_eq!(e.valid_from, None);
    }

    #[test]
    fn test_normalize_date_canonical_string() {
        assert_eq!(
            normalize_date(&json!("2024-03-01")),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_normalize_date_excel_serial() {
        // 45352 days after 1899-12-30 = 2024-03-01
        assert_eq!(
            normalize_date(&json!(45352)),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        // Serial exported as text
        assert_eq!(
            normalize_date(&json!("45352")),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_normalize_date_slash_formats() {
        // Day-first wins over month-first when both could apply
        assert_eq!(
            normalize_date(&json!("01/03/2024")),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
        // Unambiguously month-first falls through to the second format
        assert_eq!(
            normalize_date(&json!("03/25/2024")),
            NaiveDate::from_ymd_opt(2024, 3, 25)
        );
    }

    #[test]
    fn test_normalize_date_iso_timestamp_prefix() {
        assert_eq!(
            normalize_date(&json!("2024-03-01T10:30:00Z")),
            NaiveDate::from_ymd_opt(2024, 3, 1)
        );
    }

    #[test]
    fn test_normalize_date_rejects_garbage() {
        assert_eq!(normalize_date(&json!("soon")), None);
        assert_eq!(normalize_date(&json!("")), None);
        assert_eq!(normalize_date(&json!(0)), None);
        assert_eq!(normalize_date(&json!(5_000_000)), None);
        assert_eq!(normalize_date(&json!(null)), None);
    }
}
