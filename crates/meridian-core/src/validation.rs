//! # Validation Module
//!
//! Submission-checkpoint validation for documents and price-list rows.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Form surface (per-keystroke)                                 │
//! │  ├── Coercion only: negatives → 0, garbage → unset                     │
//! │  └── NEVER errors; in-progress edits may be inconsistent               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (submission / explicit confirm)                  │
//! │  ├── Required references (item, warehouse)                             │
//! │  ├── Positivity and range rules                                        │
//! │  └── Batch allocation invariants (delegated to batch.rs)               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Persistence collaborator                                     │
//! │  └── Referential integrity, uniqueness                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function returns the FIRST failure found, with enough context
//! (line number, field, quantities) for the UI to point at the offending
//! cell. Line numbers are 1-based in every error.

use crate::batch::validate_line_batches;
use crate::discount::DiscountSync;
use crate::error::{ValidationError, ValidationResult};
use crate::money::Percent;
use crate::types::{DocumentHeader, DocumentLine, PriceListEntry};
use crate::{GST_RATE_MAX_BPS, MAX_DISCOUNT_BPS, MAX_DOCUMENT_LINES, MAX_LINE_QUANTITY};

// =============================================================================
// Document Validation
// =============================================================================

/// Validates a whole document for submission.
///
/// ## Checks (in order)
/// 1. At least one line, at most `MAX_DOCUMENT_LINES`
/// 2. Every line passes [`validate_line`]
/// 3. Every batch-managed line satisfies the allocation invariants
pub fn validate_document(header: &DocumentHeader) -> ValidationResult<()> {
    if header.lines.is_empty() {
        return Err(ValidationError::NoLines);
    }
    if header.lines.len() > MAX_DOCUMENT_LINES {
        return Err(ValidationError::TooManyLines {
            max: MAX_DOCUMENT_LINES,
        });
    }

    for (index, line) in header.lines.iter().enumerate() {
        let line_no = index + 1;
        validate_line(line, line_no)?;
        validate_line_batches(line, line_no)?;
    }

    Ok(())
}

/// Validates one document line for submission.
///
/// ## Rules
/// - Item reference is required; warehouse is required for batch-managed
///   items (allocations are meaningless without a location)
/// - Quantity must be positive and within `MAX_LINE_QUANTITY`
/// - Unit price must be positive
/// - The derived net price must not be negative (the line computer leaves
///   it unclamped during editing so the failure surfaces here)
/// - Tax rates must be within `GST_RATE_MAX_BPS`
pub fn validate_line(line: &DocumentLine, line_no: usize) -> ValidationResult<()> {
    if line.item_id.as_deref().map_or(true, |id| id.trim().is_empty()) {
        return Err(ValidationError::LineFieldRequired {
            line: line_no,
            field: "item",
        });
    }

    if line.managed_by.is_batch()
        && line
            .warehouse_id
            .as_deref()
            .map_or(true, |id| id.trim().is_empty())
    {
        return Err(ValidationError::LineFieldRequired {
            line: line_no,
            field: "warehouse",
        });
    }

    if line.quantity <= 0 {
        return Err(ValidationError::LineMustBePositive {
            line: line_no,
            field: "quantity",
        });
    }
    if line.quantity > MAX_LINE_QUANTITY {
        return Err(ValidationError::LineQuantityTooLarge {
            line: line_no,
            max: MAX_LINE_QUANTITY,
        });
    }

    if !line.unit_price.is_positive() {
        return Err(ValidationError::LineMustBePositive {
            line: line_no,
            field: "unit price",
        });
    }

    if line.derived.price_after_discount.is_negative() {
        return Err(ValidationError::NegativeNetPrice { line: line_no });
    }

    validate_tax_rate(line.gst_rate)?;
    if let Some(igst) = line.igst_rate {
        validate_tax_rate(igst)?;
    }

    Ok(())
}

// =============================================================================
// Price List Validation
// =============================================================================

/// Validates one price-list row for submission.
///
/// `row` is the 1-based row number, reported in field errors the same way
/// document validation reports line numbers.
pub fn validate_price_list_entry(entry: &PriceListEntry, row: usize) -> ValidationResult<()> {
    if entry.item_id.trim().is_empty() {
        return Err(ValidationError::LineFieldRequired {
            line: row,
            field: "item",
        });
    }

    if entry.warehouse_id.trim().is_empty() {
        return Err(ValidationError::LineFieldRequired {
            line: row,
            field: "warehouse",
        });
    }

    if !entry.selling_price.is_positive() {
        return Err(ValidationError::LineMustBePositive {
            line: row,
            field: "selling price",
        });
    }

    if let Some(percent) = entry.discount_percent {
        if percent.bps() > MAX_DISCOUNT_BPS {
            return Err(ValidationError::DiscountTooLarge {
                got_bps: percent.bps(),
                max_bps: MAX_DISCOUNT_BPS,
            });
        }
    }

    validate_tax_rate(entry.gst_percent)?;

    if let (Some(from), Some(upto)) = (entry.valid_from, entry.valid_upto) {
        if upto < from {
            return Err(ValidationError::InvalidValidityRange {
                from: from.to_string(),
                upto: upto.to_string(),
            });
        }
    }

    let sync = DiscountSync::from_row(
        entry.selling_price,
        entry.discount_percent,
        entry.discount_amount,
    );
    if !sync.final_price().is_positive() {
        return Err(ValidationError::FinalPriceNotPositive);
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a GST/IGST rate.
///
/// ## Rules
/// - Must not exceed `GST_RATE_MAX_BPS` (100%)
/// - Real rates are 0-2800 (the Indian GST slabs); the ceiling only guards
///   against unit mix-ups, not slab membership
pub fn validate_tax_rate(rate: Percent) -> ValidationResult<()> {
    if rate.bps() > GST_RATE_MAX_BPS {
        return Err(ValidationError::TaxRateOutOfRange {
            got_bps: rate.bps(),
            max_bps: GST_RATE_MAX_BPS,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::line::recompute_line;
    use crate::money::Money;
    use crate::types::{BatchAllocation, DocumentKind, ManagedBy};

    fn valid_line() -> DocumentLine {
        let mut line = DocumentLine::new();
        line.item_id = Some("ITM-1".to_string());
        line.quantity = 2;
        line.unit_price = Money::from_paise(10000);
        line.gst_rate = Percent::from_bps(1800);
        recompute_line(&mut line);
        line
    }

    fn valid_entry() -> PriceListEntry {
        PriceListEntry {
            row_id: None,
            price_list_id: "PL-1".to_string(),
            warehouse_id: "WH-1".to_string(),
            item_id: "ITM-1".to_string(),
            item_code: "SKU-1".to_string(),
            item_name: "Widget".to_string(),
            selling_price: Money::from_paise(25000),
            discount_percent: Some(Percent::from_bps(1000)),
            discount_amount: Some(Money::from_paise(2500)),
            gst_percent: Percent::from_bps(1800),
            valid_from: None,
            valid_upto: None,
        }
    }

    #[test]
    fn test_validate_line_accepts_complete_line() {
        assert!(validate_line(&valid_line(), 1).is_ok());
    }

    #[test]
    fn test_validate_line_requires_item() {
        let mut line = valid_line();
        line.item_id = None;
        assert_eq!(
            validate_line(&line, 3),
            Err(ValidationError::LineFieldRequired {
                line: 3,
                field: "item"
            })
        );

        line.item_id = Some("  ".to_string());
        assert!(validate_line(&line, 3).is_err());
    }

    #[test]
    fn test_validate_line_requires_warehouse_for_batch_items() {
        let mut line = valid_line();
        line.managed_by = ManagedBy::Batch;
        assert_eq!(
            validate_line(&line, 1),
            Err(ValidationError::LineFieldRequired {
                line: 1,
                field: "warehouse"
            })
        );

        line.warehouse_id = Some("WH-1".to_string());
        assert!(validate_line(&line, 1).is_ok());
    }

    #[test]
    fn test_validate_line_quantity_bounds() {
        let mut line = valid_line();
        line.quantity = 0;
        assert_eq!(
            validate_line(&line, 1),
            Err(ValidationError::LineMustBePositive {
                line: 1,
                field: "quantity"
            })
        );

        line.quantity = MAX_LINE_QUANTITY + 1;
        assert_eq!(
            validate_line(&line, 1),
            Err(ValidationError::LineQuantityTooLarge {
                line: 1,
                max: MAX_LINE_QUANTITY
            })
        );
    }

    #[test]
    fn test_validate_line_flags_negative_net_price() {
        let mut line = valid_line();
        line.discount_amount = Money::from_paise(15000); // > unit price
        recompute_line(&mut line);
        assert_eq!(
            validate_line(&line, 2),
            Err(ValidationError::NegativeNetPrice { line: 2 })
        );
    }

    #[test]
    fn test_validate_line_rejects_out_of_range_rates() {
        let mut line = valid_line();
        line.gst_rate = Percent::from_bps(GST_RATE_MAX_BPS + 1);
        assert!(matches!(
            validate_line(&line, 1),
            Err(ValidationError::TaxRateOutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_document_line_count() {
        let mut doc = DocumentHeader::new(DocumentKind::GoodsReceipt);
        assert_eq!(validate_document(&doc), Err(ValidationError::NoLines));

        doc.lines = vec![valid_line(); MAX_DOCUMENT_LINES + 1];
        assert_eq!(
            validate_document(&doc),
            Err(ValidationError::TooManyLines {
                max: MAX_DOCUMENT_LINES
            })
        );
    }

    #[test]
    fn test_validate_document_enforces_batch_totals() {
        let mut line = valid_line();
        line.managed_by = ManagedBy::Batch;
        line.warehouse_id = Some("WH-1".to_string());
        line.quantity = 50;
        line.batches.push(BatchAllocation {
            batch_code: "B1".to_string(),
            allocated_quantity: 45,
            expiry_date: None,
            manufacturer: None,
            unit_price: None,
        });
        recompute_line(&mut line);

        let mut doc = DocumentHeader::new(DocumentKind::GoodsReceipt);
        doc.lines.push(line);

        assert_eq!(
            validate_document(&doc),
            Err(ValidationError::BatchTotalMismatch {
                line: 1,
                allocated: 45,
                required: 50
            })
        );
    }

    #[test]
    fn test_validate_entry_accepts_consistent_row() {
        assert!(validate_price_list_entry(&valid_entry(), 1).is_ok());
    }

    #[test]
    fn test_validate_entry_requires_warehouse() {
        let mut entry = valid_entry();
        entry.warehouse_id = "  ".to_string();
        assert_eq!(
            validate_price_list_entry(&entry, 4),
            Err(ValidationError::LineFieldRequired {
                line: 4,
                field: "warehouse"
            })
        );
    }

    #[test]
    fn test_validate_entry_discount_ceiling() {
        let mut entry = valid_entry();
        entry.discount_percent = Some(Percent::from_bps(MAX_DISCOUNT_BPS + 1));
        assert_eq!(
            validate_price_list_entry(&entry, 1),
            Err(ValidationError::DiscountTooLarge {
                got_bps: MAX_DISCOUNT_BPS + 1,
                max_bps: MAX_DISCOUNT_BPS
            })
        );
    }

    #[test]
    fn test_validate_entry_validity_range() {
        let mut entry = valid_entry();
        entry.valid_from = chrono::NaiveDate::from_ymd_opt(2024, 6, 1);
        entry.valid_upto = chrono::NaiveDate::from_ymd_opt(2024, 5, 1);
        assert!(matches!(
            validate_price_list_entry(&entry, 1),
            Err(ValidationError::InvalidValidityRange { .. })
        ));

        entry.valid_upto = entry.valid_from; // same-day window is fine
        assert!(validate_price_list_entry(&entry, 1).is_ok());
    }

    #[test]
    fn test_validate_entry_final_price_must_be_positive() {
        let mut entry = valid_entry();
        // 100% discount → final price zero
        entry.discount_percent = Some(Percent::from_bps(10_000));
        entry.discount_amount = None;
        assert_eq!(
            validate_price_list_entry(&entry, 1),
            Err(ValidationError::FinalPriceNotPositive)
        );
    }
}
