//! # Document Edit Reducer
//!
//! Single mutation path for a document under edit. Every UI gesture becomes
//! a [`LineEdit`], and [`apply_edit`] is the only function that mutates
//! [`DocumentState`], so the recompute ordering can never be skipped.
//!
//! ## Edit Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Edit Reducer                                      │
//! │                                                                         │
//! │  LineEdit ──► apply_edit(&mut state, edit)                             │
//! │                     │                                                   │
//! │                     ├── 1. mutate the targeted field                   │
//! │                     │                                                   │
//! │                     ├── 2. quantity changed on a batch item?           │
//! │                     │       └── discard its allocations (stale)        │
//! │                     │                                                   │
//! │                     ├── 3. recompute the line's derived block          │
//! │                     │                                                   │
//! │                     └── 4. refold the document summary                 │
//! │                                                                         │
//! │  No partial recomputes: steps 3-4 run after EVERY accepted edit.       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::batch::reset_allocations;
use crate::error::{CoreError, CoreResult};
use crate::line::recompute_line;
use crate::money::{Money, Percent};
use crate::summary::DocumentSummary;
use crate::types::{
    BatchAllocation, CatalogItemDetail, DocumentHeader, DocumentKind, DocumentLine, HeaderCharges,
    TaxOption,
};
use crate::MAX_DOCUMENT_LINES;

// =============================================================================
// Document State
// =============================================================================

/// A document under edit plus its always-current summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentState {
    pub header: DocumentHeader,
    pub summary: DocumentSummary,
}

impl DocumentState {
    /// Fresh empty document of the given kind.
    pub fn new(kind: DocumentKind) -> Self {
        DocumentState {
            header: DocumentHeader::new(kind),
            summary: DocumentSummary::default(),
        }
    }

    /// Wraps a loaded document, recomputing everything derived so a stale
    /// stored summary can never survive into an edit session.
    pub fn from_header(mut header: DocumentHeader) -> Self {
        for line in &mut header.lines {
            recompute_line(line);
        }
        let summary = DocumentSummary::of_document(&header);
        DocumentState { header, summary }
    }
}

// =============================================================================
// Line Edits
// =============================================================================

/// One user gesture against the document.
///
/// Raw numeric payloads are already coerced by the surface (negatives and
/// garbage become zero/unset before an edit is constructed); the reducer
/// applies them verbatim and re-derives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase", tag = "kind")]
pub enum LineEdit {
    /// Append an empty line awaiting item selection.
    AddLine,

    /// Remove a line outright.
    RemoveLine { index: usize },

    /// Select (or re-select) a catalog item into a line. Resets every
    /// commercial field on the line.
    SelectItem {
        index: usize,
        detail: CatalogItemDetail,
    },

    /// Change the warehouse reference. Batch allocations against the old
    /// warehouse are discarded.
    SetWarehouse {
        index: usize,
        warehouse_id: Option<String>,
    },

    SetQuantity { index: usize, quantity: i64 },
    SetUnitPrice { index: usize, unit_price: Money },
    SetDiscountAmount { index: usize, discount_amount: Money },
    SetFreight { index: usize, freight: Money },
    SetTaxOption { index: usize, tax_option: TaxOption },
    SetGstRate { index: usize, gst_rate: Percent },
    SetIgstRate {
        index: usize,
        igst_rate: Option<Percent>,
    },

    /// Replace a line's batch allocations (the batch editors' confirm path).
    SetBatches {
        index: usize,
        batches: Vec<BatchAllocation>,
    },

    /// Replace the header-level charges.
    SetHeaderCharges { charges: HeaderCharges },
}

// =============================================================================
// Reducer
// =============================================================================

/// Applies one edit, re-deriving the touched line and the summary.
///
/// Returns `LineIndexOutOfRange` for a stale index (the UI raced a removal);
/// state is untouched on error.
pub fn apply_edit(state: &mut DocumentState, edit: LineEdit) -> CoreResult<()> {
    match edit {
        LineEdit::AddLine => {
            if state.header.lines.len() >= MAX_DOCUMENT_LINES {
                return Err(CoreError::Validation(
                    crate::error::ValidationError::TooManyLines {
                        max: MAX_DOCUMENT_LINES,
                    },
                ));
            }
            state.header.lines.push(DocumentLine::new());
        }

        LineEdit::RemoveLine { index } => {
            check_index(state, index)?;
            state.header.lines.remove(index);
        }

        LineEdit::SelectItem { index, detail } => {
            line_mut(state, index)?.apply_catalog_item(&detail);
        }

        LineEdit::SetWarehouse {
            index,
            warehouse_id,
        } => {
            let line = line_mut(state, index)?;
            line.warehouse_id = warehouse_id;
            reset_allocations(line);
        }

        LineEdit::SetQuantity { index, quantity } => {
            let line = line_mut(state, index)?;
            line.quantity = quantity.max(0);
            // Existing allocations were reconciled against the OLD quantity
            if line.managed_by.is_batch() {
                reset_allocations(line);
            }
        }

        LineEdit::SetUnitPrice { index, unit_price } => {
            line_mut(state, index)?.unit_price = unit_price;
        }

        LineEdit::SetDiscountAmount {
            index,
            discount_amount,
        } => {
            line_mut(state, index)?.discount_amount = discount_amount;
        }

        LineEdit::SetFreight { index, freight } => {
            line_mut(state, index)?.freight = freight;
        }

        LineEdit::SetTaxOption { index, tax_option } => {
            line_mut(state, index)?.tax_option = tax_option;
        }

        LineEdit::SetGstRate { index, gst_rate } => {
            line_mut(state, index)?.gst_rate = gst_rate;
        }

        LineEdit::SetIgstRate { index, igst_rate } => {
            line_mut(state, index)?.igst_rate = igst_rate;
        }

        LineEdit::SetBatches { index, batches } => {
            line_mut(state, index)?.batches = batches;
        }

        LineEdit::SetHeaderCharges { charges } => {
            state.header.charges = charges;
        }
    }

    for line in &mut state.header.lines {
        recompute_line(line);
    }
    state.summary = DocumentSummary::of_document(&state.header);

    Ok(())
}

fn check_index(state: &DocumentState, index: usize) -> CoreResult<()> {
    if index < state.header.lines.len() {
        Ok(())
    } else {
        Err(CoreError::LineIndexOutOfRange(index))
    }
}

fn line_mut(state: &mut DocumentState, index: usize) -> CoreResult<&mut DocumentLine> {
    state
        .header
        .lines
        .get_mut(index)
        .ok_or(CoreError::LineIndexOutOfRange(index))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ManagedBy;

    fn detail(managed_by: ManagedBy) -> CatalogItemDetail {
        CatalogItemDetail {
            item_id: "ITM-1".to_string(),
            item_code: "SKU-1".to_string(),
            item_name: "Widget".to_string(),
            unit_price: Money::from_paise(10000),
            discount: Money::zero(),
            freight: Money::zero(),
            gst_rate: Percent::from_bps(1800),
            igst_rate: None,
            tax_option: TaxOption::Gst,
            managed_by,
            warehouse_id: Some("WH-1".to_string()),
        }
    }

    fn state_with_item(managed_by: ManagedBy) -> DocumentState {
        let mut state = DocumentState::new(DocumentKind::GoodsReceipt);
        apply_edit(&mut state, LineEdit::AddLine).unwrap();
        apply_edit(
            &mut state,
            LineEdit::SelectItem {
                index: 0,
                detail: detail(managed_by),
            },
        )
        .unwrap();
        state
    }

    #[test]
    fn test_commercial_edit_recomputes_line_and_summary() {
        let mut state = state_with_item(ManagedBy::None);
        apply_edit(&mut state, LineEdit::SetQuantity { index: 0, quantity: 2 }).unwrap();

        let line = &state.header.lines[0];
        assert_eq!(line.derived.taxable_base.paise(), 20000);
        assert_eq!(line.derived.total_tax.paise(), 3600);
        assert_eq!(state.summary.grand_total.paise(), 23600);
    }

    #[test]
    fn test_quantity_edit_discards_batch_allocations() {
        let mut state = state_with_item(ManagedBy::Batch);
        apply_edit(&mut state, LineEdit::SetQuantity { index: 0, quantity: 50 }).unwrap();
        apply_edit(
            &mut state,
            LineEdit::SetBatches {
                index: 0,
                batches: vec![BatchAllocation {
                    batch_code: "B1".to_string(),
                    allocated_quantity: 50,
                    expiry_date: None,
                    manufacturer: None,
                    unit_price: None,
                }],
            },
        )
        .unwrap();
        assert_eq!(state.header.lines[0].allocated_quantity(), 50);

        apply_edit(&mut state, LineEdit::SetQuantity { index: 0, quantity: 60 }).unwrap();
        assert!(state.header.lines[0].batches.is_empty());
    }

    #[test]
    fn test_price_edit_keeps_batch_allocations() {
        let mut state = state_with_item(ManagedBy::Batch);
        apply_edit(&mut state, LineEdit::SetQuantity { index: 0, quantity: 10 }).unwrap();
        apply_edit(
            &mut state,
            LineEdit::SetBatches {
                index: 0,
                batches: vec![BatchAllocation {
                    batch_code: "B1".to_string(),
                    allocated_quantity: 10,
                    expiry_date: None,
                    manufacturer: None,
                    unit_price: None,
                }],
            },
        )
        .unwrap();

        apply_edit(
            &mut state,
            LineEdit::SetUnitPrice {
                index: 0,
                unit_price: Money::from_paise(12500),
            },
        )
        .unwrap();
        assert_eq!(state.header.lines[0].allocated_quantity(), 10);
    }

    #[test]
    fn test_warehouse_change_discards_batch_allocations() {
        let mut state = state_with_item(ManagedBy::Batch);
        apply_edit(&mut state, LineEdit::SetQuantity { index: 0, quantity: 5 }).unwrap();
        apply_edit(
            &mut state,
            LineEdit::SetBatches {
                index: 0,
                batches: vec![BatchAllocation {
                    batch_code: "B1".to_string(),
                    allocated_quantity: 5,
                    expiry_date: None,
                    manufacturer: None,
                    unit_price: None,
                }],
            },
        )
        .unwrap();

        apply_edit(
            &mut state,
            LineEdit::SetWarehouse {
                index: 0,
                warehouse_id: Some("WH-2".to_string()),
            },
        )
        .unwrap();
        assert!(state.header.lines[0].batches.is_empty());
    }

    #[test]
    fn test_remove_line_updates_summary() {
        let mut state = state_with_item(ManagedBy::None);
        apply_edit(&mut state, LineEdit::SetQuantity { index: 0, quantity: 2 }).unwrap();
        assert_ne!(state.summary.grand_total, Money::zero());

        apply_edit(&mut state, LineEdit::RemoveLine { index: 0 }).unwrap();
        assert_eq!(state.summary, DocumentSummary::default());
    }

    #[test]
    fn test_stale_index_is_an_error_and_leaves_state_intact() {
        let mut state = state_with_item(ManagedBy::None);
        let before = state.clone();

        let err = apply_edit(&mut state, LineEdit::SetQuantity { index: 7, quantity: 1 });
        assert!(matches!(err, Err(CoreError::LineIndexOutOfRange(7))));
        assert_eq!(state, before);
    }

    #[test]
    fn test_negative_quantity_coerces_to_zero() {
        let mut state = state_with_item(ManagedBy::None);
        apply_edit(&mut state, LineEdit::SetQuantity { index: 0, quantity: -4 }).unwrap();
        assert_eq!(state.header.lines[0].quantity, 0);
    }

    #[test]
    fn test_header_charges_fold_into_summary() {
        let mut state = state_with_item(ManagedBy::None);
        apply_edit(&mut state, LineEdit::SetQuantity { index: 0, quantity: 2 }).unwrap();
        apply_edit(
            &mut state,
            LineEdit::SetHeaderCharges {
                charges: HeaderCharges {
                    freight: Money::from_paise(5000),
                    ..HeaderCharges::default()
                },
            },
        )
        .unwrap();
        assert_eq!(state.summary.grand_total.paise(), 28600);
    }

    #[test]
    fn test_from_header_recomputes_stale_derived_blocks() {
        let mut header = DocumentHeader::new(DocumentKind::DebitNote);
        let mut line = DocumentLine::new();
        line.item_id = Some("ITM-1".to_string());
        line.quantity = 2;
        line.unit_price = Money::from_paise(10000);
        line.gst_rate = Percent::from_bps(1800);
        // derived left at default, as a stale stored payload would have it
        header.lines.push(line);

        let state = DocumentState::from_header(header);
        assert_eq!(state.header.lines[0].derived.taxable_base.paise(), 20000);
        assert_eq!(state.summary.grand_total.paise(), 23600);
    }
}
