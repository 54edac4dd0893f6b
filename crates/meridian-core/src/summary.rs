//! # Document Summary Aggregator
//!
//! Folds all lines (already passed through the line computer) plus header
//! charges into document-level totals.
//!
//! ## Aggregation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Document Summary Fold                                 │
//! │                                                                         │
//! │  line 1 derived ──┐                                                     │
//! │  line 2 derived ──┼── Σ line_total        = items_total (tax-excl.)    │
//! │  line 3 derived ──┤   Σ tax split         = gst_total                  │
//! │                   └── Σ net × qty         = total_before_discount      │
//! │                                                                         │
//! │  + header freight                                                       │
//! │  + rounding                      grand_total = items + gst             │
//! │  ──────────────────────────►                 + freight + rounding      │
//! │                                                                         │
//! │  − (down payments + applied)     open_balance                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! This is a total, side-effect-free fold - safe to call on every keystroke
//! (the caller may debounce for UI smoothness; nothing here needs it).

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{DocumentHeader, DocumentLine, HeaderCharges, TaxOption};

// =============================================================================
// Document Summary
// =============================================================================

/// Document-level totals, recomputed on every relevant change (lines array,
/// freight, rounding, down payment, applied amount).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentSummary {
    /// Σ(price_after_discount × quantity) over all lines.
    pub total_before_discount: Money,

    /// Σ(line_total): tax-exclusive, includes per-line freight.
    pub items_total: Money,

    /// Σ(igst if IGST else cgst + sgst).
    pub gst_total: Money,

    /// items_total + gst_total + header freight + rounding.
    pub grand_total: Money,

    /// grand_total − (down payments + applied amounts).
    ///
    /// Only meaningful for documents that track advance payments; zero
    /// charges leave it equal to the grand total.
    pub open_balance: Money,
}

impl DocumentSummary {
    /// Computes the summary for a set of lines plus header charges.
    pub fn compute(lines: &[DocumentLine], charges: &HeaderCharges) -> Self {
        let total_before_discount = lines
            .iter()
            .map(|l| l.derived.price_after_discount.multiply_quantity(l.quantity.max(0)))
            .sum();

        let items_total: Money = lines.iter().map(|l| l.derived.line_total).sum();

        let gst_total: Money = lines
            .iter()
            .map(|l| match l.tax_option {
                TaxOption::Igst => l.derived.igst_amount,
                TaxOption::Gst => l.derived.cgst_amount + l.derived.sgst_amount,
            })
            .sum();

        let grand_total = items_total + gst_total + charges.freight + charges.rounding;
        let open_balance = grand_total - (charges.total_down_payment + charges.applied_amounts);

        DocumentSummary {
            total_before_discount,
            items_total,
            gst_total,
            grand_total,
            open_balance,
        }
    }

    /// Convenience over [`compute`](Self::compute) for a whole header.
    pub fn of_document(header: &DocumentHeader) -> Self {
        Self::compute(&header.lines, &header.charges)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
