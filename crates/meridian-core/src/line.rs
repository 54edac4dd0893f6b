//! # Line Computer
//!
//! The pure function at the heart of the settlement engine: raw line inputs
//! in, a fresh block of derived pricing/tax fields out.
//!
//! ## Data Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Line Computation                                  │
//! │                                                                         │
//! │  quantity, unit_price, discount, freight, tax option/rates             │
//! │       │                                                                 │
//! │       ▼ (negatives coerce to zero first - never an error)              │
//! │  price_after_discount = unit_price − discount_amount                   │
//! │       │   (may go NEGATIVE; surfaced at submission, not clamped)       │
//! │       ▼                                                                 │
//! │  taxable_base = quantity × price_after_discount + freight              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TaxProfile::apply → cgst/sgst or igst                                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  line_total = taxable_base  (tax-exclusive; the header adds tax)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Purity Contract
//! `compute` never fails, never mutates, and is total over its numeric
//! domain. Calling it twice on the same input yields bit-identical output,
//! which is what lets every edit handler recompute unconditionally without
//! drift. All validation ("quantity must be > 0") is the submission
//! checkpoint's job, not this function's.

use crate::money::Money;
use crate::tax::TaxProfile;
use crate::types::{DocumentLine, LineDerived};

// =============================================================================
// Line Inputs
// =============================================================================

/// The raw commercial inputs of a line, decoupled from [`DocumentLine`] so
/// the computation can be exercised without building a whole line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineInputs {
    pub quantity: i64,
    pub unit_price: Money,
    pub discount_amount: Money,
    pub freight: Money,
    pub profile: TaxProfile,
}

impl LineInputs {
    /// Extracts the inputs from a document line.
    pub fn from_line(line: &DocumentLine) -> Self {
        LineInputs {
            quantity: line.quantity,
            unit_price: line.unit_price,
            discount_amount: line.discount_amount,
            freight: line.freight,
            profile: TaxProfile::resolve(line.tax_option, line.gst_rate, line.igst_rate),
        }
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Computes a line's derived pricing/tax block.
///
/// Returns a fresh [`LineDerived`] record; callers diff or overwrite the
/// line's stored block wholesale. See the module docs for the algorithm.
///
/// ## Edge Cases
/// - Negative raw inputs coerce to zero before computation (never throw).
///   The one deliberate exception is the derived `price_after_discount`,
///   which is allowed to go negative when the discount exceeds the price.
/// - `quantity == 0` yields all-zero amounts apart from freight feeding the
///   base. Batch allocations are NOT touched here - clearing them is the
///   batch reconciler's job, triggered only on an explicit quantity *edit*.
pub fn compute(inputs: &LineInputs) -> LineDerived {
    let quantity = inputs.quantity.max(0);
    let unit_price = inputs.unit_price.coerce_non_negative();
    let discount = inputs.discount_amount.coerce_non_negative();
    let freight = inputs.freight.coerce_non_negative();

    let price_after_discount = unit_price - discount;
    let taxable_base = price_after_discount.multiply_quantity(quantity) + freight;

    let tax = inputs.profile.apply(taxable_base);

    LineDerived {
        price_after_discount,
        taxable_base,
        cgst_amount: tax.cgst_amount,
        sgst_amount: tax.sgst_amount,
        igst_amount: tax.igst_amount,
        total_tax: tax.total_tax,
        line_total: taxable_base,
    }
}

/// Recomputes a line's derived block in place from its current raw fields.
///
/// Thin convenience over [`compute`] used by the edit reducer; the
/// computation itself stays pure.
pub fn recompute_line(line: &mut DocumentLine) {
    line.derived = compute(&LineInputs::from_line(line));
}

// =============================================================================
// Unit Tests
// =============================================================================
