//! # Tax Profile Resolver
//!
//! Resolves a line's tax option and rate(s) into the split policy to apply,
//! then applies it to a taxable base.
//!
//! ## GST Split Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       India GST Split                                   │
//! │                                                                         │
//! │  Intra-state (GST):    nominal 18%                                     │
//! │       │                                                                 │
//! │       ├── CGST  9%  ──┐                                                │
//! │       └── SGST  9%  ──┴── each half rounded INDEPENDENTLY, so          │
//! │                           cgst == sgst holds by construction           │
//! │                                                                         │
//! │  Inter-state (IGST):   full nominal rate, single amount                │
//! │       └── effective rate = igst_rate if present, else gst_rate         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Percent};
use crate::types::TaxOption;

// =============================================================================
// Tax Profile
// =============================================================================

/// The split policy for a line, resolved from its tax option and rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaxProfile {
    /// Intra-state: the nominal rate splits evenly into CGST + SGST.
    IntraState { rate: Percent },
    /// Inter-state: the full effective rate applies as IGST.
    InterState { rate: Percent },
}

impl TaxProfile {
    /// Resolves the policy for a line.
    ///
    /// For IGST lines the effective rate is `igst_rate` when present,
    /// otherwise the nominal `gst_rate` is used wholesale (never halved).
    pub fn resolve(option: TaxOption, gst_rate: Percent, igst_rate: Option<Percent>) -> Self {
        match option {
            TaxOption::Gst => TaxProfile::IntraState { rate: gst_rate },
            TaxOption::Igst => TaxProfile::InterState {
                rate: igst_rate.unwrap_or(gst_rate),
            },
        }
    }

    /// Applies the policy to a taxable base.
    ///
    /// Each CGST/SGST half is computed independently at half the nominal
    /// rate (one rounding per half), so the two halves are always equal and
    /// the total is `2 × half` - within a paisa of the exact
    /// `base × rate`, which is the 2-decimal rounding rule.
    pub fn apply(&self, taxable_base: Money) -> TaxBreakdown {
        match *self {
            TaxProfile::IntraState { rate } => {
                let half = rate.of_halved(taxable_base);
                TaxBreakdown {
                    cgst_amount: half,
                    sgst_amount: half,
                    igst_amount: Money::zero(),
                    total_tax: half + half,
                }
            }
            TaxProfile::InterState { rate } => {
                let igst = rate.of(taxable_base);
                TaxBreakdown {
                    cgst_amount: Money::zero(),
                    sgst_amount: Money::zero(),
                    igst_amount: igst,
                    total_tax: igst,
                }
            }
        }
    }
}

// =============================================================================
// Tax Breakdown
// =============================================================================

/// The computed tax amounts for a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct TaxBreakdown {
    pub cgst_amount: Money,
    pub sgst_amount: Money,
    pub igst_amount: Money,
    pub total_tax: Money,
}

// =============================================================================
// Unit Tests
// =============================================================================
