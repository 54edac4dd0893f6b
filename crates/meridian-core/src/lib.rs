//! # meridian-core: Pure Settlement Logic for Meridian ERP
//!
//! This crate is the **heart** of the Meridian document-entry surfaces. It
//! contains all line settlement logic as pure functions with zero I/O
//! dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Meridian ERP Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              Document-Entry Surfaces (external)                 │   │
//! │  │   GRN form ─ Debit Note form ─ Inv. Adjustment ─ Price List    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ edits / summaries                      │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ meridian-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────┐ ┌────────┐ │   │
//! │  │   │  money  │ │   tax   │ │   line   │ │discount │ │ batch  │ │   │
//! │  │   │ paise + │ │GST/IGST │ │ derive   │ │ pct ↔   │ │ modes +│ │   │
//! │  │   │   bps   │ │ profile │ │  block   │ │ amount  │ │ totals │ │   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └─────────┘ └────────┘ │   │
//! │  │   ┌─────────┐ ┌─────────┐ ┌──────────┐ ┌─────────────────────┐│   │
//! │  │   │ summary │ │ import  │ │ document │ │     validation      ││   │
//! │  │   │  fold   │ │  merge  │ │ reducer  │ │  submission rules   ││   │
//! │  │   └─────────┘ └─────────┘ └──────────┘ └─────────────────────┘│   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               meridian-bridge (Collaborator Layer)              │   │
//! │  │      catalog lookup, batch stock fetches, persistence           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (DocumentLine, BatchAllocation, PriceListEntry)
//! - [`money`] - Money in paise and Percent in basis points (no floats!)
//! - [`tax`] - GST/IGST tax profile resolution and application
//! - [`line`] - Per-line derive of price, tax split, and totals
//! - [`discount`] - Bidirectional percent ↔ amount discount synchronizer
//! - [`batch`] - Batch entry/allocation editors and invariants
//! - [`summary`] - Document-level total fold
//! - [`import`] - Sparse external-row merge with date normalization
//! - [`document`] - The single edit-reducer mutation path
//! - [`validation`] - Submission-checkpoint rules
//! - [`error`] - Domain error types
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every derive is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are paise (i64); rates are basis
//!    points (u32). No floating point in any computation path
//! 4. **Coerce, then Validate**: Raw input coerces silently (negatives → 0,
//!    garbage → unset) during editing; hard rules fire only at submission
//!
//! ## Example Usage
//!
//! ```rust
//! use meridian_core::money::{Money, Percent};
//! use meridian_core::line::{compute, LineInputs};
//! use meridian_core::tax::TaxProfile;
//! use meridian_core::types::TaxOption;
//!
//! // 2 × ₹100.00 at 18% intra-state GST
//! let inputs = LineInputs {
//!     quantity: 2,
//!     unit_price: Money::from_paise(10_000),
//!     discount_amount: Money::zero(),
//!     freight: Money::zero(),
//!     profile: TaxProfile::resolve(TaxOption::Gst, Percent::from_bps(1800), None),
//! };
//! let derived = compute(&inputs);
//!
//! assert_eq!(derived.taxable_base.paise(), 20_000);
//! assert_eq!(derived.cgst_amount.paise(), 1_800); // 9% each half
//! assert_eq!(derived.sgst_amount, derived.cgst_amount);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod batch;
pub mod discount;
pub mod document;
pub mod error;
pub mod import;
pub mod line;
pub mod money;
pub mod summary;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use meridian_core::Money` instead of
// `use meridian_core::money::Money`

pub use document::{apply_edit, DocumentState, LineEdit};
pub use error::{CoreError, CoreResult, ValidationError, ValidationResult};
pub use money::{Money, Percent};
pub use summary::DocumentSummary;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum lines allowed on a single document.
///
/// ## Business Reason
/// Keeps documents reviewable and bounds per-edit recompute cost; matches
/// what the bulk-entry surfaces can sensibly display.
pub const MAX_DOCUMENT_LINES: usize = 500;

/// Maximum quantity on a single line.
///
/// ## Business Reason
/// Prevents accidental over-entry (e.g., a scanned barcode landing in the
/// quantity cell).
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;

/// Maximum discount percent in basis points (100%).
pub const MAX_DISCOUNT_BPS: u32 = 10_000;

/// Maximum GST/IGST rate in basis points (100%).
///
/// Real slabs top out at 28%; the ceiling only catches unit mix-ups
/// (entering 1800 where 18 was meant).
pub const GST_RATE_MAX_BPS: u32 = 10_000;
