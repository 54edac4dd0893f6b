//! # Domain Types
//!
//! Core domain types shared by every document-entry surface.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │ DocumentHeader  │1:N│  DocumentLine    │1:N│ BatchAllocation │      │
//! │  │  ─────────────  ├──►│  ─────────────   ├──►│  ─────────────  │      │
//! │  │  kind/direction │   │  id (UUID)       │   │  batch_code     │      │
//! │  │  header charges │   │  qty, price, tax │   │  allocated_qty  │      │
//! │  │  grand total    │   │  derived block   │   │  expiry, mfr    │      │
//! │  └─────────────────┘   └──────────────────┘   └─────────────────┘      │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │ PriceListEntry  │   │ CatalogItemDetail│   │ AvailableBatch  │      │
//! │  │  ─────────────  │   │  ─────────────   │   │  ─────────────  │      │
//! │  │  selling price  │   │  catalog answer  │   │  stock-on-hand  │      │
//! │  │  pct OR amount  │   │  for a line item │   │  per batch      │      │
//! │  └─────────────────┘   └──────────────────┘   └─────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity Pattern
//! Every line has:
//! - `id`: UUID v4 - stable, used only for UI diffing; stripped from the
//!   submitted payload by the bridge crate
//! - Business references: `item_id`, `warehouse_id` - what persistence sees

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::{Money, Percent};

// =============================================================================
// Tax Option
// =============================================================================

/// Which GST regime applies to a line.
///
/// ## Domain Rule
/// - `Gst`: intra-state transaction; the nominal rate splits evenly into
///   CGST + SGST halves.
/// - `Igst`: inter-state transaction; the full nominal rate applies as IGST.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum TaxOption {
    Gst,
    Igst,
}

impl Default for TaxOption {
    fn default() -> Self {
        TaxOption::Gst
    }
}

// =============================================================================
// Inventory Management Mode
// =============================================================================

/// How a catalog item's stock-keeping unit is tracked.
///
/// Fetched from the item master when not already present on a UI-selected
/// line (see the bridge crate's catalog lookup).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ManagedBy {
    /// Plain stock; no per-unit tracking.
    None,
    /// Tracked in discrete batches, each with its own quantity/expiry.
    Batch,
    /// Tracked per serial number (out of the settlement engine's batch path).
    Serial,
}

impl Default for ManagedBy {
    fn default() -> Self {
        ManagedBy::None
    }
}

impl ManagedBy {
    /// Whether this item participates in batch reconciliation.
    #[inline]
    pub const fn is_batch(&self) -> bool {
        matches!(self, ManagedBy::Batch)
    }
}

// =============================================================================
// Document Kind & Stock Direction
// =============================================================================

/// The transaction direction of a document, which selects the batch
/// reconciler's operating mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StockDirection {
    /// Stock enters the warehouse (GRN receipt, adjustment-in).
    /// Batch allocations are declared fresh by the user.
    Increase,
    /// Stock leaves the warehouse (debit note, consumption, adjustment-out).
    /// Batch allocations are drawn from existing on-hand batches.
    Decrease,
}

/// The document types that share the settlement engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// Goods Receipt Note - records physical receipt of purchased stock.
    GoodsReceipt,
    /// Debit Note - returns/charges stock back to a supplier.
    DebitNote,
    /// Inventory Adjustment - corrects on-hand stock in either direction.
    InventoryAdjustment,
}

impl DocumentKind {
    /// The default stock direction for this kind.
    ///
    /// An inventory adjustment can run either way; the header carries the
    /// chosen direction explicitly and this is only the starting value.
    pub const fn default_direction(&self) -> StockDirection {
        match self {
            DocumentKind::GoodsReceipt => StockDirection::Increase,
            DocumentKind::DebitNote => StockDirection::Decrease,
            DocumentKind::InventoryAdjustment => StockDirection::Increase,
        }
    }
}

// =============================================================================
// Batch Allocation
// =============================================================================

/// One batch's contribution to a document line.
///
/// ## Ownership
/// Exclusively owned by its parent [`DocumentLine`]; never shared or
/// referenced elsewhere.
///
/// ## Lifecycle
/// Created by the batch reconciler either fresh (increase mode - blank entry
/// awaiting user input) or copied from an available-stock candidate (decrease
/// mode). Destroyed on user removal or whenever the line quantity changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatchAllocation {
    /// Batch identifier (manufacturing lot code).
    pub batch_code: String,

    /// Units of the line quantity satisfied by this batch.
    pub allocated_quantity: i64,

    /// Batch expiry, when the item carries one.
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,

    /// Manufacturer name, when known.
    pub manufacturer: Option<String>,

    /// Unit price snapshot.
    ///
    /// Only meaningful in decrease/consumption mode, where cost must reflect
    /// the *source* batch's historical price, not the line's list price.
    pub unit_price: Option<Money>,
}

impl BatchAllocation {
    /// A fresh blank entry for increase-mode data entry.
    pub fn blank() -> Self {
        BatchAllocation {
            batch_code: String::new(),
            allocated_quantity: 0,
            expiry_date: None,
            manufacturer: None,
            unit_price: None,
        }
    }

    /// Whether the entry is still untouched (no code AND zero quantity).
    ///
    /// The creation-mode append guard refuses a new blank row while the most
    /// recent one is still in this state.
    pub fn is_blank(&self) -> bool {
        self.batch_code.trim().is_empty() && self.allocated_quantity == 0
    }

    /// Whether the entry survives submission filtering: non-empty code and
    /// positive quantity.
    pub fn is_submittable(&self) -> bool {
        !self.batch_code.trim().is_empty() && self.allocated_quantity > 0
    }
}

// =============================================================================
// Available Batch (collaborator response shape)
// =============================================================================

/// One on-hand batch candidate returned by the inventory collaborator for an
/// (item, warehouse) pair. Consumed only in decrease/allocation mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AvailableBatch {
    pub batch_code: String,
    /// Quantity on hand; per-batch allocations are clamped to this.
    pub available_quantity: i64,
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<NaiveDate>,
    pub manufacturer: Option<String>,
    /// Historical unit cost of this batch.
    pub unit_price: Money,
}

// =============================================================================
// Document Line
// =============================================================================

/// Derived pricing/tax fields of a line.
///
/// Never user-set directly; always recomputed as a whole by the line
/// computer so callers can diff and memoize. See `line.rs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineDerived {
    /// `unit_price - discount_amount`. May go negative when the discount
    /// exceeds the price; surfaced at submission, never silently floored.
    pub price_after_discount: Money,

    /// `quantity × price_after_discount + freight`.
    pub taxable_base: Money,

    /// Central GST half (intra-state only).
    pub cgst_amount: Money,

    /// State GST half (always equal to `cgst_amount`).
    pub sgst_amount: Money,

    /// Integrated GST (inter-state only).
    pub igst_amount: Money,

    /// Total tax for the line.
    pub total_tax: Money,

    /// Tax-exclusive line total (equals `taxable_base`; the document
    /// aggregator adds tax on top at the header).
    pub line_total: Money,
}

/// One transacted row of a document.
///
/// ## Lifecycle
/// Created when a line is added or a catalog item is selected into it (full
/// reset of derived fields); mutated only through the edit reducer; destroyed
/// when removed or the document is discarded.
///
/// ## Invariants
/// - Batch-managed and `quantity > 0` ⇒ Σ allocations == quantity, required
///   before submission (not at every intermediate edit).
/// - Retained allocations have a non-empty code and positive quantity;
///   blanks are filtered before submission, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLine {
    /// Opaque stable id for UI diffing. Stripped before persistence.
    #[ts(as = "String")]
    pub id: Uuid,

    /// Catalog item reference.
    pub item_id: Option<String>,

    /// Warehouse/location reference.
    pub warehouse_id: Option<String>,

    /// Item code snapshot (frozen at selection time, for display).
    pub item_code: String,

    /// Item name snapshot (frozen at selection time, for display).
    pub item_name: String,

    /// Transacted quantity (units).
    pub quantity: i64,

    /// Unit price.
    pub unit_price: Money,

    /// Absolute discount per unit, mutually derivable with a percent.
    pub discount_amount: Money,

    /// Per-line freight charge.
    pub freight: Money,

    /// GST vs IGST.
    pub tax_option: TaxOption,

    /// Nominal GST rate.
    pub gst_rate: Percent,

    /// IGST rate override; falls back to `gst_rate` when absent.
    pub igst_rate: Option<Percent>,

    /// Inventory tracking mode from the item master.
    pub managed_by: ManagedBy,

    /// Batch allocations; empty unless `managed_by == Batch`.
    pub batches: Vec<BatchAllocation>,

    /// Derived pricing/tax block, recomputed on every edit.
    pub derived: LineDerived,
}

impl DocumentLine {
    /// Creates an empty line awaiting item selection.
    pub fn new() -> Self {
        DocumentLine {
            id: Uuid::new_v4(),
            item_id: None,
            warehouse_id: None,
            item_code: String::new(),
            item_name: String::new(),
            quantity: 0,
            unit_price: Money::zero(),
            discount_amount: Money::zero(),
            freight: Money::zero(),
            tax_option: TaxOption::Gst,
            gst_rate: Percent::zero(),
            igst_rate: None,
            managed_by: ManagedBy::None,
            batches: Vec::new(),
            derived: LineDerived::default(),
        }
    }

    /// Populates the line from a catalog item answer, resetting every
    /// commercial field and all derived values (full reset on selection).
    pub fn apply_catalog_item(&mut self, detail: &CatalogItemDetail) {
        self.item_id = Some(detail.item_id.clone());
        self.item_code = detail.item_code.clone();
        self.item_name = detail.item_name.clone();
        self.warehouse_id = detail.warehouse_id.clone().or(self.warehouse_id.take());
        self.unit_price = detail.unit_price;
        self.discount_amount = detail.discount;
        self.freight = detail.freight;
        self.tax_option = detail.tax_option;
        self.gst_rate = detail.gst_rate;
        self.igst_rate = detail.igst_rate;
        self.managed_by = detail.managed_by;
        self.quantity = 0;
        self.batches.clear();
        self.derived = LineDerived::default();
    }

    /// Total quantity currently allocated across batch entries.
    pub fn allocated_quantity(&self) -> i64 {
        self.batches.iter().map(|b| b.allocated_quantity).sum()
    }
}

impl Default for DocumentLine {
    fn default() -> Self {
        DocumentLine::new()
    }
}

// =============================================================================
// Catalog Item Detail (collaborator response shape)
// =============================================================================

/// Catalog master answer for a line's selected item.
///
/// Used when `managed_by` is not already present on a UI-selected item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItemDetail {
    pub item_id: String,
    pub item_code: String,
    pub item_name: String,
    pub unit_price: Money,
    pub discount: Money,
    pub freight: Money,
    pub gst_rate: Percent,
    pub igst_rate: Option<Percent>,
    pub tax_option: TaxOption,
    pub managed_by: ManagedBy,
    pub warehouse_id: Option<String>,
}

// =============================================================================
// Price List Entry
// =============================================================================

/// A per-item, per-warehouse sellable price record.
///
/// ## Discount Consistency
/// At most one of `{discount_percent, discount_amount}` is the *independent*
/// variable at any time; the other is always derived from it and
/// `selling_price`. The discount synchronizer owns that relationship; this
/// struct just carries the current values on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct PriceListEntry {
    /// Row id assigned by persistence; `None` until first save.
    pub row_id: Option<String>,

    /// The price list this row belongs to.
    pub price_list_id: String,

    /// The warehouse the price applies at (rows are kept per
    /// (price list, warehouse) pair).
    pub warehouse_id: String,

    pub item_id: String,
    pub item_code: String,
    pub item_name: String,

    pub selling_price: Money,

    /// Unset (`None`) is distinct from an explicit zero.
    pub discount_percent: Option<Percent>,

    /// Unset (`None`) is distinct from an explicit zero.
    pub discount_amount: Option<Money>,

    pub gst_percent: Percent,

    /// Optional validity window; `valid_upto >= valid_from` when both set.
    #[ts(as = "Option<String>")]
    pub valid_from: Option<NaiveDate>,
    #[ts(as = "Option<String>")]
    pub valid_upto: Option<NaiveDate>,
}

// =============================================================================
// Document Header
// =============================================================================

/// Header-level charges folded into the document grand total.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct HeaderCharges {
    /// Document-level freight (distinct from per-line freight).
    pub freight: Money,

    /// Manual rounding adjustment (may be negative).
    pub rounding: Money,

    /// Advance payments already made against this document.
    pub total_down_payment: Money,

    /// Amounts applied from other open documents.
    pub applied_amounts: Money,
}

/// A GRN / Debit Note / Inventory Adjustment document under edit.
///
/// Owns its lines exclusively (1:N, ordered; lines may be reordered or
/// removed freely before submission).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DocumentHeader {
    /// Persistence id; `None` until first save (create vs update).
    pub document_id: Option<String>,

    pub kind: DocumentKind,

    /// Explicit stock direction; selects the batch reconciler mode.
    pub direction: StockDirection,

    pub lines: Vec<DocumentLine>,

    pub charges: HeaderCharges,
}

impl DocumentHeader {
    /// Creates an empty document of the given kind.
    pub fn new(kind: DocumentKind) -> Self {
        DocumentHeader {
            document_id: None,
            kind,
            direction: kind.default_direction(),
            lines: Vec::new(),
            charges: HeaderCharges::default(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_option_default() {
        assert_eq!(TaxOption::default(), TaxOption::Gst);
    }

    #[test]
    fn test_managed_by_is_batch() {
        assert!(ManagedBy::Batch.is_batch());
        assert!(!ManagedBy::None.is_batch());
        assert!(!ManagedBy::Serial.is_batch());
    }

    #[test]
    fn test_document_kind_default_direction() {
        assert_eq!(
            DocumentKind::GoodsReceipt.default_direction(),
            StockDirection::Increase
        );
        assert_eq!(
            DocumentKind::DebitNote.default_direction(),
            StockDirection::Decrease
        );
    }

    #[test]
    fn test_batch_allocation_blank_and_submittable() {
        let blank = BatchAllocation::blank();
        assert!(blank.is_blank());
        assert!(!blank.is_submittable());

        let mut entry = BatchAllocation::blank();
        entry.batch_code = "B1".to_string();
        assert!(!entry.is_blank());
        assert!(!entry.is_submittable()); // quantity still zero

        entry.allocated_quantity = 5;
        assert!(entry.is_submittable());

        // Whitespace-only codes are still blank
        let mut ws = BatchAllocation::blank();
        ws.batch_code = "   ".to_string();
        ws.allocated_quantity = 5;
        assert!(!ws.is_submittable());
    }

    #[test]
    fn test_apply_catalog_item_resets_line() {
        let mut line = DocumentLine::new();
        line.quantity = 7;
        line.batches.push(BatchAllocation {
            batch_code: "OLD".to_string(),
            allocated_quantity: 7,
            expiry_date: None,
            manufacturer: None,
            unit_price: None,
        });

        let detail = CatalogItemDetail {
            item_id: "ITM-1".to_string(),
            item_code: "SKU-1".to_string(),
            item_name: "Widget".to_string(),
            unit_price: Money::from_paise(10000),
            discount: Money::zero(),
            freight: Money::zero(),
            gst_rate: Percent::from_bps(1800),
            igst_rate: None,
            tax_option: TaxOption::Gst,
            managed_by: ManagedBy::Batch,
            warehouse_id: Some("WH-1".to_string()),
        };

        line.apply_catalog_item(&detail);

        assert_eq!(line.item_id.as_deref(), Some("ITM-1"));
        assert_eq!(line.quantity, 0);
        assert!(line.batches.is_empty());
        assert_eq!(line.derived, LineDerived::default());
        assert_eq!(line.managed_by, ManagedBy::Batch);
    }

    #[test]
    fn test_ts_bindings_map_ids_and_dates_to_strings() {
        // Uuid and NaiveDate cross the IPC boundary as plain strings
        let line_decl = <DocumentLine as ts_rs::TS>::decl();
        assert!(line_decl.contains("id: string"), "{}", line_decl);

        let batch_decl = <BatchAllocation as ts_rs::TS>::decl();
        assert!(
            batch_decl.contains("expiryDate: string | null"),
            "{}",
            batch_decl
        );

        let entry_decl = <PriceListEntry as ts_rs::TS>::decl();
        assert!(
            entry_decl.contains("validFrom: string | null"),
            "{}",
            entry_decl
        );
    }

    #[test]
    fn test_allocated_quantity_sums_entries() {
        let mut line = DocumentLine::new();
        for (code, qty) in [("B1", 30), ("B2", 20)] {
            line.batches.push(BatchAllocation {
                batch_code: code.to_string(),
                allocated_quantity: qty,
                expiry_date: None,
                manufacturer: None,
                unit_price: None,
            });
        }
        assert_eq!(line.allocated_quantity(), 50);
    }
}
