//! # Batch Reconciler
//!
//! Owns the invariant "allocated batch quantity total == line quantity" for
//! batch-managed lines, across two operating modes.
//!
//! ## Operating Modes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Batch Reconciler Modes                              │
//! │                                                                         │
//! │  CREATION (stock increase - GRN receipt, adjustment-in)                │
//! │  ──────────────────────────────────────────────────────                │
//! │  Allocations start empty. The user appends blank rows one at a time    │
//! │  and types in code/qty/expiry/manufacturer.                            │
//! │                                                                         │
//! │  GUARD: a new blank row is refused while the most recent row is        │
//! │  still blank (no code AND zero qty) - no piling up unusable rows.      │
//! │                                                                         │
//! │  ALLOCATION (stock decrease - debit note, consumption)                 │
//! │  ──────────────────────────────────────────────────────                │
//! │  Seeded with the available on-hand batches for (item, warehouse).      │
//! │  The user assigns a quantity per candidate, clamped to                 │
//! │  0 ≤ allocated ≤ available. Confirming replaces the line's             │
//! │  batches wholesale; the candidate's historical unit price rides        │
//! │  along as the cost snapshot.                                           │
//! │                                                                         │
//! │  BOTH MODES: validation runs at submission (or explicit editor         │
//! │  "done"), never per keystroke. Quantity edits on the line clear ALL    │
//! │  allocations - a stale total must never survive invisibly.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult, ValidationError, ValidationResult};
use crate::types::{AvailableBatch, BatchAllocation, DocumentLine, StockDirection};

// =============================================================================
// Creation-Mode Editor
// =============================================================================

/// Increase-mode batch entry: the user declares newly received batches.
///
/// Operates on an owned `Vec<BatchAllocation>`; the caller moves the result
/// back onto the line when the editor closes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BatchEntryEditor {
    entries: Vec<BatchAllocation>,
}

impl BatchEntryEditor {
    /// Starts an editor over the line's current entries.
    pub fn new(entries: Vec<BatchAllocation>) -> Self {
        BatchEntryEditor { entries }
    }

    #[inline]
    pub fn entries(&self) -> &[BatchAllocation] {
        &self.entries
    }

    /// Appends a fresh blank row.
    ///
    /// Refused while the most recently added row is still blank, preventing
    /// silently accumulating unusable rows.
    pub fn push_blank(&mut self) -> CoreResult<()> {
        if let Some(last) = self.entries.last() {
            if last.is_blank() {
                return Err(CoreError::BlankBatchEntryPending);
            }
        }
        self.entries.push(BatchAllocation::blank());
        Ok(())
    }

    /// Targeted update of one row's batch code.
    pub fn set_code(&mut self, index: usize, code: impl Into<String>) -> CoreResult<()> {
        self.entry_mut(index)?.batch_code = code.into();
        Ok(())
    }

    /// Targeted update of one row's quantity. Negative input coerces to 0.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        self.entry_mut(index)?.allocated_quantity = quantity.max(0);
        Ok(())
    }

    /// Targeted update of one row's expiry date.
    pub fn set_expiry(&mut self, index: usize, expiry: Option<chrono::NaiveDate>) -> CoreResult<()> {
        self.entry_mut(index)?.expiry_date = expiry;
        Ok(())
    }

    /// Targeted update of one row's manufacturer.
    pub fn set_manufacturer(
        &mut self,
        index: usize,
        manufacturer: Option<String>,
    ) -> CoreResult<()> {
        self.entry_mut(index)?.manufacturer = manufacturer;
        Ok(())
    }

    /// Deletes one row by index.
    pub fn remove(&mut self, index: usize) -> CoreResult<()> {
        if index >= self.entries.len() {
            return Err(CoreError::BatchIndexOutOfRange(index));
        }
        self.entries.remove(index);
        Ok(())
    }

    /// Total quantity across all rows (blank rows contribute zero).
    pub fn allocated_total(&self) -> i64 {
        self.entries.iter().map(|e| e.allocated_quantity).sum()
    }

    /// Finishes editing, returning the entries for the line to own.
    pub fn into_entries(self) -> Vec<BatchAllocation> {
        self.entries
    }

    fn entry_mut(&mut self, index: usize) -> CoreResult<&mut BatchAllocation> {
        self.entries
            .get_mut(index)
            .ok_or(CoreError::BatchIndexOutOfRange(index))
    }
}

// =============================================================================
// Allocation-Mode Editor
// =============================================================================

/// One candidate row in the allocation editor: an available batch plus the
/// quantity assigned to it so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AllocationCandidate {
    pub batch: AvailableBatch,
    pub allocated_quantity: i64,
}

/// Decrease-mode batch allocation: the user draws from existing stock.
///
/// Seeded with the external inventory collaborator's candidate list and the
/// allocations already chosen for the line; [`confirm`](Self::confirm)
/// replaces the line's batches wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct AllocationEditor {
    candidates: Vec<AllocationCandidate>,
}

impl AllocationEditor {
    /// Seeds the editor, carrying over any prior allocation that still
    /// matches a candidate batch code (clamped to what is now available).
    pub fn new(available: Vec<AvailableBatch>, existing: &[BatchAllocation]) -> Self {
        let candidates = available
            .into_iter()
            .map(|batch| {
                let prior = existing
                    .iter()
                    .find(|a| a.batch_code == batch.batch_code)
                    .map(|a| a.allocated_quantity.clamp(0, batch.available_quantity))
                    .unwrap_or(0);
                AllocationCandidate {
                    allocated_quantity: prior,
                    batch,
                }
            })
            .collect();
        AllocationEditor { candidates }
    }

    #[inline]
    pub fn candidates(&self) -> &[AllocationCandidate] {
        &self.candidates
    }

    /// Assigns a quantity to one candidate, constrained per batch to
    /// `0 ≤ allocated ≤ available`.
    pub fn allocate(&mut self, index: usize, quantity: i64) -> CoreResult<()> {
        let candidate = self
            .candidates
            .get_mut(index)
            .ok_or(CoreError::BatchIndexOutOfRange(index))?;
        if quantity < 0 {
            candidate.allocated_quantity = 0;
            return Ok(());
        }
        if quantity > candidate.batch.available_quantity {
            return Err(CoreError::AllocationExceedsAvailable {
                batch_code: candidate.batch.batch_code.clone(),
                available: candidate.batch.available_quantity,
                requested: quantity,
            });
        }
        candidate.allocated_quantity = quantity;
        Ok(())
    }

    /// Total quantity assigned across candidates.
    pub fn allocated_total(&self) -> i64 {
        self.candidates.iter().map(|c| c.allocated_quantity).sum()
    }

    /// Confirms the selection, producing the allocations that replace the
    /// line's `batches` wholesale. Candidates with zero assignment are
    /// dropped; each kept entry snapshots the source batch's historical
    /// unit price as the line's cost basis.
    pub fn confirm(self) -> Vec<BatchAllocation> {
        self.candidates
            .into_iter()
            .filter(|c| c.allocated_quantity > 0)
            .map(|c| BatchAllocation {
                batch_code: c.batch.batch_code,
                allocated_quantity: c.allocated_quantity,
                expiry_date: c.batch.expiry_date,
                manufacturer: c.batch.manufacturer,
                unit_price: Some(c.batch.unit_price),
            })
            .collect()
    }
}

// =============================================================================
// Reconciliation Operations
// =============================================================================

/// Clears a line's allocations entirely.
///
/// Invoked whenever the line's `quantity` field itself is edited: a
/// previously-valid allocation must never silently become invalid (total no
/// longer matching) without visible indication, so the user is forced to
/// re-allocate.
pub fn reset_allocations(line: &mut DocumentLine) {
    line.batches.clear();
}

/// Drops unsubmittable entries (empty code or non-positive quantity) from a
/// line before submission. Such entries are filtered, never persisted.
pub fn filter_unsubmittable(line: &mut DocumentLine) {
    line.batches.retain(|b| b.is_submittable());
}

/// Submission-checkpoint validation of one line's batch state: every
/// retained entry must be submittable, and the allocation total must equal
/// the line quantity. `line_no` is the 1-based position used in errors.
///
/// Applied to BOTH stock directions: the increase path enforces the same
/// sum-equals-quantity rule the decrease path relies on.
pub fn validate_line_batches(line: &DocumentLine, line_no: usize) -> ValidationResult<()> {
    if !line.managed_by.is_batch() || line.quantity <= 0 {
        return Ok(());
    }

    if line.batches.is_empty() {
        return Err(ValidationError::BatchesMissing { line: line_no });
    }

    // Invalid retained entries first: they are their own error, and the sum
    // check below must only ever see submittable entries
    if let Some(bad) = line.batches.iter().position(|b| !b.is_submittable()) {
        return Err(ValidationError::InvalidBatchEntry {
            line: line_no,
            entry: bad,
        });
    }

    // Strict equality; under- and over-allocation are both invalid
    let allocated = line.allocated_quantity();
    if allocated != line.quantity {
        return Err(ValidationError::BatchTotalMismatch {
            line: line_no,
            allocated,
            required: line.quantity,
        });
    }

    Ok(())
}

/// Which editor a UI surface should open for a line, by stock direction.
///
/// Kept here so the mode choice lives next to the editors instead of being
/// re-derived (differently) by each of the four document screens.
pub fn editor_mode(direction: StockDirection) -> EditorMode {
    match direction {
        StockDirection::Increase => EditorMode::Creation,
        StockDirection::Decrease => EditorMode::Allocation,
    }
}

/// The reconciler mode selected by a document's transaction direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum EditorMode {
    Creation,
    Allocation,
}

// =============================================================================
// Unit Tests
// =============================================================================
