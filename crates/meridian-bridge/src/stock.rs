//! # Inventory Collaborator & Stale-Fetch Guard
//!
//! Decrease-mode lines need the on-hand batches for their (item, warehouse)
//! pair. Those fetches are async, and the user can re-select the item or
//! warehouse while one is in flight - the late answer must be discarded,
//! never applied to the line it no longer describes.
//!
//! ## Token Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Stale-Fetch Guard                                    │
//! │                                                                         │
//! │  line L: user picks (item A, WH-1)                                     │
//! │     begin(L)            ──► token { L, seq: 1 }                        │
//! │     fetch A/WH-1 ...........(in flight)...........                     │
//! │                                                                         │
//! │  line L: user re-picks (item B, WH-1)   ◄── before the answer lands    │
//! │     begin(L)            ──► token { L, seq: 2 }                        │
//! │     fetch B/WH-1 ...........(in flight)...........                     │
//! │                                                                         │
//! │  answer for A arrives:  is_current({L, 1})? seq is 2 → DISCARD         │
//! │  answer for B arrives:  is_current({L, 2})? seq is 2 → APPLY           │
//! │                                                                         │
//! │  Sequence numbers only ever increase; a token can go stale but         │
//! │  never become current again.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

use meridian_core::{apply_edit, AvailableBatch, DocumentLine, DocumentState, LineEdit};

use crate::error::{BridgeError, BridgeResult};

// =============================================================================
// Batch Stock Source
// =============================================================================

/// Inventory collaborator answering on-hand batch queries.
#[async_trait]
pub trait BatchStockSource: Send + Sync {
    /// On-hand batches for an (item, warehouse) pair, for allocation mode.
    async fn available_batches(
        &self,
        item_id: &str,
        warehouse_id: &str,
    ) -> BridgeResult<Vec<AvailableBatch>>;
}

// =============================================================================
// Fetch Coordinator
// =============================================================================

/// Proof that a fetch was the latest one started for its line when it began.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchToken {
    line_id: Uuid,
    seq: u64,
}

/// Per-line monotonic sequence registry for in-flight stock fetches.
///
/// `Send + Sync`; the host shares it the same way it shares its document
/// state (typically inside an `Arc`).
#[derive(Debug, Default)]
pub struct StockFetchCoordinator {
    sequences: Mutex<HashMap<Uuid, u64>>,
}

impl StockFetchCoordinator {
    pub fn new() -> Self {
        StockFetchCoordinator::default()
    }

    /// Starts a fetch for a line, superseding any in-flight one.
    pub async fn begin(&self, line_id: Uuid) -> FetchToken {
        let mut sequences = self.sequences.lock().await;
        let seq = sequences.entry(line_id).or_insert(0);
        *seq += 1;
        FetchToken { line_id, seq: *seq }
    }

    /// Whether a token still represents the latest fetch for its line.
    pub async fn is_current(&self, token: FetchToken) -> bool {
        let sequences = self.sequences.lock().await;
        sequences.get(&token.line_id) == Some(&token.seq)
    }

    /// Invalidates any in-flight fetch for a line without starting a new one
    /// (quantity edit, warehouse cleared).
    pub async fn invalidate(&self, line_id: Uuid) {
        let mut sequences = self.sequences.lock().await;
        if let Some(seq) = sequences.get_mut(&line_id) {
            *seq += 1;
        }
    }

    /// Drops a removed line's registry entry. Outstanding tokens for it can
    /// never match again.
    pub async fn forget(&self, line_id: Uuid) {
        let mut sequences = self.sequences.lock().await;
        sequences.remove(&line_id);
    }
}

// =============================================================================
// Guarded Fetch
// =============================================================================

/// Fetches the on-hand batches for a line under the stale-fetch guard.
///
/// Returns `Ok(None)` when the answer arrived stale (a newer fetch was
/// started for the line meanwhile) - the caller must simply drop it.
pub async fn fetch_available_batches(
    coordinator: &StockFetchCoordinator,
    source: &dyn BatchStockSource,
    line: &DocumentLine,
) -> BridgeResult<Option<Vec<AvailableBatch>>> {
    let item_id = line
        .item_id
        .as_deref()
        .ok_or_else(|| BridgeError::collaborator("stock fetch", "line has no item selected"))?;
    let warehouse_id = line
        .warehouse_id
        .as_deref()
        .ok_or_else(|| BridgeError::collaborator("stock fetch", "line has no warehouse selected"))?;

    let token = coordinator.begin(line.id).await;
    debug!(line = %line.id, item_id, warehouse_id, "Fetching available batches");

    let batches = source.available_batches(item_id, warehouse_id).await?;

    if coordinator.is_current(token).await {
        Ok(Some(batches))
    } else {
        debug!(line = %line.id, "Discarding stale batch answer");
        Ok(None)
    }
}

// =============================================================================
// Fetch-Superseding Edits
// =============================================================================

/// Changes a line's warehouse through the reducer and invalidates any batch
/// fetch still in flight against the old one.
pub async fn set_line_warehouse(
    state: &mut DocumentState,
    index: usize,
    warehouse_id: Option<String>,
    coordinator: &StockFetchCoordinator,
) -> BridgeResult<()> {
    apply_edit(state, LineEdit::SetWarehouse { index, warehouse_id })?;

    if let Some(line) = state.header.lines.get(index) {
        coordinator.invalidate(line.id).await;
    }

    Ok(())
}

/// Removes a line and drops its fetch registry entry; outstanding answers
/// for the removed line can never match again.
pub async fn remove_line(
    state: &mut DocumentState,
    index: usize,
    coordinator: &StockFetchCoordinator,
) -> BridgeResult<()> {
    let line_id = state.header.lines.get(index).map(|line| line.id);
    apply_edit(state, LineEdit::RemoveLine { index })?;

    if let Some(line_id) = line_id {
        coordinator.forget(line_id).await;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
