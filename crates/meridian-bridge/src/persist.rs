//! # Persistence Collaborator & Payload Assembly
//!
//! Turns an in-edit [`DocumentState`] into the wire payload the document
//! store accepts, and routes it to create-vs-update based on whether the
//! document already has a persistence id.
//!
//! ## Submission Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Document Submission                                │
//! │                                                                         │
//! │  DocumentState                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_document()      ── first failure aborts, nothing sent        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  build_document_payload()                                              │
//! │       ├── drop blank/unsubmittable batch rows (never persisted)        │
//! │       └── strip UI-only line UUIDs (persistence never sees them)       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  document_id present?                                                  │
//! │       ├── None  → DocumentStore::create  → new id                      │
//! │       └── Some  → DocumentStore::update                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use meridian_core::batch::filter_unsubmittable;
use meridian_core::money::{Money, Percent};
use meridian_core::validation::{validate_document, validate_price_list_entry};
use meridian_core::{
    BatchAllocation, DocumentKind, DocumentState, DocumentSummary, HeaderCharges, PriceListEntry,
    StockDirection, TaxOption,
};

use crate::error::BridgeResult;

// =============================================================================
// Wire Payload
// =============================================================================

/// One submitted line as persistence sees it: business references only, no
/// UI identity, blank batch rows already filtered out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadLine {
    pub item_id: String,
    pub warehouse_id: Option<String>,
    pub item_code: String,
    pub quantity: i64,
    pub unit_price: Money,
    pub discount_amount: Money,
    pub freight: Money,
    pub tax_option: TaxOption,
    pub gst_rate: Percent,
    pub igst_rate: Option<Percent>,
    pub cgst_amount: Money,
    pub sgst_amount: Money,
    pub igst_amount: Money,
    pub line_total: Money,
    pub batches: Vec<BatchAllocation>,
}

/// A validated, persistence-ready document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPayload {
    pub document_id: Option<String>,
    pub kind: DocumentKind,
    pub direction: StockDirection,
    pub lines: Vec<PayloadLine>,
    pub charges: HeaderCharges,
    pub summary: DocumentSummary,
}

/// Validates the document and assembles its wire payload.
///
/// Unsubmittable batch rows (blank code or zero quantity) are filtered out
/// FIRST - they are leftovers of editing, not errors. The full submission
/// checkpoint then runs on the cleaned document; one that fails validation
/// never produces a payload.
pub fn build_document_payload(state: &DocumentState) -> BridgeResult<DocumentPayload> {
    let mut header = state.header.clone();
    for line in &mut header.lines {
        filter_unsubmittable(line);
    }
    validate_document(&header)?;

    let lines = header
        .lines
        .iter()
        .map(|line| PayloadLine {
            // Validation guarantees the item reference is present
            item_id: line.item_id.clone().unwrap_or_default(),
            warehouse_id: line.warehouse_id.clone(),
            item_code: line.item_code.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            discount_amount: line.discount_amount,
            freight: line.freight,
            tax_option: line.tax_option,
            gst_rate: line.gst_rate,
            igst_rate: line.igst_rate,
            cgst_amount: line.derived.cgst_amount,
            sgst_amount: line.derived.sgst_amount,
            igst_amount: line.derived.igst_amount,
            line_total: line.derived.line_total,
            batches: line.batches.clone(),
        })
        .collect();

    Ok(DocumentPayload {
        document_id: header.document_id,
        kind: header.kind,
        direction: header.direction,
        lines,
        charges: header.charges,
        summary: state.summary,
    })
}

// =============================================================================
// Store Traits
// =============================================================================

/// Document persistence collaborator.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Persists a new document; returns the assigned id.
    async fn create(&self, payload: &DocumentPayload) -> BridgeResult<String>;

    /// Replaces an existing document.
    async fn update(&self, document_id: &str, payload: &DocumentPayload) -> BridgeResult<()>;
}

/// Price-list persistence collaborator.
#[async_trait]
pub trait PriceListStore: Send + Sync {
    /// Persists the rows (insert or update by `row_id`); returns the
    /// assigned row ids in order.
    async fn save_rows(&self, rows: &[PriceListEntry]) -> BridgeResult<Vec<String>>;

    /// Deletes one persisted row.
    async fn delete_row(&self, row_id: &str) -> BridgeResult<()>;
}

// =============================================================================
// Submission
// =============================================================================

/// Validates, assembles, and persists a document.
///
/// On success the state carries the persistence id, so a second submit
/// becomes an update.
pub async fn submit_document(
    state: &mut DocumentState,
    store: &dyn DocumentStore,
) -> BridgeResult<String> {
    let payload = build_document_payload(state)?;

    let id = match payload.document_id.clone() {
        None => {
            let id = store.create(&payload).await?;
            info!(document_id = %id, lines = payload.lines.len(), "Document created");
            state.header.document_id = Some(id.clone());
            id
        }
        Some(id) => {
            store.update(&id, &payload).await?;
            info!(document_id = %id, lines = payload.lines.len(), "Document updated");
            id
        }
    };

    Ok(id)
}

/// Validates and persists price-list rows, writing the assigned ids back.
pub async fn submit_price_list(
    rows: &mut [PriceListEntry],
    store: &dyn PriceListStore,
) -> BridgeResult<()> {
    for (index, row) in rows.iter().enumerate() {
        validate_price_list_entry(row, index + 1)?;
    }

    let ids = store.save_rows(rows).await?;
    for (row, id) in rows.iter_mut().zip(ids) {
        row.row_id = Some(id);
    }

    info!(rows = rows.len(), "Price list saved");
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
