//! # Catalog Collaborator
//!
//! The item-master seam. When a line's selected item arrives from the UI
//! without its tracking mode (or at all), the engine asks the catalog for
//! the full item answer and applies it through the edit reducer - never by
//! poking fields directly.
//!
//! ## Selection Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  User picks item "SKU-1" on line 3                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CatalogLookup::item_detail("ITM-1")  ──(await)──►  CatalogItemDetail  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  apply_edit(SelectItem { index: 3, detail })                           │
//! │       ├── full line reset: qty 0, batches cleared, derived recomputed  │
//! │       └── in-flight batch fetches for the old item superseded          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use tracing::debug;

use meridian_core::{apply_edit, CatalogItemDetail, DocumentState, LineEdit};

use crate::error::BridgeResult;
use crate::stock::StockFetchCoordinator;

/// Item-master collaborator.
///
/// Implemented by the host application (database, HTTP client, test stub).
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Full catalog answer for one item.
    async fn item_detail(&self, item_id: &str) -> BridgeResult<CatalogItemDetail>;
}

/// Selects a catalog item into a line: fetches the item answer and applies
/// it through the reducer so the full-reset semantics cannot be bypassed.
///
/// Any batch fetch still in flight for the line was started against the
/// previous item, so its token is invalidated once the edit applies.
pub async fn select_catalog_item(
    state: &mut DocumentState,
    index: usize,
    item_id: &str,
    catalog: &dyn CatalogLookup,
    coordinator: &StockFetchCoordinator,
) -> BridgeResult<()> {
    debug!(index, item_id, "Selecting catalog item into line");

    let detail = catalog.item_detail(item_id).await?;
    apply_edit(state, LineEdit::SelectItem { index, detail })?;

    if let Some(line) = state.header.lines.get(index) {
        coordinator.invalidate(line.id).await;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use meridian_core::money::{Money, Percent};
    use meridian_core::{DocumentKind, ManagedBy, TaxOption};

    use crate::error::BridgeError;

    struct StubCatalog;

    #[async_trait]
    impl CatalogLookup for StubCatalog {
        async fn item_detail(&self, item_id: &str) -> BridgeResult<CatalogItemDetail> {
            if item_id != "ITM-1" {
                return Err(BridgeError::collaborator("catalog lookup", "not found"));
            }
            Ok(CatalogItemDetail {
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
            })
        }
    }

    #[tokio::test]
    async fn test_select_applies_catalog_answer_through_reducer() {
        let mut state = DocumentState::new(DocumentKind::GoodsReceipt);
        apply_edit(&mut state, LineEdit::AddLine).unwrap();

        select_catalog_item(&mut state, 0, "ITM-1", &StubCatalog, &StockFetchCoordinator::new())
            .await
            .unwrap();

        let line = &state.header.lines[0];
        assert_eq!(line.item_code, "SKU-1");
        assert_eq!(line.managed_by, ManagedBy::Batch);
        assert_eq!(line.quantity, 0); // selection resets the line
    }

    #[tokio::test]
    async fn test_lookup_failure_leaves_line_untouched() {
        let mut state = DocumentState::new(DocumentKind::GoodsReceipt);
        apply_edit(&mut state, LineEdit::AddLine).unwrap();
        let before = state.clone();

        let err =
            select_catalog_item(&mut state, 0, "MISSING", &StubCatalog, &StockFetchCoordinator::new())
                .await;
        assert!(matches!(err, Err(BridgeError::Collaborator { .. })));
        assert_eq!(state, before);
    }

    #[tokio::test]
    async fn test_reselection_supersedes_in_flight_batch_fetch() {
        let mut state = DocumentState::new(DocumentKind::GoodsReceipt);
        apply_edit(&mut state, LineEdit::AddLine).unwrap();

        let coordinator = StockFetchCoordinator::new();
        let token = coordinator.begin(state.header.lines[0].id).await;

        select_catalog_item(&mut state, 0, "ITM-1", &StubCatalog, &coordinator)
            .await
            .unwrap();

        // A batch answer for the old item must not land on the new one
        assert!(!coordinator.is_current(token).await);
    }
}
