//! # meridian-bridge: Collaborator Boundary for Meridian ERP
//!
//! The async seam between the pure settlement engine (`meridian-core`) and
//! the host application's collaborators. This crate defines the traits the
//! host implements and the orchestration that keeps engine semantics intact
//! across awaits (full reset on selection, stale-fetch discard, blank-row
//! filtering before persistence).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Meridian Bridge Architecture                          │
//! │                                                                         │
//! │  Document-entry surfaces                                               │
//! │       │ edits                                                           │
//! │       ▼                                                                 │
//! │  meridian-core ◄──────────── pure, synchronous, no I/O                 │
//! │       ▲                                                                 │
//! │       │ reducer edits only                                              │
//! │  ┌────┴────────────────────────────────────────────────────────────┐   │
//! │  │                meridian-bridge (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   catalog.rs   CatalogLookup + select_catalog_item             │   │
//! │  │   stock.rs     BatchStockSource + StockFetchCoordinator        │   │
//! │  │   persist.rs   DocumentStore/PriceListStore + payload assembly │   │
//! │  │   error.rs     BridgeError                                     │   │
//! │  └────┬────────────────────────────────────────────────────────────┘   │
//! │       │ async trait calls                                              │
//! │       ▼                                                                 │
//! │  Host collaborators (database, HTTP services, test stubs)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Traits at the seam**: every collaborator is a trait; this crate
//!    never opens a connection itself
//! 2. **Engine stays authoritative**: collaborator answers are applied
//!    through the core reducer, never by mutating lines directly
//! 3. **Awaits are suspect**: anything fetched across an await is checked
//!    for staleness before it touches state

// =============================================================================
// Module Declarations
// =============================================================================

pub mod catalog;
pub mod error;
pub mod persist;
pub mod stock;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use catalog::{select_catalog_item, CatalogLookup};
pub use error::{BridgeError, BridgeResult};
pub use persist::{
    build_document_payload, submit_document, submit_price_list, DocumentPayload, DocumentStore,
    PayloadLine, PriceListStore,
};
pub use stock::{
    fetch_available_batches, remove_line, set_line_warehouse, BatchStockSource, FetchToken,
    StockFetchCoordinator,
};
