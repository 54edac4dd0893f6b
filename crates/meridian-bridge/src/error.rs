//! # Bridge Error Types
//!
//! Errors at the collaborator boundary.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Bridge Error Categories                            │
//! │                                                                         │
//! │  ┌───────────────────┐  ┌──────────────────┐  ┌─────────────────────┐  │
//! │  │   Collaborator    │  │    Validation    │  │       Core          │  │
//! │  │                   │  │                  │  │                     │  │
//! │  │  a lookup/store   │  │  submission rule │  │  stale index,       │  │
//! │  │  call failed;     │  │  failed before   │  │  allocation guard   │  │
//! │  │  operation named  │  │  payload build   │  │  (wrapped)          │  │
//! │  └───────────────────┘  └──────────────────┘  └─────────────────────┘  │
//! │                                                                         │
//! │  Collaborator failures carry the operation name and the collaborator's │
//! │  message verbatim - the host decides retry vs surface-to-user.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use meridian_core::{CoreError, ValidationError};
use thiserror::Error;

/// Result type alias for bridge operations.
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors crossing the collaborator boundary.
///
/// All variants are `Send + Sync` for async compatibility.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A collaborator call (lookup, fetch, store) reported failure.
    #[error("{operation} failed: {message}")]
    Collaborator { operation: String, message: String },

    /// Submission validation failed before any collaborator was called.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A core-engine error surfaced through the bridge.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl BridgeError {
    /// Shorthand for a named collaborator failure.
    pub fn collaborator(operation: &str, message: impl Into<String>) -> Self {
        BridgeError::Collaborator {
            operation: operation.to_string(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
