//! # Error Types
//!
//! Domain-specific error types for meridian-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  meridian-core errors (this file)                                      │
//! │  ├── CoreError        - General domain errors                          │
//! │  └── ValidationError  - Submission-checkpoint failures                 │
//! │                                                                         │
//! │  meridian-bridge errors (separate crate)                               │
//! │  └── BridgeError      - Collaborator (lookup/persistence) failures     │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → BridgeError → UI surface          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (line number, quantities, fields)
//! 3. Errors are enum variants, never String
//! 4. Coercible bad input is NOT an error - raw negatives/garbage coerce to
//!    zero or unset before computation; only checkpoint validation errors

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core settlement-engine errors.
///
/// These represent business rule violations detected at well-defined
/// checkpoints (submission, allocation-editor confirm). They should be caught
/// and translated to user-facing messages by the UI adapters.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A line references an index that does not exist.
    #[error("Line index {0} out of range")]
    LineIndexOutOfRange(usize),

    /// A batch entry references an index that does not exist.
    #[error("Batch entry index {0} out of range")]
    BatchIndexOutOfRange(usize),

    /// Increase-mode append guard: the previous blank entry is untouched.
    ///
    /// ## When This Occurs
    /// The user clicks "add batch row" while the most recently added row
    /// still has no code and zero quantity. Refusing prevents silently
    /// accumulating unusable rows.
    #[error("Previous batch entry is still empty; fill it in before adding another")]
    BlankBatchEntryPending,

    /// Allocation-mode candidate constraint violated.
    #[error("Batch {batch_code}: cannot allocate {requested}, only {available} available")]
    AllocationExceedsAvailable {
        batch_code: String,
        available: i64,
        requested: i64,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Submission-checkpoint validation failures.
///
/// Detected only at submission or on an explicit allocation-editor "done",
/// never on every keystroke - in-progress edits are allowed to be
/// transiently inconsistent.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("Line {line}: {field} is required")]
    LineFieldRequired { line: usize, field: &'static str },

    /// Quantity or price must be positive at submission.
    #[error("Line {line}: {field} must be positive")]
    LineMustBePositive { line: usize, field: &'static str },

    /// Quantity exceeds the per-line ceiling.
    #[error("Line {line}: quantity cannot exceed {max}")]
    LineQuantityTooLarge { line: usize, max: i64 },

    /// The discount drove the derived price below zero.
    ///
    /// The line computer does NOT clamp this during editing; it is surfaced
    /// here so the user sees why the line cannot be submitted.
    #[error("Line {line}: discount exceeds unit price (net price is negative)")]
    NegativeNetPrice { line: usize },

    /// Discount percent exceeds the configured maximum.
    #[error("Discount {got_bps} bps exceeds maximum {max_bps} bps")]
    DiscountTooLarge { got_bps: u32, max_bps: u32 },

    /// Tax rate outside the accepted range.
    #[error("Tax rate {got_bps} bps exceeds maximum {max_bps} bps")]
    TaxRateOutOfRange { got_bps: u32, max_bps: u32 },

    /// Batch-managed line with quantity but no allocations.
    #[error("Line {line}: item is batch-managed but no batches are allocated")]
    BatchesMissing { line: usize },

    /// The allocation total must equal the line quantity exactly.
    ///
    /// Under- and over-allocation are both invalid (strict equality).
    #[error("Line {line}: allocated batch quantity {allocated} does not match line quantity {required}")]
    BatchTotalMismatch {
        line: usize,
        allocated: i64,
        required: i64,
    },

    /// A retained batch entry has an empty code or non-positive quantity.
    #[error("Line {line}: batch entry {entry} has an empty code or non-positive quantity")]
    InvalidBatchEntry { line: usize, entry: usize },

    /// `valid_upto` precedes `valid_from` on a price-list row.
    #[error("validUpto {upto} is before validFrom {from}")]
    InvalidValidityRange { from: String, upto: String },

    /// Resulting final price is not positive on a price-list row.
    #[error("Final price after discount must be greater than zero")]
    FinalPriceNotPositive,

    /// The document has no lines to submit.
    #[error("Document has no lines")]
    NoLines,

    /// Document exceeds the configured maximum line count.
    #[error("Document cannot have more than {max} lines")]
    TooManyLines { max: usize },
}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================
