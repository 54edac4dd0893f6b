//! # Discount Synchronizer
//!
//! Bidirectional percent ↔ amount derivation for a priced entity (price-list
//! row). Shares the engine's rounding rules but is independent of the line
//! computer.
//!
//! ## The Feedback-Loop Problem
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Naive two-way binding:                                                 │
//! │                                                                         │
//! │    user sets percent → derive amount → amount change → derive percent  │
//! │         ▲                                                   │           │
//! │         └───────────────── drift! ◄─────────────────────────┘           │
//! │                                                                         │
//! │  Our rule: track WHICH side the user last set explicitly.              │
//! │  A selling-price change re-derives only the DEPENDENT side from the    │
//! │  independent one - the independent side is never touched.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Unset vs Zero
//! "No discount entered" (`None`) is distinct from an explicit 0. Deriving
//! from a zero price or zero discount degrades the dependent side to unset,
//! never to a spurious 0.00.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::{Money, Percent};

// =============================================================================
// Discount Source
// =============================================================================

/// Which discount field the user last set explicitly (the independent
/// variable). The other field is always derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DiscountSource {
    /// No discount entered yet.
    None,
    /// The percent is authoritative; the amount is derived.
    Percent,
    /// The amount is authoritative; the percent is derived.
    Amount,
}

impl Default for DiscountSource {
    fn default() -> Self {
        DiscountSource::None
    }
}

// =============================================================================
// Discount Synchronizer
// =============================================================================

/// The `{selling_price, discount_percent, discount_amount}` state of one
/// priced row, with mutually exclusive entry points per edit.
///
/// ## Usage
/// ```rust
/// use meridian_core::discount::DiscountSync;
/// use meridian_core::money::{Money, Percent};
///
/// let mut sync = DiscountSync::new(Money::from_paise(25000)); // ₹250.00
/// sync.set_amount(Some(Money::from_paise(2500)));             // ₹25.00
///
/// // Amount set first → percent derived: 10.00%
/// assert_eq!(sync.discount_percent(), Some(Percent::from_bps(1000)));
/// assert_eq!(sync.final_price().paise(), 22500);              // ₹225.00
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct DiscountSync {
    selling_price: Money,
    discount_percent: Option<Percent>,
    discount_amount: Option<Money>,
    source: DiscountSource,
}

impl DiscountSync {
    /// Creates a synchronizer with no discount entered.
    pub fn new(selling_price: Money) -> Self {
        DiscountSync {
            selling_price: selling_price.coerce_non_negative(),
            discount_percent: None,
            discount_amount: None,
            source: DiscountSource::None,
        }
    }

    /// Restores a synchronizer from persisted row values.
    ///
    /// A persisted amount wins as the independent side when both fields are
    /// somehow present (transitional inconsistent rows); a lone percent makes
    /// the percent independent.
    pub fn from_row(
        selling_price: Money,
        discount_percent: Option<Percent>,
        discount_amount: Option<Money>,
    ) -> Self {
        let source = if discount_amount.is_some() {
            DiscountSource::Amount
        } else if discount_percent.is_some() {
            DiscountSource::Percent
        } else {
            DiscountSource::None
        };
        let mut sync = DiscountSync {
            selling_price: selling_price.coerce_non_negative(),
            discount_percent,
            discount_amount,
            source,
        };
        sync.rederive();
        sync
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    #[inline]
    pub fn selling_price(&self) -> Money {
        self.selling_price
    }

    #[inline]
    pub fn discount_percent(&self) -> Option<Percent> {
        self.discount_percent
    }

    #[inline]
    pub fn discount_amount(&self) -> Option<Money> {
        self.discount_amount
    }

    #[inline]
    pub fn source(&self) -> DiscountSource {
        self.source
    }

    // -------------------------------------------------------------------------
    // Entry Points (mutually exclusive per call)
    // -------------------------------------------------------------------------

    /// Sets the discount percent; derives the amount.
    ///
    /// An explicit zero percent is KEPT (it is the user's entry, distinct
    /// from unset); only the derived amount degrades to unset, since a 0%
    /// discount has no meaningful amount. `None` clears both sides.
    pub fn set_percent(&mut self, percent: Option<Percent>) {
        match percent {
            Some(p) => {
                self.discount_percent = Some(p);
                self.source = DiscountSource::Percent;
                self.discount_amount = if self.selling_price.is_positive() && !p.is_zero() {
                    Some(p.of(self.selling_price))
                } else {
                    None
                };
            }
            None => self.clear(),
        }
    }

    /// Sets the discount amount; derives the percent.
    ///
    /// Symmetric with [`set_percent`](Self::set_percent); negative amounts
    /// coerce to the unset sentinel.
    pub fn set_amount(&mut self, amount: Option<Money>) {
        match amount.filter(|a| a.is_positive()) {
            Some(a) => {
                self.discount_amount = Some(a);
                self.source = DiscountSource::Amount;
                self.discount_percent = Percent::ratio_of(a, self.selling_price);
            }
            None => self.clear(),
        }
    }

    /// Changes the selling price and re-derives the *dependent* discount
    /// side from the independent one.
    ///
    /// If the percent was last explicitly set, the amount is re-derived from
    /// the percent - never the reverse. This keeps exactly one source of
    /// truth and prevents the two fields from re-deriving each other.
    pub fn set_selling_price(&mut self, selling_price: Money) {
        self.selling_price = selling_price.coerce_non_negative();
        self.rederive();
    }

    /// Clears the discount to the unset state.
    pub fn clear(&mut self) {
        self.discount_percent = None;
        self.discount_amount = None;
        self.source = DiscountSource::None;
    }

    // -------------------------------------------------------------------------
    // Derivation
    // -------------------------------------------------------------------------

    /// Re-derives the dependent side from the independent one.
    ///
    /// A zero selling price degrades the dependent side to unset (the
    /// derivation is undefined); the independent side keeps its value so the
    /// user's entry survives a transient 0 price.
    fn rederive(&mut self) {
        match self.source {
            DiscountSource::None => {
                self.discount_percent = None;
                self.discount_amount = None;
            }
            DiscountSource::Percent => {
                self.discount_amount = match self.discount_percent {
                    Some(p) if self.selling_price.is_positive() && !p.is_zero() => {
                        Some(p.of(self.selling_price))
                    }
                    _ => None,
                };
            }
            DiscountSource::Amount => {
                self.discount_percent = match self.discount_amount {
                    Some(a) if a.is_positive() => Percent::ratio_of(a, self.selling_price),
                    _ => None,
                };
            }
        }
    }

    /// The row's net price: selling price minus the discount, floored at 0.
    ///
    /// Only the INDEPENDENT mechanism is subtracted. The dependent field is
    /// always a derived copy of the same discount, so subtracting both would
    /// double-count on every consistent row; a stale dependent value in a
    /// transitional state is ignored for the same reason.
    pub fn final_price(&self) -> Money {
        let percent_discount = match self.source {
            DiscountSource::Percent => self
                .discount_percent
                .map(|p| p.of(self.selling_price))
                .unwrap_or_else(Money::zero),
            _ => Money::zero(),
        };
        let amount_discount = match self.source {
            DiscountSource::Amount => self.discount_amount.unwrap_or_else(Money::zero),
            _ => Money::zero(),
        };
        (self.selling_price - percent_discount - amount_discount).max_zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
