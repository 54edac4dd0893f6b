//! # Money Module
//!
//! Provides the `Money` and `Percent` types used by every settlement
//! calculation in Meridian.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  In JavaScript/floating point:                                          │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  In many ERP front ends:                                                │
//! │    ₹100.00 × 18% ÷ 2 = ₹9.000000000000002 per tax half                 │
//! │    CGST and SGST drift apart by a rounding hair → audit mismatch        │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Paise                                            │
//! │    10000 paise × 1800 bps / 10000 = 1800 paise, exactly                │
//! │    "Round to 2 decimals" becomes exact integer arithmetic               │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use meridian_core::money::{Money, Percent};
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(25000); // ₹250.00
//!
//! // Percentages are basis points (2-decimal percents are exact)
//! let ten_percent = Percent::from_bps(1000); // 10.00%
//!
//! // ₹250.00 × 10% = ₹25.00
//! assert_eq!(ten_percent.of(price).paise(), 2500);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Integer division with half-away-from-zero rounding.
///
/// All "round to 2 decimal places" rules in the settlement engine reduce to
/// this helper once amounts are in paise and rates are in basis points.
/// Works for negative numerators (a discount can push a derived amount
/// below zero; the sign must survive rounding).
pub(crate) fn div_round(numerator: i128, denominator: i128) -> i64 {
    debug_assert!(denominator > 0);
    let half = denominator / 2;
    let rounded = if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    };
    rounded as i64
}

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (paise).
///
/// ## Design Decisions
/// - **i64 (signed)**: a discount larger than the unit price produces a
///   negative derived price; the engine surfaces that at validation time
///   instead of silently flooring, so the type must carry the sign.
/// - **Single field tuple struct**: zero-cost abstraction over i64.
/// - **Derives**: full serde support for the document wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise (the smallest currency unit).
    ///
    /// ## Why Paise?
    /// Using the smallest unit eliminates all floating-point concerns.
    /// Calculations, validation, and the wire shape all use paise.
    /// Only the UI converts to rupees for display.
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from rupees and paise.
    ///
    /// ## Note
    /// For negative amounts, only the major unit should be negative.
    /// `from_rupees_paise(-5, 50)` = -₹5.50, not -₹4.50
    #[inline]
    pub const fn from_rupees_paise(rupees: i64, paise: i64) -> Self {
        if rupees < 0 {
            Money(rupees * 100 - paise)
        } else {
            Money(rupees * 100 + paise)
        }
    }

    /// Returns the value in paise (smallest currency unit).
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (rupees) portion.
    #[inline]
    pub const fn rupees(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn paise_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the larger of self and zero.
    ///
    /// Used by final-price formulas that defensively floor at zero after
    /// subtracting both discount mechanisms.
    #[inline]
    pub const fn max_zero(&self) -> Self {
        if self.0 > 0 {
            *self
        } else {
            Money(0)
        }
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::Money;
    ///
    /// let unit_price = Money::from_paise(10000); // ₹100.00
    /// let line = unit_price.multiply_quantity(2);
    /// assert_eq!(line.paise(), 20000); // ₹200.00
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Coerces a raw (possibly negative) input amount to the valid domain.
    ///
    /// Raw user input coerces to zero rather than erroring; see the line
    /// computer for where this is applied.
    #[inline]
    pub const fn coerce_non_negative(&self) -> Self {
        if self.0 < 0 {
            Money(0)
        } else {
            *self
        }
    }
}

// =============================================================================
// Percent Type
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01% = 1/10000.
/// Every percent the engine handles (tax rates, discount percents) is
/// entered with at most 2 decimal places, so bps represent them exactly:
/// 1800 bps = 18.00% GST, 1000 bps = 10.00% discount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(u32);

impl Percent {
    /// Creates a percent from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        Percent(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a floating percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Calculates `amount × rate`, rounded half-away-from-zero to paise.
    ///
    /// ## Example
    /// ```rust
    /// use meridian_core::money::{Money, Percent};
    ///
    /// let base = Money::from_paise(20000);      // ₹200.00
    /// let rate = Percent::from_bps(1800);       // 18.00%
    /// assert_eq!(rate.of(base).paise(), 3600);  // ₹36.00
    /// ```
    pub fn of(&self, amount: Money) -> Money {
        // amount_paise * bps / 10000, with rounding
        Money::from_paise(div_round(amount.paise() as i128 * self.0 as i128, 10_000))
    }

    /// Calculates `amount × (rate / 2)`, rounded once to paise.
    ///
    /// This is the CGST/SGST half: computed independently per half so the
    /// two halves are always identical by construction.
    pub fn of_halved(&self, amount: Money) -> Money {
        // amount_paise * bps / 20000 == amount * (rate/2) in one division,
        // so an odd bps rate never loses its half point before rounding
        Money::from_paise(div_round(amount.paise() as i128 * self.0 as i128, 20_000))
    }

    /// Derives the percent that `part` is of `whole`, rounded to bps.
    ///
    /// Returns `None` when `whole` is not positive (the derivation is
    /// undefined, which the discount synchronizer maps to "unset"), or when
    /// the ratio is too large to represent in bps. A representable >100%
    /// ratio is returned as-is so range validation can reject it with a
    /// proper error instead of a silently mangled value.
    pub fn ratio_of(part: Money, whole: Money) -> Option<Percent> {
        if !whole.is_positive() || part.is_negative() {
            return None;
        }
        // part / whole × 100% → bps: part_paise * 10000 / whole_paise
        let bps = div_round(part.paise() as i128 * 10_000, whole.paise() as i128);
        u32::try_from(bps).ok().map(Percent)
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display implementation shows money in a human-readable format.
///
/// ## Note
/// This is for debugging and error messages. Use frontend formatting for
/// actual UI display to handle localization properly.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}₹{}.{:02}", sign, self.rupees().abs(), self.paise_part())
    }
}

/// Default money is zero.
impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by integer (for quantity calculations).
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise() {
        let money = Money::from_paise(25099);
        assert_eq!(money.paise(), 25099);
        assert_eq!(money.rupees(), 250);
        assert_eq!(money.paise_part(), 99);
    }

    #[test]
    fn test_from_rupees_paise() {
        let money = Money::from_rupees_paise(250, 99);
        assert_eq!(money.paise(), 25099);

        let negative = Money::from_rupees_paise(-5, 50);
        assert_eq!(negative.paise(), -550);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_paise(25099)), "₹250.99");
        assert_eq!(format!("{}", Money::from_paise(500)), "₹5.00");
        assert_eq!(format!("{}", Money::from_paise(-550)), "-₹5.50");
        assert_eq!(format!("{}", Money::from_paise(0)), "₹0.00");
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(500);

        assert_eq!((a + b).paise(), 1500);
        assert_eq!((a - b).paise(), 500);
        assert_eq!((a * 3).paise(), 3000);
        assert_eq!((-a).paise(), -1000);
    }

    #[test]
    fn test_sum_iterator() {
        let total: Money = [100, 250, 50].iter().map(|p| Money::from_paise(*p)).sum();
        assert_eq!(total.paise(), 400);
    }

    #[test]
    fn test_percent_of() {
        // ₹200.00 at 18% = ₹36.00
        let base = Money::from_paise(20000);
        let rate = Percent::from_bps(1800);
        assert_eq!(rate.of(base).paise(), 3600);
    }

    #[test]
    fn test_percent_of_with_rounding() {
        // ₹10.00 at 8.25% = ₹0.825 → ₹0.83 (half-away-from-zero)
        let base = Money::from_paise(1000);
        let rate = Percent::from_bps(825);
        assert_eq!(rate.of(base).paise(), 83);
    }

    #[test]
    fn test_percent_of_negative_base() {
        // Negative bases keep their sign through rounding
        let base = Money::from_paise(-1000);
        let rate = Percent::from_bps(825);
        assert_eq!(rate.of(base).paise(), -83);
    }

    #[test]
    fn test_percent_halved_is_symmetric() {
        // Half of 18% on ₹200.00 = ₹18.00; odd rates round once per half
        let base = Money::from_paise(20000);
        let rate = Percent::from_bps(1800);
        assert_eq!(rate.of_halved(base).paise(), 1800);

        // 2.25% halved on ₹100.00 = ₹1.125 → ₹1.13
        let odd = Percent::from_bps(225);
        assert_eq!(odd.of_halved(Money::from_paise(10000)).paise(), 113);
    }

    #[test]
    fn test_ratio_of() {
        // ₹25 of ₹250 = 10.00%
        let pct = Percent::ratio_of(Money::from_paise(2500), Money::from_paise(25000));
        assert_eq!(pct, Some(Percent::from_bps(1000)));

        // Zero or negative whole → undefined
        assert_eq!(Percent::ratio_of(Money::from_paise(100), Money::zero()), None);
    }

    #[test]
    fn test_ratio_of_huge_part_does_not_wrap() {
        // ₹50,00,000 against a 1-paisa whole is 5×10¹² bps; far beyond what
        // bps can hold, so the derivation degrades to unset instead of
        // wrapping into a garbage in-range value
        let huge = Percent::ratio_of(Money::from_paise(500_000_000), Money::from_paise(1));
        assert_eq!(huge, None);

        // A representable >100% ratio still comes through for validation
        let over = Percent::ratio_of(Money::from_paise(300), Money::from_paise(200));
        assert_eq!(over, Some(Percent::from_bps(15_000)));
    }

    #[test]
    fn test_max_zero() {
        assert_eq!(Money::from_paise(-50).max_zero().paise(), 0);
        assert_eq!(Money::from_paise(50).max_zero().paise(), 50);
    }

    #[test]
    fn test_coerce_non_negative() {
        assert_eq!(Money::from_paise(-1).coerce_non_negative().paise(), 0);
        assert_eq!(Money::from_paise(1).coerce_non_negative().paise(), 1);
    }

    #[test]
    fn test_div_round_half_away_from_zero() {
        assert_eq!(div_round(5, 10), 1);
        assert_eq!(div_round(4, 10), 0);
        assert_eq!(div_round(-5, 10), -1);
        assert_eq!(div_round(-4, 10), 0);
    }
}
