//! # Money Module
//!
//! Provides the `Money` type for presenting engine results in whole cents.
//!
//! ## Where Rounding Happens
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The engine computes in f64 dollars:                                    │
//! │    base $1.90 × (1 − 0.45) = $1.045 per sticker                        │
//! │    $1.045 × 250 stickers  = $261.25                                     │
//! │                                                                         │
//! │  Rounding to cents happens ONCE, at the edge, via Money::from_dollars: │
//! │    per sticker → $1.05   total → $261.25                               │
//! │                                                                         │
//! │  Rounding the per-sticker price first and multiplying would give       │
//! │  $262.50 and overcharge the customer by $1.25.                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use sticker_core::money::Money;
//!
//! let total = Money::from_dollars(261.25);
//! assert_eq!(total.cents(), 26125);
//! assert_eq!(total.to_string(), "$261.25");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Sub;
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in cents.
///
/// ## Design Decisions
/// - **i64 (signed)**: a loss-making job has a negative raw profit
/// - **Single field tuple struct**: Zero-cost abstraction over i64
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds a dollar amount to the nearest cent (half away from zero).
    ///
    /// ## Example
    /// ```rust
    /// use sticker_core::money::Money;
    ///
    /// assert_eq!(Money::from_dollars(1.045).cents(), 105);
    /// assert_eq!(Money::from_dollars(-0.125).cents(), -13);
    /// ```
    ///
    /// Non-finite input maps to zero; the engine never produces one from
    /// validated inputs.
    pub fn from_dollars(dollars: f64) -> Self {
        if !dollars.is_finite() {
            return Money::zero();
        }
        // Nudge by a tiny epsilon so 1.045 (stored as 1.04499999...) rounds up
        let cents = (dollars * 100.0 + dollars.signum() * 1e-7).round();
        Money(cents as i64)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
