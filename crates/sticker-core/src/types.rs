//! # Domain Types
//!
//! Inputs and results of the pricing engine.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  INPUTS (caller supplied)                                               │
//! │  ┌─────────────────┐   ┌──────────────────┐   ┌─────────────────┐      │
//! │  │  StickerSpec    │   │ MaterialRollSpec │   │   UnitCosts     │      │
//! │  │  width, height  │   │ width, length    │   │ vinyl, laminate │      │
//! │  │  quantity       │   │ margins, spacing │   │ ink, packaging  │      │
//! │  └─────────────────┘   │ section, gap     │   └─────────────────┘      │
//! │                        └──────────────────┘                             │
//! │                                                                         │
//! │  OUTPUTS (recomputed on every call, never mutated)                     │
//! │  ┌──────────────┐ ┌───────────────┐ ┌────────────┐ ┌──────────────┐    │
//! │  │ LayoutResult │ │ CostBreakdown │ │ PriceQuote │ │ MarginReport │    │
//! │  └──────────────┘ └───────────────┘ └────────────┘ └──────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All lengths are inches unless the field name says feet. All prices and
//! costs are f64 dollars; see [`crate::money`] for display rounding.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreResult;
use crate::money::Money;
use crate::validation;

// =============================================================================
// Sticker Spec
// =============================================================================

/// One sticker order line: size and quantity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StickerSpec {
    pub width_inches: f64,
    pub height_inches: f64,
    pub quantity: u32,
}

impl StickerSpec {
    /// Creates a validated spec.
    ///
    /// ## Example
    /// ```rust
    /// use sticker_core::StickerSpec;
    ///
    /// let spec = StickerSpec::new(3.0, 3.0, 100).unwrap();
    /// assert_eq!(spec.square_inches(), 9.0);
    ///
    /// assert!(StickerSpec::new(0.0, 3.0, 100).is_err());
    /// assert!(StickerSpec::new(3.0, 3.0, 0).is_err());
    /// ```
    pub fn new(width_inches: f64, height_inches: f64, quantity: u32) -> CoreResult<Self> {
        let spec = StickerSpec {
            width_inches,
            height_inches,
            quantity,
        };
        validation::validate_sticker(&spec)?;
        Ok(spec)
    }

    /// Area of one sticker.
    #[inline]
    pub fn square_inches(&self) -> f64 {
        self.width_inches * self.height_inches
    }

    /// Printed area of the whole order.
    #[inline]
    pub fn total_square_inches(&self) -> f64 {
        self.square_inches() * self.quantity as f64
    }
}

// =============================================================================
// Material Roll Spec
// =============================================================================

/// Geometry of a roll type and of the press that prints on it.
///
/// ## Roll Anatomy
/// ```text
///  ◄────────────── roll_width_inches ──────────────►
///  ┌──┬───────────────────────────────────────────┬──┐
///  │  │ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢   ◄ spacing between ▢     │  │ ▲
///  │M │ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢                           │M │ │ section
///  │L │ ▢ ▢ ▢ ▢ ▢ ▢ ▢ ▢                           │R │ ▼ (≤ max length)
///  │  │─────────────── inter-section gap ─────────│  │
///  │  │ ▢ ▢ ▢ ▢ ▢ ▢                               │  │ final section
///  │  │───────────── trailing allowance ──────────│  │ (once per job)
///  └──┴───────────────────────────────────────────┴──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct MaterialRollSpec {
    pub roll_width_inches: f64,
    pub roll_length_feet: f64,
    pub margin_left_inches: f64,
    pub margin_right_inches: f64,
    pub inter_sticker_spacing_inches: f64,
    /// Longest length the press prints in one pass.
    pub max_section_length_inches: f64,
    /// Blank material between sections, used to separate them when cutting.
    pub inter_section_gap_inches: f64,
    /// Barcode/leader space reserved once per job.
    pub trailing_allowance_inches: f64,
}

impl MaterialRollSpec {
    /// Width left for stickers after both margins.
    #[inline]
    pub fn usable_width_inches(&self) -> f64 {
        self.roll_width_inches - self.margin_left_inches - self.margin_right_inches
    }
}

/// The shop's standard 54" × 150' printable vinyl roll.
impl Default for MaterialRollSpec {
    fn default() -> Self {
        MaterialRollSpec {
            roll_width_inches: 54.0,
            roll_length_feet: 150.0,
            margin_left_inches: 0.375,
            margin_right_inches: 0.375,
            inter_sticker_spacing_inches: 0.15,
            max_section_length_inches: 42.0,
            inter_section_gap_inches: 1.0,
            trailing_allowance_inches: 12.0,
        }
    }
}

// =============================================================================
// Unit Costs
// =============================================================================

/// Packaging cost as a step function of quantity.
///
/// Orders up to and including `mailer_max_quantity` ship in a bubble mailer;
/// larger orders ship in a box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct PackagingTiers {
    pub mailer_max_quantity: u32,
    pub mailer_cost: f64,
    pub box_cost: f64,
}

impl PackagingTiers {
    /// Packaging cost for an order of `quantity` stickers.
    ///
    /// ```rust
    /// use sticker_core::PackagingTiers;
    ///
    /// let tiers = PackagingTiers::default();
    /// assert_eq!(tiers.cost_for(300), tiers.mailer_cost);
    /// assert_eq!(tiers.cost_for(301), tiers.box_cost);
    /// ```
    pub fn cost_for(&self, quantity: u32) -> f64 {
        if quantity <= self.mailer_max_quantity {
            self.mailer_cost
        } else {
            self.box_cost
        }
    }
}

impl Default for PackagingTiers {
    fn default() -> Self {
        PackagingTiers {
            mailer_max_quantity: 300,
            mailer_cost: 1.10,
            box_cost: 0.85,
        }
    }
}

/// Material and consumable costs for one job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(default)]
pub struct UnitCosts {
    pub vinyl_cost_per_roll: f64,
    pub laminate_cost_per_roll: f64,
    pub ink_cost_per_ml: f64,
    pub ink_ml_per_square_inch: f64,
    /// Waste and purge factor applied on top of the measured ink, e.g. 1.2.
    pub ink_overhead_multiplier: f64,
    pub packaging: PackagingTiers,
    /// Fixed per-order cost of the free promotional item, 0 when none.
    pub promotional_item_cost: f64,
}

impl Default for UnitCosts {
    fn default() -> Self {
        UnitCosts {
            vinyl_cost_per_roll: 250.0,
            laminate_cost_per_roll: 180.0,
            ink_cost_per_ml: 0.30,
            ink_ml_per_square_inch: 0.00403,
            ink_overhead_multiplier: 1.2,
            packaging: PackagingTiers::default(),
            promotional_item_cost: 0.0,
        }
    }
}

// =============================================================================
// Layout Result
// =============================================================================

/// How an order lays out on the roll.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LayoutResult {
    pub stickers_per_row: u32,
    pub rows_per_section: u32,
    pub stickers_per_section: u32,
    pub total_rows: u32,
    /// Sections printed completely full.
    pub full_sections: u32,
    /// Full sections plus the partial final section, if any.
    pub sections_needed: u32,
    pub total_length_inches: f64,
    pub total_length_feet: f64,
    /// Exact fraction of a roll consumed; round up only when allocating rolls.
    pub rolls_needed: f64,
}

// =============================================================================
// Cost Breakdown
// =============================================================================

/// Production cost of one job.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CostBreakdown {
    pub material_cost: f64,
    pub laminate_cost: f64,
    pub ink_cost: f64,
    pub ink_ml_used: f64,
    pub packaging_cost: f64,
    pub promotional_cost: f64,
    pub total_cost: f64,
    pub cost_per_sticker: f64,
}

impl CostBreakdown {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_dollars(self.total_cost)
    }
}

// =============================================================================
// Price Quote
// =============================================================================

/// Customer-facing price for one sticker order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceQuote {
    pub quantity: u32,
    pub square_inches: f64,
    pub base_price_per_sticker: f64,
    pub discount_fraction: f64,
    pub final_price_per_sticker: f64,
    pub total_price: f64,
}

impl PriceQuote {
    /// Per-sticker price rounded for display.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_dollars(self.final_price_per_sticker)
    }

    /// Order total rounded once, from the unrounded unit price.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_dollars(self.total_price)
    }
}

// =============================================================================
// Margin Report
// =============================================================================

/// Profitability of a quoted job.
///
/// `gross_profit` is floored at zero. `raw_profit` keeps the signed value so a
/// loss is reported rather than hidden, and `is_loss` flags it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MarginReport {
    pub gross_profit: f64,
    pub margin_percent: f64,
    pub profit_per_sticker: f64,
    pub raw_profit: f64,
    pub is_loss: bool,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_roll_usable_width() {
        let roll = MaterialRollSpec::default();
        assert!((roll.usable_width_inches() - 53.25).abs() < 1e-12);
    }

    #[test]
    fn test_sticker_area() {
        let spec = StickerSpec::new(2.0, 2.0, 250).unwrap();
        assert_eq!(spec.square_inches(), 4.0);
        assert_eq!(spec.total_square_inches(), 1000.0);
    }

    #[test]
    fn test_packaging_boundary() {
        let tiers = PackagingTiers::default();
        assert_eq!(tiers.cost_for(1), 1.10);
        assert_eq!(tiers.cost_for(250), 1.10);
        assert_eq!(tiers.cost_for(300), 1.10);
        assert_eq!(tiers.cost_for(301), 0.85);
    }

    #[test]
    fn test_roll_spec_partial_deserialize_uses_defaults() {
        let roll: MaterialRollSpec =
            serde_json::from_str(r#"{ "roll_width_inches": 30.0 }"#).unwrap();
        assert_eq!(roll.roll_width_inches, 30.0);
        assert_eq!(roll.roll_length_feet, 150.0);
        assert_eq!(roll.inter_sticker_spacing_inches, 0.15);
    }

    #[test]
    fn test_quote_money_rounding() {
        let quote = PriceQuote {
            quantity: 250,
            square_inches: 9.0,
            base_price_per_sticker: 1.9,
            discount_fraction: 0.45,
            final_price_per_sticker: 1.045,
            total_price: 261.25,
        };
        assert_eq!(quote.unit_price().cents(), 105);
        assert_eq!(quote.total().cents(), 26125);
    }
}
