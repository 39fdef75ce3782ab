//! # Cost Module
//!
//! Production cost of a job, derived from its roll layout.
//!
//! ## Cost Components
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  material    = total_length_feet × vinyl_cost_per_roll / roll_feet     │
//! │  laminate    = total_length_feet × laminate_cost_per_roll / roll_feet  │
//! │  ink_ml      = width × height × quantity × ink_ml_per_square_inch      │
//! │  ink         = ink_ml × ink_cost_per_ml × ink_overhead_multiplier      │
//! │  packaging   = mailer (qty ≤ 300) | box (qty > 300)                    │
//! │  promotional = fixed per order                                          │
//! │  ─────────────────────────────────────────────────────────────────────  │
//! │  total       = sum of the above                                         │
//! │  per sticker = total / quantity                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Material and laminate are charged by the foot of roll consumed, which
//! already includes spacing waste, section gaps and the trailing allowance.

use tracing::debug;

use crate::error::CoreResult;
use crate::types::{CostBreakdown, LayoutResult, MaterialRollSpec, StickerSpec, UnitCosts};
use crate::validation;

/// Computes the production cost of a planned job.
///
/// ## Errors
/// - `InvalidUnitCost` when a per-roll cost is ≤ 0 or any other cost is
///   negative or not finite
/// - `InvalidDimensions` / `Validation` for a bad spec or roll
pub fn compute_cost(
    layout: &LayoutResult,
    spec: &StickerSpec,
    roll: &MaterialRollSpec,
    costs: &UnitCosts,
) -> CoreResult<CostBreakdown> {
    validation::validate_sticker(spec)?;
    validation::validate_roll(roll)?;
    validation::validate_unit_costs(costs)?;

    let vinyl_cost_per_foot = costs.vinyl_cost_per_roll / roll.roll_length_feet;
    let laminate_cost_per_foot = costs.laminate_cost_per_roll / roll.roll_length_feet;

    let material_cost = layout.total_length_feet * vinyl_cost_per_foot;
    let laminate_cost = layout.total_length_feet * laminate_cost_per_foot;

    let ink_ml_used = spec.total_square_inches() * costs.ink_ml_per_square_inch;
    let ink_cost = ink_ml_used * costs.ink_cost_per_ml * costs.ink_overhead_multiplier;

    let packaging_cost = costs.packaging.cost_for(spec.quantity);
    let promotional_cost = costs.promotional_item_cost;

    let total_cost = material_cost + laminate_cost + ink_cost + packaging_cost + promotional_cost;
    let cost_per_sticker = total_cost / spec.quantity as f64;

    debug!(
        material_cost,
        laminate_cost,
        ink_cost,
        packaging_cost,
        total_cost,
        "Computed job cost"
    );

    Ok(CostBreakdown {
        material_cost,
        laminate_cost,
        ink_cost,
        ink_ml_used,
        packaging_cost,
        promotional_cost,
        total_cost,
        cost_per_sticker,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;
    use crate::layout::plan_layout;
    use crate::types::PackagingTiers;
    use proptest::prelude::*;

    fn cost_for(width: f64, height: f64, quantity: u32, costs: &UnitCosts) -> CoreResult<CostBreakdown> {
        let spec = StickerSpec::new(width, height, quantity).unwrap();
        let roll = MaterialRollSpec::default();
        let layout = plan_layout(&spec, &roll).unwrap();
        compute_cost(&layout, &spec, &roll, costs)
    }

    #[test]
    fn test_ink_usage_for_one_thousand_square_inches() {
        let cost = cost_for(2.0, 2.0, 250, &UnitCosts::default()).unwrap();
        assert!((cost.ink_ml_used - 4.03).abs() < 1e-9);
        // 4.03 ml × $0.30 × 1.2
        assert!((cost.ink_cost - 1.4508).abs() < 1e-9);
    }

    #[test]
    fn test_material_and_laminate_by_the_foot() {
        // 3"×3" × 100 uses 33.9" = 2.825'
        let cost = cost_for(3.0, 3.0, 100, &UnitCosts::default()).unwrap();
        assert!((cost.material_cost - 2.825 * 250.0 / 150.0).abs() < 1e-9);
        assert!((cost.laminate_cost - 2.825 * 180.0 / 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_packaging_step_boundary() {
        let costs = UnitCosts::default();
        let under_limit = cost_for(2.0, 2.0, 250, &costs).unwrap();
        assert_eq!(under_limit.packaging_cost, costs.packaging.mailer_cost);

        let over_limit = cost_for(2.0, 2.0, 301, &costs).unwrap();
        assert_eq!(over_limit.packaging_cost, costs.packaging.box_cost);
    }

    #[test]
    fn test_custom_packaging_threshold() {
        let costs = UnitCosts {
            packaging: PackagingTiers {
                mailer_max_quantity: 50,
                mailer_cost: 0.5,
                box_cost: 2.0,
            },
            ..UnitCosts::default()
        };
        assert_eq!(cost_for(1.0, 1.0, 50, &costs).unwrap().packaging_cost, 0.5);
        assert_eq!(cost_for(1.0, 1.0, 51, &costs).unwrap().packaging_cost, 2.0);
    }

    #[test]
    fn test_promotional_item_added_once() {
        let costs = UnitCosts {
            promotional_item_cost: 0.40,
            ..UnitCosts::default()
        };
        let with = cost_for(3.0, 3.0, 500, &costs).unwrap();
        let without = cost_for(3.0, 3.0, 500, &UnitCosts::default()).unwrap();
        assert!((with.total_cost - without.total_cost - 0.40).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_non_positive_roll_cost() {
        let costs = UnitCosts {
            laminate_cost_per_roll: 0.0,
            ..UnitCosts::default()
        };
        assert!(matches!(
            cost_for(3.0, 3.0, 100, &costs),
            Err(CoreError::InvalidUnitCost { ref field, .. }) if field == "laminate_cost_per_roll"
        ));
    }

    proptest! {
        #[test]
        fn prop_per_sticker_times_quantity_is_total(
            width in 0.5f64..20.0,
            height in 0.5f64..20.0,
            quantity in 1u32..20_000,
        ) {
            let cost = cost_for(width, height, quantity, &UnitCosts::default()).unwrap();
            let rebuilt = cost.cost_per_sticker * quantity as f64;
            prop_assert!((rebuilt - cost.total_cost).abs() <= 1e-9 * cost.total_cost.max(1.0));

            let parts = cost.material_cost
                + cost.laminate_cost
                + cost.ink_cost
                + cost.packaging_cost
                + cost.promotional_cost;
            prop_assert!((parts - cost.total_cost).abs() < 1e-9);
        }
    }
}
