//! # Job Estimate
//!
//! Runs the whole engine for one order.
//!
//! ```text
//! StickerSpec ──► plan_layout ──► compute_cost ──┐
//!      │                                         ├──► compute_margin
//!      └────────► quote (PricingTable) ──────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::cost::compute_cost;
use crate::error::CoreResult;
use crate::layout::plan_layout;
use crate::margin::compute_margin;
use crate::pricing::{quote, PricingTable};
use crate::types::{
    CostBreakdown, LayoutResult, MarginReport, MaterialRollSpec, PriceQuote, StickerSpec,
    UnitCosts,
};

/// Everything the admin calculator shows for one order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JobEstimate {
    pub spec: StickerSpec,
    pub layout: LayoutResult,
    pub cost: CostBreakdown,
    pub quote: PriceQuote,
    pub margin: MarginReport,
}

/// Estimates layout, cost, price and margin in one call.
///
/// Fails with the first error any stage reports; no partial estimate is
/// returned.
pub fn estimate_job(
    spec: &StickerSpec,
    roll: &MaterialRollSpec,
    table: &PricingTable,
    costs: &UnitCosts,
) -> CoreResult<JobEstimate> {
    let layout = plan_layout(spec, roll)?;
    let cost = compute_cost(&layout, spec, roll, costs)?;
    let quote = quote(spec, table)?;
    let margin = compute_margin(&quote, &cost);

    Ok(JobEstimate {
        spec: *spec,
        layout,
        cost,
        quote,
        margin,
    })
}
