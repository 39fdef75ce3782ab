//! # Margin Module
//!
//! Combines a price quote and a cost breakdown into profitability figures.
//!
//! ## Loss Policy
//! `gross_profit` is clamped at zero so dashboards never show a negative
//! margin percentage. The signed figure is kept in `raw_profit`, `is_loss`
//! is set, and a warning is logged, so a loss-making price is surfaced.

use tracing::warn;

use crate::types::{CostBreakdown, MarginReport, PriceQuote};

/// Computes gross profit, margin percentage and per-sticker profit.
///
/// ## Example
/// ```rust
/// use sticker_core::margin::compute_margin;
/// use sticker_core::{CostBreakdown, PriceQuote};
///
/// let quote = PriceQuote {
///     quantity: 100,
///     square_inches: 9.0,
///     base_price_per_sticker: 2.0,
///     discount_fraction: 0.0,
///     final_price_per_sticker: 2.0,
///     total_price: 200.0,
/// };
/// let cost = CostBreakdown {
///     material_cost: 30.0,
///     laminate_cost: 20.0,
///     ink_cost: 0.0,
///     ink_ml_used: 0.0,
///     packaging_cost: 0.0,
///     promotional_cost: 0.0,
///     total_cost: 50.0,
///     cost_per_sticker: 0.5,
/// };
///
/// let margin = compute_margin(&quote, &cost);
/// assert_eq!(margin.gross_profit, 150.0);
/// assert_eq!(margin.margin_percent, 75.0);
/// assert_eq!(margin.profit_per_sticker, 1.5);
/// ```
pub fn compute_margin(quote: &PriceQuote, cost: &CostBreakdown) -> MarginReport {
    let raw_profit = quote.total_price - cost.total_cost;
    let is_loss = raw_profit < 0.0;
    let gross_profit = raw_profit.max(0.0);

    if is_loss {
        warn!(
            total_price = quote.total_price,
            total_cost = cost.total_cost,
            raw_profit,
            "Quoted price does not cover production cost"
        );
    }

    let margin_percent = if quote.total_price > 0.0 {
        gross_profit / quote.total_price * 100.0
    } else {
        0.0
    };

    let profit_per_sticker = if quote.quantity > 0 {
        gross_profit / quote.quantity as f64
    } else {
        0.0
    };

    MarginReport {
        gross_profit,
        margin_percent,
        profit_per_sticker,
        raw_profit,
        is_loss,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
