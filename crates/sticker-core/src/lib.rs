//! # sticker-core: Pure Pricing Engine for Sticker Press
//!
//! This crate is the **heart** of Sticker Press. It contains the roll layout,
//! production cost and customer pricing logic as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Sticker Press Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │        Storefront pricing / Admin cost calculator               │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │      apps/sticker-quote + sticker-config (tables, settings)     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ sticker-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌─────────┐  ┌─────────┐  ┌─────────┐  ┌─────────┐           │   │
//! │  │   │ layout  │─►│  cost   │─►│ margin  │◄─│ pricing │           │   │
//! │  │   │ rows    │  │ vinyl   │  │ profit  │  │ tables  │           │   │
//! │  │   │ sections│  │ ink     │  │ margin% │  │ quote   │           │   │
//! │  │   └─────────┘  └─────────┘  └─────────┘  └─────────┘           │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO GLOBAL STATE • PURE FUNCTIONS                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Inputs (StickerSpec, MaterialRollSpec, UnitCosts) and results
//! - [`pricing`] - Pricing tables, `quote`, `price_breaks`
//! - [`layout`] - Roll layout planner
//! - [`cost`] - Cost aggregator
//! - [`margin`] - Profit/margin reporter
//! - [`estimate`] - All of the above for one order
//! - [`money`] - Cent rounding for display
//! - [`error`] - Domain error types
//! - [`validation`] - Input checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, safe to call from any thread
//! 2. **No I/O**: tables and settings are loaded by sticker-config
//! 3. **Whole Results**: a call returns a complete result or one typed error
//!
//! ## Example Usage
//!
//! ```rust
//! use sticker_core::layout::plan_layout;
//! use sticker_core::{MaterialRollSpec, StickerSpec};
//!
//! let spec = StickerSpec::new(3.0, 3.0, 100).unwrap();
//! let layout = plan_layout(&spec, &MaterialRollSpec::default()).unwrap();
//!
//! assert_eq!(layout.stickers_per_row, 16);
//! assert_eq!(layout.stickers_per_section, 208);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cost;
pub mod error;
pub mod estimate;
pub mod layout;
pub mod margin;
pub mod money;
pub mod pricing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cost::compute_cost;
pub use error::{CoreError, CoreResult, ValidationError};
pub use estimate::{estimate_job, JobEstimate};
pub use layout::plan_layout;
pub use margin::compute_margin;
pub use money::Money;
pub use pricing::{price_breaks, quote, PriceBreak, PricingTable};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

pub const INCHES_PER_FOOT: f64 = 12.0;

/// Slack added before flooring a fit count.
///
/// `(53.25 + 0.15) / (8.75 + 0.15)` is exactly 6 on paper but may come out
/// as 5.999999999 in f64; without this the planner would drop a sticker.
pub const FIT_EPSILON: f64 = 1e-9;

/// Tolerance when matching an area against a table breakpoint.
pub const AREA_EPSILON: f64 = 1e-9;
