//! # sticker-config: Settings and Pricing Tables for Sticker Press
//!
//! Loads everything the pure engine needs from the outside world.
//!
//! ## Loading Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Config Loading                                  │
//! │                                                                         │
//! │   sticker.toml ──┐                                                      │
//! │                  ├──► EngineConfig ──validate()──► roll, UnitCosts     │
//! │   STICKER_* env ─┘          │                                          │
//! │                             │ pricing.{base_prices,quantity_discounts} │
//! │                             ▼                                          │
//! │                  CSV files, or built-in tables ──► PricingTable        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`settings`] - `EngineConfig`, material profiles, env overrides
//! - [`tables`] - CSV parsing for base prices and quantity discounts
//! - [`error`] - Config error types

pub mod error;
pub mod settings;
pub mod tables;

pub use error::{ConfigError, ConfigResult};
pub use settings::{CostSettings, EngineConfig, MaterialProfile, PricingSources, CONFIG_FILE_NAME};
pub use tables::{builtin_pricing_table, load_pricing_table};
