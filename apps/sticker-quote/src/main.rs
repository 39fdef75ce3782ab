//! # sticker-quote
//!
//! Command-line quotes and production estimates for custom sticker orders.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        sticker-quote                                    │
//! │                                                                         │
//! │  args ──► EngineConfig::load ──► load_pricing_table                    │
//! │                                        │                                │
//! │              ┌─────────────────────────┼──────────────────┐             │
//! │              ▼                         ▼                  ▼             │
//! │          estimate                   breaks              config          │
//! │      (estimate_job)             (price_breaks)     (effective TOML)     │
//! │              │                         │                  │             │
//! │              └──────────── text or --json ────────────────┘             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Logs go to stderr so `--json` output can be piped. Set `RUST_LOG=debug`
//! to see the computed layout and quote.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use sticker_config::{load_pricing_table, EngineConfig};
use sticker_core::{estimate_job, price_breaks, JobEstimate, Money, PriceBreak, StickerSpec};
use tracing::debug;
use tracing_subscriber::EnvFilter;

// =============================================================================
// CLI Arguments
// =============================================================================

#[derive(Parser, Debug)]
#[command(author, version, about = "Quote and estimate custom sticker orders")]
struct Cli {
    /// Path to sticker.toml (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print machine-readable JSON instead of a table
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Layout, cost, price and margin for one order
    Estimate {
        /// Sticker width in inches
        #[arg(short = 'W', long)]
        width: f64,

        /// Sticker height in inches
        #[arg(short = 'H', long)]
        height: f64,

        /// Number of stickers
        #[arg(short, long)]
        quantity: u32,

        /// Material profile (defaults to the configured default material)
        #[arg(short, long)]
        material: Option<String>,
    },

    /// Price at every quantity tier for one sticker size
    Breaks {
        /// Sticker width in inches
        #[arg(short = 'W', long)]
        width: f64,

        /// Sticker height in inches
        #[arg(short = 'H', long)]
        height: f64,
    },

    /// Show the effective configuration
    Config,
}

// =============================================================================
// Entry Point
// =============================================================================

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let config = EngineConfig::load(cli.config.clone()).context("Failed to load configuration")?;

    match cli.command {
        Command::Estimate {
            width,
            height,
            quantity,
            material,
        } => run_estimate(&config, width, height, quantity, material.as_deref(), cli.json),
        Command::Breaks { width, height } => run_breaks(&config, width, height, cli.json),
        Command::Config => run_config(&config, cli.json),
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show computed layouts and quotes
/// - `RUST_LOG=sticker_config=info` - Show which config and tables were loaded
/// - Default: WARN level (loss-making quotes, ignored overrides)
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

// =============================================================================
// Commands
// =============================================================================

#[derive(Serialize)]
struct EstimateOutput<'a> {
    material: &'a str,
    #[serde(flatten)]
    estimate: JobEstimate,
}

fn run_estimate(
    config: &EngineConfig,
    width: f64,
    height: f64,
    quantity: u32,
    material: Option<&str>,
    json: bool,
) -> Result<()> {
    let material_name = material.unwrap_or(&config.default_material);
    let costs = config.unit_costs(Some(material_name))?;
    let table = load_pricing_table(&config.pricing).context("Failed to load pricing tables")?;

    let spec = StickerSpec::new(width, height, quantity)?;
    let estimate = estimate_job(&spec, &config.roll, &table, &costs)?;
    debug!(material = material_name, "Estimate complete");

    if json {
        let output = EstimateOutput {
            material: material_name,
            estimate,
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_estimate(material_name, &estimate));
    }

    Ok(())
}

fn run_breaks(config: &EngineConfig, width: f64, height: f64, json: bool) -> Result<()> {
    let table = load_pricing_table(&config.pricing).context("Failed to load pricing tables")?;
    let breaks = price_breaks(width, height, &table)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&breaks)?);
    } else {
        print!("{}", render_breaks(width, height, &breaks));
    }

    Ok(())
}

fn run_config(config: &EngineConfig, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(config)?);
    } else {
        print!("{}", config.to_toml_string()?);
    }
    Ok(())
}

// =============================================================================
// Text Rendering
// =============================================================================

fn money(dollars: f64) -> Money {
    Money::from_dollars(dollars)
}

fn render_estimate(material: &str, e: &JobEstimate) -> String {
    let mut out = String::new();
    let line = |out: &mut String, label: &str, value: String| {
        out.push_str(&format!("  {:<22}{:>14}\n", label, value));
    };

    out.push_str(&format!(
        "{}\" x {}\" x {} on {} ({:.2} sq in each)\n\n",
        e.spec.width_inches,
        e.spec.height_inches,
        e.spec.quantity,
        material,
        e.spec.square_inches()
    ));

    out.push_str("Layout\n");
    line(&mut out, "Stickers per row", e.layout.stickers_per_row.to_string());
    line(&mut out, "Rows per section", e.layout.rows_per_section.to_string());
    line(&mut out, "Stickers per section", e.layout.stickers_per_section.to_string());
    line(&mut out, "Total rows", e.layout.total_rows.to_string());
    line(&mut out, "Sections", e.layout.sections_needed.to_string());
    line(&mut out, "Length (in)", format!("{:.2}", e.layout.total_length_inches));
    line(&mut out, "Length (ft)", format!("{:.2}", e.layout.total_length_feet));
    line(&mut out, "Rolls", format!("{:.4}", e.layout.rolls_needed));

    out.push_str("\nCost\n");
    line(&mut out, "Vinyl", money(e.cost.material_cost).to_string());
    line(&mut out, "Laminate", money(e.cost.laminate_cost).to_string());
    line(
        &mut out,
        "Ink",
        format!("{} ({:.2} ml)", money(e.cost.ink_cost), e.cost.ink_ml_used),
    );
    line(&mut out, "Packaging", money(e.cost.packaging_cost).to_string());
    if e.cost.promotional_cost > 0.0 {
        line(&mut out, "Promotional item", money(e.cost.promotional_cost).to_string());
    }
    line(&mut out, "Total cost", e.cost.total().to_string());
    line(&mut out, "Cost per sticker", money(e.cost.cost_per_sticker).to_string());

    out.push_str("\nPrice\n");
    line(&mut out, "Base per sticker", money(e.quote.base_price_per_sticker).to_string());
    line(
        &mut out,
        "Discount",
        format!("{:.1}%", e.quote.discount_fraction * 100.0),
    );
    line(&mut out, "Per sticker", e.quote.unit_price().to_string());
    line(&mut out, "Total price", e.quote.total().to_string());

    out.push_str("\nMargin\n");
    line(&mut out, "Gross profit", money(e.margin.gross_profit).to_string());
    line(&mut out, "Margin", format!("{:.1}%", e.margin.margin_percent));
    line(&mut out, "Profit per sticker", money(e.margin.profit_per_sticker).to_string());
    if e.margin.is_loss {
        let shortfall = e.cost.total() - e.quote.total();
        out.push_str(&format!("\n  LOSS: price is {} below cost\n", shortfall));
    }

    out
}

fn render_breaks(width: f64, height: f64, breaks: &[PriceBreak]) -> String {
    let mut out = format!("{}\" x {}\" price breaks\n\n", width, height);
    out.push_str(&format!(
        "  {:>8}  {:>9}  {:>12}  {:>12}\n",
        "Quantity", "Discount", "Per sticker", "Total"
    ));
    for b in breaks {
        out.push_str(&format!(
            "  {:>8}  {:>8.1}%  {:>12}  {:>12}\n",
            b.quantity,
            b.quote.discount_fraction * 100.0,
            b.quote.unit_price().to_string(),
            b.quote.total().to_string()
        ));
    }
    out
}
