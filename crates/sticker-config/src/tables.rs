//! # Pricing Table Loading
//!
//! Reads the base-price and quantity-discount tables from CSV.
//!
//! ## File Formats
//! ```text
//! base_prices.csv                 quantity_discounts.csv
//! ───────────────                 ──────────────────────────────
//! square_inches,base_price        quantity,4,9,16,25
//! 1,0.55                          1,0,0,0,0
//! 4,1.20                          50,0.12,0.12,0.11,0.10
//! 9,1.90                          100,25%,24%,22%,20%
//! ```
//!
//! Discount header cells after `quantity` are the area breakpoints in square
//! inches. Discount cells are fractions, or percentages with a `%` suffix.
//!
//! Parsing only turns text into rows; `PricingTable::new` decides whether the
//! rows form a usable table. A bad cell is an error, never a default.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use sticker_core::pricing::{BasePriceRow, DiscountBreakpoint, QuantityDiscountRow};
use sticker_core::PricingTable;
use tracing::info;

use crate::error::{ConfigError, ConfigResult};
use crate::settings::PricingSources;

/// Default base prices shipped with the binary.
pub const BUILTIN_BASE_PRICES: &str = include_str!("../data/base_prices.csv");

/// Default quantity discounts shipped with the binary.
pub const BUILTIN_QUANTITY_DISCOUNTS: &str = include_str!("../data/quantity_discounts.csv");

const BASE_TABLE: &str = "base prices";
const DISCOUNT_TABLE: &str = "quantity discounts";

// =============================================================================
// Field Helpers
// =============================================================================

fn field_error(table: &str, line: u64, column: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::CsvField {
        table: table.to_string(),
        line,
        column: column.to_string(),
        reason: reason.into(),
    }
}

fn line_of(record: &csv::StringRecord) -> u64 {
    record.position().map(|p| p.line()).unwrap_or(0)
}

fn get_f64_field(
    table: &str,
    record: &csv::StringRecord,
    index: usize,
    column: &str,
) -> ConfigResult<f64> {
    let raw = record
        .get(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| field_error(table, line_of(record), column, "missing value"))?;

    raw.parse::<f64>()
        .map_err(|_| field_error(table, line_of(record), column, format!("'{}' is not a number", raw)))
}

fn get_fraction_field(
    table: &str,
    record: &csv::StringRecord,
    index: usize,
    column: &str,
) -> ConfigResult<f64> {
    let raw = record
        .get(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| field_error(table, line_of(record), column, "missing value"))?;

    let (number, scale) = match raw.strip_suffix('%') {
        Some(pct) => (pct.trim(), 100.0),
        None => (raw, 1.0),
    };

    number
        .parse::<f64>()
        .map(|v| v / scale)
        .map_err(|_| field_error(table, line_of(record), column, format!("'{}' is not a fraction", raw)))
}

fn get_quantity_field(
    table: &str,
    record: &csv::StringRecord,
    index: usize,
) -> ConfigResult<u32> {
    let raw = record
        .get(index)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| field_error(table, line_of(record), "quantity", "missing value"))?;

    raw.parse::<u32>().map_err(|_| {
        field_error(
            table,
            line_of(record),
            "quantity",
            format!("'{}' is not a whole number", raw),
        )
    })
}

// =============================================================================
// Parsers
// =============================================================================

/// Parses `square_inches,base_price` rows.
pub fn parse_base_prices<R: Read>(reader: R) -> ConfigResult<Vec<BasePriceRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(BasePriceRow {
            square_inches: get_f64_field(BASE_TABLE, &record, 0, "square_inches")?,
            base_price_per_sticker: get_f64_field(BASE_TABLE, &record, 1, "base_price")?,
        });
    }

    Ok(rows)
}

/// Parses a quantity × area-breakpoint discount grid.
pub fn parse_quantity_discounts<R: Read>(reader: R) -> ConfigResult<Vec<QuantityDiscountRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader.headers()?.clone();
    let breakpoints = headers
        .iter()
        .skip(1)
        .map(|cell| {
            cell.parse::<f64>().map_err(|_| {
                field_error(
                    DISCOUNT_TABLE,
                    1,
                    cell,
                    "area breakpoint header must be a number of square inches",
                )
            })
        })
        .collect::<ConfigResult<Vec<f64>>>()?;

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        let quantity = get_quantity_field(DISCOUNT_TABLE, &record, 0)?;

        let mut discounts = Vec::with_capacity(breakpoints.len());
        for (offset, &square_inches) in breakpoints.iter().enumerate() {
            let column = &headers[offset + 1];
            discounts.push(DiscountBreakpoint {
                square_inches,
                fraction: get_fraction_field(DISCOUNT_TABLE, &record, offset + 1, column)?,
            });
        }

        rows.push(QuantityDiscountRow {
            quantity,
            discounts,
        });
    }

    Ok(rows)
}

// =============================================================================
// Table Assembly
// =============================================================================

/// The pricing table shipped with the binary.
pub fn builtin_pricing_table() -> ConfigResult<PricingTable> {
    let base = parse_base_prices(BUILTIN_BASE_PRICES.as_bytes())?;
    let discounts = parse_quantity_discounts(BUILTIN_QUANTITY_DISCOUNTS.as_bytes())?;
    Ok(PricingTable::new(base, discounts)?)
}

fn read_base_prices(path: &Path) -> ConfigResult<Vec<BasePriceRow>> {
    info!(?path, "Loading base prices");
    parse_base_prices(File::open(path)?)
}

fn read_quantity_discounts(path: &Path) -> ConfigResult<Vec<QuantityDiscountRow>> {
    info!(?path, "Loading quantity discounts");
    parse_quantity_discounts(File::open(path)?)
}

/// Loads the pricing table named by `sources`.
///
/// A configured path that cannot be read or parsed is an error. Only a table
/// with no configured path uses the built-in data.
pub fn load_pricing_table(sources: &PricingSources) -> ConfigResult<PricingTable> {
    let base = match &sources.base_prices_csv {
        Some(path) => read_base_prices(path)?,
        None => {
            info!("No base price CSV configured, using built-in table");
            parse_base_prices(BUILTIN_BASE_PRICES.as_bytes())?
        }
    };

    let discounts = match &sources.quantity_discounts_csv {
        Some(path) => read_quantity_discounts(path)?,
        None => {
            info!("No quantity discount CSV configured, using built-in table");
            parse_quantity_discounts(BUILTIN_QUANTITY_DISCOUNTS.as_bytes())?
        }
    };

    Ok(PricingTable::new(base, discounts)?)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use sticker_core::CoreError;

    #[test]
    fn test_builtin_table_is_valid() {
        let table = builtin_pricing_table().unwrap();
        assert_eq!(table.base_prices().len(), 14);
        assert_eq!(
            table.quantity_tiers().collect::<Vec<_>>(),
            vec![1, 25, 50, 100, 200, 300, 500, 1000, 2500, 5000]
        );
        assert_eq!(table.lookup_base_price(9.0).unwrap(), 1.90);
        assert_eq!(table.lookup_discount(120, 9.0).unwrap(), 0.24);
    }

    #[test]
    fn test_parse_base_prices() {
        let csv = "square_inches,base_price\n1, 0.55\n4,1.20\n";
        let rows = parse_base_prices(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].square_inches, 1.0);
        assert_eq!(rows[0].base_price_per_sticker, 0.55);
    }

    #[test]
    fn test_parse_base_prices_rejects_blank_cell() {
        let csv = "square_inches,base_price\n1,0.55\n4,\n";
        let err = parse_base_prices(csv.as_bytes()).unwrap_err();
        match err {
            ConfigError::CsvField { line, column, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "base_price");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_parse_discounts_with_percentages() {
        let csv = "quantity,4,9\n1,0,0\n100,25%,0.2\n";
        let rows = parse_quantity_discounts(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].quantity, 100);
        assert_eq!(rows[1].discounts[0].square_inches, 4.0);
        assert_eq!(rows[1].discounts[0].fraction, 0.25);
        assert_eq!(rows[1].discounts[1].fraction, 0.2);
    }

    #[test]
    fn test_parse_discounts_rejects_bad_header() {
        let csv = "quantity,small,large\n1,0,0\n";
        assert!(matches!(
            parse_quantity_discounts(csv.as_bytes()),
            Err(ConfigError::CsvField { .. })
        ));
    }

    #[test]
    fn test_parse_discounts_rejects_short_row() {
        let csv = "quantity,4,9\n1,0,0\n50,0.1\n";
        assert!(parse_quantity_discounts(csv.as_bytes()).is_err());
    }

    #[test]
    fn test_load_from_files() {
        let mut base = tempfile::NamedTempFile::new().unwrap();
        writeln!(base, "square_inches,base_price\n4,1.00\n9,2.00").unwrap();
        let mut discounts = tempfile::NamedTempFile::new().unwrap();
        writeln!(discounts, "quantity,9\n1,0\n10,0.5").unwrap();

        let sources = PricingSources {
            base_prices_csv: Some(base.path().to_path_buf()),
            quantity_discounts_csv: Some(discounts.path().to_path_buf()),
        };
        let table = load_pricing_table(&sources).unwrap();
        assert_eq!(table.lookup_base_price(5.0).unwrap(), 2.00);
        assert_eq!(table.lookup_discount(12, 5.0).unwrap(), 0.5);
    }

    #[test]
    fn test_missing_configured_file_is_an_error() {
        let sources = PricingSources {
            base_prices_csv: Some("/definitely/not/here.csv".into()),
            quantity_discounts_csv: None,
        };
        assert!(matches!(
            load_pricing_table(&sources),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_malformed_table_surfaces_engine_error() {
        let mut base = tempfile::NamedTempFile::new().unwrap();
        writeln!(base, "square_inches,base_price\n9,2.00\n4,1.00").unwrap();

        let sources = PricingSources {
            base_prices_csv: Some(base.path().to_path_buf()),
            quantity_discounts_csv: None,
        };
        assert!(matches!(
            load_pricing_table(&sources),
            Err(ConfigError::Core(CoreError::PricingDataUnavailable { .. }))
        ));
    }
}
