//! # Pricing Module
//!
//! Customer-facing price from the two lookup tables.
//!
//! ## Lookup Policy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  BASE PRICE: ceiling to the next tabulated area                        │
//! │                                                                         │
//! │    rows: 4 sq in → $1.20   9 sq in → $1.90   16 sq in → $2.80          │
//! │    7.5 sq in  ──► 9 sq in row ──► $1.90   (never undercharge)          │
//! │    above the last row ──► last row's $/sq in × area                    │
//! │                                                                         │
//! │  DISCOUNT: floor to the quantity tier at or below the order            │
//! │                                                                         │
//! │    tiers: 1, 50, 100, 200 ...                                           │
//! │    120 units ──► tier 100 (not 200)                                    │
//! │    column: same ceiling rule on area, last column above the top        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Tables are validated once in [`PricingTable::new`]; a `PricingTable`
//! value is always well-formed, so lookups only fail on bad inputs.

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{PriceQuote, StickerSpec};
use crate::validation;
use crate::AREA_EPSILON;

// =============================================================================
// Table Rows
// =============================================================================

/// List price of one sticker of a given area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BasePriceRow {
    pub square_inches: f64,
    pub base_price_per_sticker: f64,
}

/// Discount for one area column within a quantity tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountBreakpoint {
    pub square_inches: f64,
    pub fraction: f64,
}

/// One quantity tier of the discount table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuantityDiscountRow {
    pub quantity: u32,
    pub discounts: Vec<DiscountBreakpoint>,
}

// =============================================================================
// Pricing Table
// =============================================================================

/// Validated base-price and quantity-discount tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PricingTableData")]
pub struct PricingTable {
    base_prices: Vec<BasePriceRow>,
    discounts: Vec<QuantityDiscountRow>,
}

/// Unchecked wire shape of [`PricingTable`].
#[derive(Debug, Deserialize)]
struct PricingTableData {
    base_prices: Vec<BasePriceRow>,
    discounts: Vec<QuantityDiscountRow>,
}

impl TryFrom<PricingTableData> for PricingTable {
    type Error = CoreError;

    fn try_from(data: PricingTableData) -> CoreResult<Self> {
        PricingTable::new(data.base_prices, data.discounts)
    }
}

impl PricingTable {
    /// Builds a table, rejecting anything malformed.
    ///
    /// ## Rules
    /// - Both tables are non-empty
    /// - Base rows strictly ascending by area, prices positive
    /// - Quantity tiers strictly ascending, each at least 1
    /// - Every tier has the same ascending area breakpoints
    /// - Fractions in [0, 1), never dropping as quantity grows
    pub fn new(
        base_prices: Vec<BasePriceRow>,
        discounts: Vec<QuantityDiscountRow>,
    ) -> CoreResult<Self> {
        validate_base_prices(&base_prices)?;
        validate_discounts(&discounts)?;
        Ok(PricingTable {
            base_prices,
            discounts,
        })
    }

    pub fn base_prices(&self) -> &[BasePriceRow] {
        &self.base_prices
    }

    pub fn discounts(&self) -> &[QuantityDiscountRow] {
        &self.discounts
    }

    /// Tabulated quantity tiers, ascending.
    pub fn quantity_tiers(&self) -> impl Iterator<Item = u32> + '_ {
        self.discounts.iter().map(|row| row.quantity)
    }

    /// Base price for one sticker of `square_inches` area.
    ///
    /// ## Example
    /// ```rust
    /// use sticker_core::pricing::{BasePriceRow, DiscountBreakpoint, PricingTable, QuantityDiscountRow};
    ///
    /// let table = PricingTable::new(
    ///     vec![
    ///         BasePriceRow { square_inches: 4.0, base_price_per_sticker: 1.20 },
    ///         BasePriceRow { square_inches: 9.0, base_price_per_sticker: 1.90 },
    ///     ],
    ///     vec![QuantityDiscountRow {
    ///         quantity: 1,
    ///         discounts: vec![DiscountBreakpoint { square_inches: 9.0, fraction: 0.0 }],
    ///     }],
    /// )
    /// .unwrap();
    ///
    /// assert_eq!(table.lookup_base_price(4.0).unwrap(), 1.20);
    /// assert_eq!(table.lookup_base_price(5.0).unwrap(), 1.90); // ceiling
    /// ```
    pub fn lookup_base_price(&self, square_inches: f64) -> CoreResult<f64> {
        validation::validate_dimension("square_inches", square_inches)?;

        if let Some(row) = self
            .base_prices
            .iter()
            .find(|row| row.square_inches + AREA_EPSILON >= square_inches)
        {
            return Ok(row.base_price_per_sticker);
        }

        // Larger than anything tabulated: scale the top row's rate
        let last = self
            .base_prices
            .last()
            .ok_or_else(|| CoreError::pricing("base price table is empty"))?;
        Ok(last.base_price_per_sticker / last.square_inches * square_inches)
    }

    /// Discount fraction for `quantity` stickers of `square_inches` area.
    pub fn lookup_discount(&self, quantity: u32, square_inches: f64) -> CoreResult<f64> {
        validation::validate_dimension("square_inches", square_inches)?;
        if quantity == 0 {
            return Err(CoreError::InvalidDimensions {
                field: "quantity".to_string(),
                value: 0.0,
            });
        }

        let row = self
            .discounts
            .iter()
            .rev()
            .find(|row| row.quantity <= quantity)
            .or_else(|| self.discounts.first())
            .ok_or_else(|| CoreError::pricing("quantity discount table is empty"))?;

        let cell = row
            .discounts
            .iter()
            .find(|cell| cell.square_inches + AREA_EPSILON >= square_inches)
            .or_else(|| row.discounts.last())
            .ok_or_else(|| {
                CoreError::pricing(format!("quantity tier {} has no columns", row.quantity))
            })?;

        Ok(cell.fraction)
    }
}

fn validate_base_prices(rows: &[BasePriceRow]) -> CoreResult<()> {
    if rows.is_empty() {
        return Err(CoreError::pricing("base price table is empty"));
    }

    for row in rows {
        if !row.square_inches.is_finite() || row.square_inches <= 0.0 {
            return Err(CoreError::pricing(format!(
                "base price row has invalid area {}",
                row.square_inches
            )));
        }
        if !row.base_price_per_sticker.is_finite() || row.base_price_per_sticker <= 0.0 {
            return Err(CoreError::pricing(format!(
                "base price for {} sq in must be positive, got {}",
                row.square_inches, row.base_price_per_sticker
            )));
        }
    }

    if let Some(pair) = rows
        .windows(2)
        .find(|pair| pair[1].square_inches <= pair[0].square_inches)
    {
        return Err(CoreError::pricing(format!(
            "base price rows not ascending: {} sq in follows {} sq in",
            pair[1].square_inches, pair[0].square_inches
        )));
    }

    Ok(())
}

fn validate_discounts(rows: &[QuantityDiscountRow]) -> CoreResult<()> {
    let first = rows
        .first()
        .ok_or_else(|| CoreError::pricing("quantity discount table is empty"))?;

    if first.discounts.is_empty() {
        return Err(CoreError::pricing(
            "quantity discount table has no area columns",
        ));
    }
    for cell in &first.discounts {
        if !cell.square_inches.is_finite() || cell.square_inches <= 0.0 {
            return Err(CoreError::pricing(format!(
                "discount column has invalid area {}",
                cell.square_inches
            )));
        }
    }
    if first
        .discounts
        .windows(2)
        .any(|pair| pair[1].square_inches <= pair[0].square_inches)
    {
        return Err(CoreError::pricing("discount columns not ascending by area"));
    }

    for row in rows {
        if row.quantity == 0 {
            return Err(CoreError::pricing("quantity tier 0 is not allowed"));
        }

        let same_columns = row.discounts.len() == first.discounts.len()
            && row
                .discounts
                .iter()
                .zip(&first.discounts)
                .all(|(a, b)| a.square_inches == b.square_inches);
        if !same_columns {
            return Err(CoreError::pricing(format!(
                "quantity tier {} has missing or extra area columns",
                row.quantity
            )));
        }

        for cell in &row.discounts {
            validation::validate_discount_fraction(cell.fraction).map_err(|_| {
                CoreError::pricing(format!(
                    "discount {} at tier {} / {} sq in is outside [0, 1)",
                    cell.fraction, row.quantity, cell.square_inches
                ))
            })?;
        }
    }

    for pair in rows.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        if upper.quantity <= lower.quantity {
            return Err(CoreError::pricing(format!(
                "quantity tiers not ascending: {} follows {}",
                upper.quantity, lower.quantity
            )));
        }
        for (low, high) in lower.discounts.iter().zip(&upper.discounts) {
            if high.fraction < low.fraction {
                return Err(CoreError::pricing(format!(
                    "discount drops from {} to {} between tiers {} and {} at {} sq in",
                    low.fraction, high.fraction, lower.quantity, upper.quantity, low.square_inches
                )));
            }
        }
    }

    Ok(())
}

// =============================================================================
// Quote
// =============================================================================

/// Quotes one sticker order.
///
/// ## Formula
/// ```text
/// square_inches           = width × height
/// base_price_per_sticker  = lookup_base_price(square_inches)
/// discount_fraction       = lookup_discount(quantity, square_inches)
/// final_price_per_sticker = base × (1 − discount)
/// total_price             = final × quantity
/// ```
pub fn quote(spec: &StickerSpec, table: &PricingTable) -> CoreResult<PriceQuote> {
    validation::validate_sticker(spec)?;

    let square_inches = spec.square_inches();
    let base_price_per_sticker = table.lookup_base_price(square_inches)?;
    let discount_fraction = table.lookup_discount(spec.quantity, square_inches)?;
    let final_price_per_sticker = base_price_per_sticker * (1.0 - discount_fraction);
    let total_price = final_price_per_sticker * spec.quantity as f64;

    debug!(
        square_inches,
        quantity = spec.quantity,
        base_price_per_sticker,
        discount_fraction,
        total_price,
        "Quoted sticker order"
    );

    Ok(PriceQuote {
        quantity: spec.quantity,
        square_inches,
        base_price_per_sticker,
        discount_fraction,
        final_price_per_sticker,
        total_price,
    })
}

/// Quote for one tabulated quantity tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PriceBreak {
    pub quantity: u32,
    pub quote: PriceQuote,
}

/// Quotes one sticker size at every tabulated quantity tier.
///
/// This is the quantity-option list a product page shows.
pub fn price_breaks(
    width_inches: f64,
    height_inches: f64,
    table: &PricingTable,
) -> CoreResult<Vec<PriceBreak>> {
    table
        .quantity_tiers()
        .map(|quantity| -> CoreResult<PriceBreak> {
            let spec = StickerSpec::new(width_inches, height_inches, quantity)?;
            Ok(PriceBreak {
                quantity,
                quote: quote(&spec, table)?,
            })
        })
        .collect()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn base(square_inches: f64, price: f64) -> BasePriceRow {
        BasePriceRow {
            square_inches,
            base_price_per_sticker: price,
        }
    }

    fn tier(quantity: u32, fractions: &[f64]) -> QuantityDiscountRow {
        let columns = [4.0, 9.0, 16.0];
        QuantityDiscountRow {
            quantity,
            discounts: columns
                .iter()
                .zip(fractions)
                .map(|(&square_inches, &fraction)| DiscountBreakpoint {
                    square_inches,
                    fraction,
                })
                .collect(),
        }
    }

    fn sample_table() -> PricingTable {
        PricingTable::new(
            vec![base(4.0, 1.20), base(9.0, 1.90), base(16.0, 2.80)],
            vec![
                tier(1, &[0.0, 0.0, 0.0]),
                tier(50, &[0.10, 0.10, 0.08]),
                tier(100, &[0.20, 0.18, 0.15]),
                tier(200, &[0.30, 0.28, 0.25]),
            ],
        )
        .unwrap()
    }

    #[test]
    fn test_base_price_exact_and_ceiling() {
        let table = sample_table();
        assert_eq!(table.lookup_base_price(4.0).unwrap(), 1.20);
        assert_eq!(table.lookup_base_price(1.0).unwrap(), 1.20);
        assert_eq!(table.lookup_base_price(4.01).unwrap(), 1.90);
        assert_eq!(table.lookup_base_price(9.0).unwrap(), 1.90);
        // Float noise just above a breakpoint stays on that row
        assert_eq!(table.lookup_base_price(9.0 + 1e-12).unwrap(), 1.90);
    }

    #[test]
    fn test_base_price_above_table_scales_top_rate() {
        let table = sample_table();
        let price = table.lookup_base_price(32.0).unwrap();
        assert!((price - 5.60).abs() < 1e-9);
    }

    #[test]
    fn test_discount_floors_to_lower_tier() {
        let table = sample_table();
        assert_eq!(table.lookup_discount(120, 9.0).unwrap(), 0.18);
        assert_eq!(table.lookup_discount(100, 9.0).unwrap(), 0.18);
        assert_eq!(table.lookup_discount(199, 16.0).unwrap(), 0.15);
        assert_eq!(table.lookup_discount(10_000, 4.0).unwrap(), 0.30);
    }

    #[test]
    fn test_discount_column_selection() {
        let table = sample_table();
        assert_eq!(table.lookup_discount(100, 2.0).unwrap(), 0.20);
        assert_eq!(table.lookup_discount(100, 5.0).unwrap(), 0.18);
        assert_eq!(table.lookup_discount(100, 100.0).unwrap(), 0.15);
    }

    #[test]
    fn test_quantity_below_smallest_tier() {
        let table = PricingTable::new(
            vec![base(4.0, 1.0)],
            vec![tier(50, &[0.05, 0.05, 0.05]), tier(100, &[0.1, 0.1, 0.1])],
        )
        .unwrap();
        assert_eq!(table.lookup_discount(10, 4.0).unwrap(), 0.05);
    }

    #[test]
    fn test_empty_tables_rejected() {
        let err = PricingTable::new(vec![], vec![tier(1, &[0.0, 0.0, 0.0])]).unwrap_err();
        assert!(matches!(err, CoreError::PricingDataUnavailable { .. }));

        let err = PricingTable::new(vec![base(4.0, 1.0)], vec![]).unwrap_err();
        assert!(matches!(err, CoreError::PricingDataUnavailable { .. }));
    }

    #[test]
    fn test_malformed_tables_rejected() {
        let unsorted = PricingTable::new(
            vec![base(9.0, 1.9), base(4.0, 1.2)],
            vec![tier(1, &[0.0, 0.0, 0.0])],
        );
        assert!(unsorted.is_err());

        let missing_column = PricingTable::new(
            vec![base(4.0, 1.2)],
            vec![tier(1, &[0.0, 0.0, 0.0]), tier(50, &[0.1, 0.1])],
        );
        assert!(missing_column.is_err());

        let inverted = PricingTable::new(
            vec![base(4.0, 1.2)],
            vec![tier(1, &[0.0, 0.2, 0.0]), tier(50, &[0.1, 0.1, 0.1])],
        );
        assert!(inverted.is_err());

        let full_discount = PricingTable::new(
            vec![base(4.0, 1.2)],
            vec![tier(1, &[0.0, 0.0, 1.0])],
        );
        assert!(full_discount.is_err());

        let zero_price = PricingTable::new(vec![base(4.0, 0.0)], vec![tier(1, &[0.0, 0.0, 0.0])]);
        assert!(zero_price.is_err());

        let duplicate_tier = PricingTable::new(
            vec![base(4.0, 1.2)],
            vec![tier(50, &[0.1, 0.1, 0.1]), tier(50, &[0.1, 0.1, 0.1])],
        );
        assert!(duplicate_tier.is_err());
    }

    #[test]
    fn test_quote() {
        let table = sample_table();
        let spec = StickerSpec::new(3.0, 3.0, 120).unwrap();
        let q = quote(&spec, &table).unwrap();

        assert_eq!(q.square_inches, 9.0);
        assert_eq!(q.base_price_per_sticker, 1.90);
        assert_eq!(q.discount_fraction, 0.18);
        assert!((q.final_price_per_sticker - 1.558).abs() < 1e-9);
        assert!((q.total_price - 186.96).abs() < 1e-9);
    }

    #[test]
    fn test_quote_rejects_bad_dimensions() {
        let table = sample_table();
        let spec = StickerSpec {
            width_inches: 0.0,
            height_inches: 3.0,
            quantity: 10,
        };
        assert!(matches!(
            quote(&spec, &table),
            Err(CoreError::InvalidDimensions { .. })
        ));
    }

    #[test]
    fn test_price_breaks() {
        let table = sample_table();
        let breaks = price_breaks(3.0, 3.0, &table).unwrap();

        let quantities: Vec<u32> = breaks.iter().map(|b| b.quantity).collect();
        assert_eq!(quantities, vec![1, 50, 100, 200]);
        assert!(breaks
            .windows(2)
            .all(|w| w[1].quote.final_price_per_sticker <= w[0].quote.final_price_per_sticker));
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"{
            "base_prices": [{ "square_inches": 4.0, "base_price_per_sticker": 1.2 }],
            "discounts": []
        }"#;
        assert!(serde_json::from_str::<PricingTable>(json).is_err());

        let json = r#"{
            "base_prices": [{ "square_inches": 4.0, "base_price_per_sticker": 1.2 }],
            "discounts": [{ "quantity": 1, "discounts": [{ "square_inches": 4.0, "fraction": 0.0 }] }]
        }"#;
        let table: PricingTable = serde_json::from_str(json).unwrap();
        assert_eq!(table.quantity_tiers().collect::<Vec<_>>(), vec![1]);
    }

    proptest! {
        #[test]
        fn prop_discount_never_exceeds_lower_tier(
            quantity in 1u32..20_000,
            area in 0.1f64..200.0,
        ) {
            let table = sample_table();
            let discount = table.lookup_discount(quantity, area).unwrap();
            prop_assert!((0.0..1.0).contains(&discount));

            // Any larger order gets at least this discount
            let more = table.lookup_discount(quantity.saturating_add(37), area).unwrap();
            prop_assert!(more >= discount);
        }

        #[test]
        fn prop_quote_is_deterministic(
            width in 0.5f64..20.0,
            height in 0.5f64..20.0,
            quantity in 1u32..5_000,
        ) {
            let table = sample_table();
            let spec = StickerSpec::new(width, height, quantity).unwrap();
            let a = quote(&spec, &table).unwrap();
            let b = quote(&spec, &table).unwrap();
            prop_assert_eq!(a.total_price.to_bits(), b.total_price.to_bits());
            prop_assert!(a.total_price > 0.0);
        }
    }
}
