//! # Roll Layout Module
//!
//! Works out how an order is printed on a roll and how much roll it uses.
//!
//! ## Why Sections?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  The press prints in passes of at most max_section_length_inches,      │
//! │  not the whole roll at once. Packing is 1-D twice:                      │
//! │                                                                         │
//! │    across the roll:  stickers_per_row = ⌊(usable + s) / (w + s)⌋        │
//! │    along a section:  rows_per_section = ⌊(max_len + s) / (h + s)⌋       │
//! │                                                                         │
//! │  Example: 3"×3", usable 53.25", s = 0.15", max 42"                     │
//! │    ⌊53.40 / 3.15⌋ = 16 per row                                          │
//! │    ⌊42.15 / 3.15⌋ = 13 rows per section → 208 per section               │
//! │                                                                         │
//! │  Roll used for 500 stickers:                                            │
//! │    [ full 40.8" ] gap [ full 40.8" ] gap [ final 18.75" ] trailing 12"  │
//! │                                                                         │
//! │  The trailing allowance is added ONCE per job, never per section.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::types::{LayoutResult, MaterialRollSpec, StickerSpec};
use crate::validation;
use crate::{FIT_EPSILON, INCHES_PER_FOOT};

/// How many items of pitch `item + spacing` fit in `available + spacing`.
///
/// The extra spacing on the numerator accounts for the last item needing no
/// trailing gap. `FIT_EPSILON` keeps an exact fit from rounding down.
fn fit_count(available: f64, item: f64, spacing: f64) -> u64 {
    ((available + spacing) / (item + spacing) + FIT_EPSILON).floor() as u64
}

/// Length of `rows` rows of stickers with spacing between them.
fn rows_length(rows: u64, height: f64, spacing: f64) -> f64 {
    if rows == 0 {
        return 0.0;
    }
    rows as f64 * height + (rows - 1) as f64 * spacing
}

/// Narrows a count for `LayoutResult`.
///
/// Only a sticker far smaller than anything printable can overflow; that is
/// reported against the offending count rather than clamped.
fn count_field(field: &str, value: u64) -> CoreResult<u32> {
    u32::try_from(value).map_err(|_| CoreError::InvalidDimensions {
        field: field.to_string(),
        value: value as f64,
    })
}

/// Plans the roll layout for one sticker order.
///
/// ## Errors
/// - `InvalidDimensions` for a non-positive size or zero quantity, or a
///   sticker so small that a count no longer fits in `u32`
/// - `Validation` for impossible roll geometry
/// - `StickerTooWide` / `StickerTooTall` when not even one sticker fits
///
/// ## Example
/// ```rust
/// use sticker_core::{layout::plan_layout, MaterialRollSpec, StickerSpec};
///
/// let spec = StickerSpec::new(3.0, 3.0, 100).unwrap();
/// let layout = plan_layout(&spec, &MaterialRollSpec::default()).unwrap();
///
/// assert_eq!(layout.stickers_per_row, 16);
/// assert_eq!(layout.rows_per_section, 13);
/// assert_eq!(layout.sections_needed, 1);
/// assert_eq!(layout.total_rows, 7);
/// ```
pub fn plan_layout(spec: &StickerSpec, roll: &MaterialRollSpec) -> CoreResult<LayoutResult> {
    validation::validate_sticker(spec)?;
    validation::validate_roll(roll)?;

    let spacing = roll.inter_sticker_spacing_inches;
    let usable_width = roll.usable_width_inches();

    let stickers_per_row = fit_count(usable_width, spec.width_inches, spacing);
    if stickers_per_row == 0 {
        return Err(CoreError::StickerTooWide {
            width: spec.width_inches,
            usable_width,
        });
    }

    let rows_per_section = fit_count(roll.max_section_length_inches, spec.height_inches, spacing);
    if rows_per_section == 0 {
        return Err(CoreError::StickerTooTall {
            height: spec.height_inches,
            max_section_length: roll.max_section_length_inches,
        });
    }

    let quantity = u64::from(spec.quantity);
    let stickers_per_section = stickers_per_row.saturating_mul(rows_per_section);

    let per_row_count = count_field("stickers_per_row", stickers_per_row)?;
    let rows_per_section_count = count_field("rows_per_section", rows_per_section)?;
    let per_section_count = count_field("stickers_per_section", stickers_per_section)?;
    let full_sections = quantity / stickers_per_section;
    let remainder = quantity % stickers_per_section;
    let total_rows = quantity.div_ceil(stickers_per_row);
    let sections_needed = full_sections + u64::from(remainder > 0);

    let full_section_length = rows_length(rows_per_section, spec.height_inches, spacing);
    let final_section_length = if remainder > 0 {
        rows_length(
            remainder.div_ceil(stickers_per_row),
            spec.height_inches,
            spacing,
        )
    } else {
        0.0
    };

    let number_of_gaps = sections_needed.saturating_sub(1);
    let base_length = full_sections as f64 * full_section_length
        + final_section_length
        + number_of_gaps as f64 * roll.inter_section_gap_inches;

    let total_length_inches = base_length + roll.trailing_allowance_inches;
    let total_length_feet = total_length_inches / INCHES_PER_FOOT;
    let rolls_needed = total_length_feet / roll.roll_length_feet;

    debug!(
        stickers_per_row,
        rows_per_section,
        sections_needed,
        total_length_inches,
        "Planned roll layout"
    );

    Ok(LayoutResult {
        stickers_per_row: per_row_count,
        rows_per_section: rows_per_section_count,
        stickers_per_section: per_section_count,
        total_rows: count_field("total_rows", total_rows)?,
        full_sections: count_field("full_sections", full_sections)?,
        sections_needed: count_field("sections_needed", sections_needed)?,
        total_length_inches,
        total_length_feet,
        rolls_needed,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
