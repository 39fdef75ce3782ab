//! # Validation Module
//!
//! Input checks that run before any layout or pricing arithmetic.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: sticker-config                                               │
//! │  ├── TOML / CSV parse errors                                           │
//! │  └── EngineConfig::validate() calls into THIS MODULE                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: every engine entry point                                     │
//! │  ├── validate_sticker      → InvalidDimensions                         │
//! │  ├── validate_roll         → Validation(..)                            │
//! │  └── validate_unit_costs   → InvalidUnitCost                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: PricingTable::new                                            │
//! │  └── malformed tables      → PricingDataUnavailable                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Struct fields are public, so the engine re-checks its inputs on every call
//! instead of trusting that a constructor ran.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::{MaterialRollSpec, StickerSpec, UnitCosts};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Sticker Validators
// =============================================================================

/// Validates one sticker dimension in inches.
///
/// ## Example
/// ```rust
/// use sticker_core::validation::validate_dimension;
///
/// assert!(validate_dimension("width_inches", 3.0).is_ok());
/// assert!(validate_dimension("width_inches", 0.0).is_err());
/// assert!(validate_dimension("width_inches", f64::NAN).is_err());
/// ```
pub fn validate_dimension(field: &str, value: f64) -> CoreResult<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(CoreError::InvalidDimensions {
            field: field.to_string(),
            value,
        });
    }
    Ok(())
}

/// Validates a sticker spec: positive finite size, quantity of at least one.
pub fn validate_sticker(spec: &StickerSpec) -> CoreResult<()> {
    validate_dimension("width_inches", spec.width_inches)?;
    validate_dimension("height_inches", spec.height_inches)?;

    if spec.quantity == 0 {
        return Err(CoreError::InvalidDimensions {
            field: "quantity".to_string(),
            value: 0.0,
        });
    }

    Ok(())
}

// =============================================================================
// Roll Validators
// =============================================================================

fn require_positive(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if value <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::NotFinite {
            field: field.to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates roll geometry.
///
/// ## Rules
/// - Width, length and max section length must be positive
/// - Margins, spacing, gap and trailing allowance must not be negative
/// - Usable width (width minus both margins) must be positive
pub fn validate_roll(roll: &MaterialRollSpec) -> ValidationResult<()> {
    require_positive("roll_width_inches", roll.roll_width_inches)?;
    require_positive("roll_length_feet", roll.roll_length_feet)?;
    require_positive("max_section_length_inches", roll.max_section_length_inches)?;
    require_non_negative("margin_left_inches", roll.margin_left_inches)?;
    require_non_negative("margin_right_inches", roll.margin_right_inches)?;
    require_non_negative(
        "inter_sticker_spacing_inches",
        roll.inter_sticker_spacing_inches,
    )?;
    require_non_negative("inter_section_gap_inches", roll.inter_section_gap_inches)?;
    require_non_negative("trailing_allowance_inches", roll.trailing_allowance_inches)?;

    if roll.usable_width_inches() <= 0.0 {
        return Err(ValidationError::MustBePositive {
            field: "usable roll width".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Cost Validators
// =============================================================================

fn unit_cost_error(field: &str, value: f64) -> CoreError {
    CoreError::InvalidUnitCost {
        field: field.to_string(),
        value,
    }
}

/// Validates unit costs.
///
/// ## Rules
/// - Per-roll vinyl and laminate costs must be positive
/// - Ink, packaging and promotional costs must be finite and not negative
pub fn validate_unit_costs(costs: &UnitCosts) -> CoreResult<()> {
    let per_roll = [
        ("vinyl_cost_per_roll", costs.vinyl_cost_per_roll),
        ("laminate_cost_per_roll", costs.laminate_cost_per_roll),
    ];
    for (field, value) in per_roll {
        if !value.is_finite() || value <= 0.0 {
            return Err(unit_cost_error(field, value));
        }
    }

    let non_negative = [
        ("ink_cost_per_ml", costs.ink_cost_per_ml),
        ("ink_ml_per_square_inch", costs.ink_ml_per_square_inch),
        ("ink_overhead_multiplier", costs.ink_overhead_multiplier),
        ("packaging.mailer_cost", costs.packaging.mailer_cost),
        ("packaging.box_cost", costs.packaging.box_cost),
        ("promotional_item_cost", costs.promotional_item_cost),
    ];
    for (field, value) in non_negative {
        if !value.is_finite() || value < 0.0 {
            return Err(unit_cost_error(field, value));
        }
    }

    Ok(())
}

// =============================================================================
// Pricing Validators
// =============================================================================

/// Validates a discount fraction: finite and in [0, 1).
pub fn validate_discount_fraction(fraction: f64) -> ValidationResult<()> {
    if !fraction.is_finite() || !(0.0..1.0).contains(&fraction) {
        return Err(ValidationError::OutOfRange {
            field: "discount fraction".to_string(),
            min: 0.0,
            max: 1.0,
        });
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
