//! # Error Types
//!
//! Domain-specific error types for sticker-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  sticker-core errors (this file)                                       │
//! │  ├── CoreError        - Engine failures (one per calculation call)     │
//! │  └── ValidationError  - Field-level input validation failures          │
//! │                                                                         │
//! │  sticker-config errors (separate crate)                                │
//! │  └── ConfigError      - File, CSV, TOML and env loading failures       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ConfigError → CLI (anyhow)        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include the offending value in the message (width, field, etc.)
//! 3. Errors are enum variants, never String
//! 4. No partial results: a call returns a full result or exactly one error

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Pricing engine errors.
///
/// Every error is local to a single calculation call. None of them are
/// retryable: the engine is deterministic, so the caller must correct the
/// input and recompute.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// Width, height or quantity is zero, negative or not finite.
    #[error("Invalid dimensions: {field} = {value}")]
    InvalidDimensions { field: String, value: f64 },

    /// Not even one sticker fits across the usable roll width.
    ///
    /// ## When This Occurs
    /// ```text
    /// Roll 54" with 0.375" margins → usable 53.25"
    ///      │
    ///      ▼
    /// Sticker 60" wide
    ///      │
    ///      ▼
    /// floor((53.25 + 0.15) / (60 + 0.15)) = 0
    ///      │
    ///      ▼
    /// StickerTooWide { width: 60.0, usable_width: 53.25 }
    /// ```
    #[error("Sticker width {width}\" does not fit usable roll width {usable_width}\"")]
    StickerTooWide { width: f64, usable_width: f64 },

    /// Not even one row fits in a print section.
    #[error("Sticker height {height}\" does not fit section length {max_section_length}\"")]
    StickerTooTall {
        height: f64,
        max_section_length: f64,
    },

    /// Pricing table is missing or malformed.
    ///
    /// ## When This Occurs
    /// - Table has no rows
    /// - Rows are not sorted ascending
    /// - A discount row is missing a breakpoint column
    /// - A discount fraction is outside [0, 1) or drops as quantity grows
    ///
    /// This controls revenue, so it is never replaced by a silent default.
    #[error("Pricing data unavailable: {reason}")]
    PricingDataUnavailable { reason: String },

    /// A configured unit cost is not usable.
    #[error("Invalid unit cost: {field} = {value}")]
    InvalidUnitCost { field: String, value: f64 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    pub(crate) fn pricing(reason: impl Into<String>) -> Self {
        CoreError::PricingDataUnavailable {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for roll geometry and other configuration values that are checked
/// before any layout runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Value is NaN or infinite.
    #[error("{field} must be a finite number")]
    NotFinite { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: f64, max: f64 },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
