//! # Config Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Config Error Categories                            │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │   Filesystem    │  │    Parsing      │  │       Semantic          │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  Io             │  │  TomlParse      │  │  InvalidConfig          │ │
//! │  │                 │  │  Csv            │  │  UnknownMaterial        │ │
//! │  │                 │  │  CsvField       │  │  Core (engine rules)    │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sticker_core::CoreError;
use thiserror::Error;

/// Result type alias for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    // =========================================================================
    // Filesystem
    // =========================================================================
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // =========================================================================
    // Parsing
    // =========================================================================
    #[error("Invalid sticker.toml: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Failed to render config: {0}")]
    TomlRender(#[from] toml::ser::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A CSV cell is missing or not a number.
    #[error("{table} line {line}, column '{column}': {reason}")]
    CsvField {
        table: String,
        line: u64,
        column: String,
        reason: String,
    },

    // =========================================================================
    // Semantic
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Unknown material '{name}'. Configured: {}", available.join(", "))]
    UnknownMaterial {
        name: String,
        available: Vec<String>,
    },

    /// Engine rejected a configured value or table.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl From<sticker_core::ValidationError> for ConfigError {
    fn from(err: sticker_core::ValidationError) -> Self {
        ConfigError::Core(err.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_material_lists_options() {
        let err = ConfigError::UnknownMaterial {
            name: "gold".to_string(),
            available: vec!["glossy".to_string(), "matte".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Unknown material 'gold'. Configured: glossy, matte"
        );
    }

    #[test]
    fn test_core_error_is_transparent() {
        let err: ConfigError = CoreError::PricingDataUnavailable {
            reason: "base price table is empty".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Pricing data unavailable: base price table is empty"
        );
    }
}
