//! # Engine Settings
//!
//! Shop configuration consumed by the pricing engine.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STICKER_MATERIAL=matte                                             │
//! │     STICKER_ROLL_WIDTH_INCHES=38                                       │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/sticker-quote/sticker.toml (Linux)                       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     54" × 150' roll, built-in pricing tables                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # sticker.toml
//! default_material = "glossy"
//!
//! [roll]
//! roll_width_inches = 54.0
//! max_section_length_inches = 42.0
//!
//! [costs]
//! ink_cost_per_ml = 0.30
//! promotional_item_cost = 0.0
//!
//! [packaging]
//! mailer_max_quantity = 300
//! mailer_cost = 1.10
//! box_cost = 0.85
//!
//! [pricing]
//! base_prices_csv = "tables/base_prices.csv"   # relative to this file
//!
//! [[materials]]
//! name = "glossy"
//! vinyl_cost_per_roll = 250.0
//! laminate_cost_per_roll = 180.0
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use sticker_core::validation::{validate_roll, validate_unit_costs};
use sticker_core::{MaterialRollSpec, PackagingTiers, UnitCosts};
use tracing::{debug, info, warn};

use crate::error::{ConfigError, ConfigResult};

/// File name looked up in the platform config directory.
pub const CONFIG_FILE_NAME: &str = "sticker.toml";

// =============================================================================
// Cost Settings
// =============================================================================

/// Consumable costs that do not depend on the chosen material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostSettings {
    pub ink_cost_per_ml: f64,
    pub ink_ml_per_square_inch: f64,
    pub ink_overhead_multiplier: f64,
    pub promotional_item_cost: f64,
}

impl Default for CostSettings {
    fn default() -> Self {
        let defaults = UnitCosts::default();
        CostSettings {
            ink_cost_per_ml: defaults.ink_cost_per_ml,
            ink_ml_per_square_inch: defaults.ink_ml_per_square_inch,
            ink_overhead_multiplier: defaults.ink_overhead_multiplier,
            promotional_item_cost: defaults.promotional_item_cost,
        }
    }
}

// =============================================================================
// Pricing Sources
// =============================================================================

/// Where the pricing tables come from. `None` means the built-in table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingSources {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_prices_csv: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_discounts_csv: Option<PathBuf>,
}

impl PricingSources {
    /// Makes relative table paths relative to the config file's directory.
    fn resolve_relative_to(&mut self, base_dir: &Path) {
        for path in [&mut self.base_prices_csv, &mut self.quantity_discounts_csv]
            .into_iter()
            .flatten()
        {
            if path.is_relative() {
                *path = base_dir.join(&*path);
            }
        }
    }
}

// =============================================================================
// Material Profiles
// =============================================================================

/// A named vinyl + laminate combination and what one roll of each costs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialProfile {
    pub name: String,
    pub vinyl_cost_per_roll: f64,
    pub laminate_cost_per_roll: f64,
}

impl MaterialProfile {
    fn new(name: &str, vinyl_cost_per_roll: f64, laminate_cost_per_roll: f64) -> Self {
        MaterialProfile {
            name: name.to_string(),
            vinyl_cost_per_roll,
            laminate_cost_per_roll,
        }
    }
}

fn default_materials() -> Vec<MaterialProfile> {
    vec![
        MaterialProfile::new("glossy", 250.0, 180.0),
        MaterialProfile::new("matte", 265.0, 195.0),
        MaterialProfile::new("holographic", 420.0, 180.0),
        MaterialProfile::new("clear", 240.0, 180.0),
    ]
}

fn default_material_name() -> String {
    "glossy".to_string()
}

// =============================================================================
// Engine Config
// =============================================================================

/// Complete shop configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Material used when a request does not name one.
    #[serde(default = "default_material_name")]
    pub default_material: String,

    #[serde(default)]
    pub roll: MaterialRollSpec,

    #[serde(default)]
    pub costs: CostSettings,

    #[serde(default)]
    pub packaging: PackagingTiers,

    #[serde(default)]
    pub pricing: PricingSources,

    #[serde(default = "default_materials")]
    pub materials: Vec<MaterialProfile>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            default_material: default_material_name(),
            roll: MaterialRollSpec::default(),
            costs: CostSettings::default(),
            packaging: PackagingTiers::default(),
            pricing: PricingSources::default(),
            materials: default_materials(),
        }
    }
}

impl EngineConfig {
    // =========================================================================
    // Loading
    // =========================================================================

    /// Loads configuration from file and environment.
    ///
    /// An explicit `config_path` must exist. The default path is optional:
    /// when it is missing the built-in defaults are used.
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let explicit = config_path.is_some();
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading sticker config from file");
                config = Self::from_file(&path)?;
            } else if explicit {
                return Err(ConfigError::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("config file not found: {}", path.display()),
                )));
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Reads a TOML file, resolving table paths against its directory.
    pub fn from_file(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&contents)?;

        if let Some(dir) = path.parent() {
            config.pricing.resolve_relative_to(dir);
        }

        Ok(config)
    }

    /// Parses TOML text. Missing sections fall back to defaults.
    pub fn from_toml_str(contents: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Renders the configuration as TOML.
    pub fn to_toml_string(&self) -> ConfigResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Applies `STICKER_*` overrides read through `lookup`.
    ///
    /// Values that do not parse are logged and ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let number = |key: &str| -> Option<f64> {
            let raw = lookup(key)?;
            match raw.trim().parse::<f64>() {
                Ok(value) => {
                    debug!(key, value, "Overriding setting from environment");
                    Some(value)
                }
                Err(_) => {
                    warn!(key, value = %raw, "Ignoring non-numeric environment override");
                    None
                }
            }
        };

        if let Some(v) = number("STICKER_ROLL_WIDTH_INCHES") {
            self.roll.roll_width_inches = v;
        }
        if let Some(v) = number("STICKER_ROLL_LENGTH_FEET") {
            self.roll.roll_length_feet = v;
        }
        if let Some(v) = number("STICKER_MAX_SECTION_LENGTH_INCHES") {
            self.roll.max_section_length_inches = v;
        }
        if let Some(v) = number("STICKER_INK_COST_PER_ML") {
            self.costs.ink_cost_per_ml = v;
        }
        if let Some(v) = number("STICKER_PROMOTIONAL_ITEM_COST") {
            self.costs.promotional_item_cost = v;
        }

        if let Some(raw) = lookup("STICKER_MAILER_MAX_QUANTITY") {
            match raw.trim().parse::<u32>() {
                Ok(q) => self.packaging.mailer_max_quantity = q,
                Err(_) => warn!(value = %raw, "Ignoring invalid STICKER_MAILER_MAX_QUANTITY"),
            }
        }

        if let Some(name) = lookup("STICKER_MATERIAL") {
            debug!(material = %name, "Overriding default material from environment");
            self.default_material = name;
        }
        if let Some(path) = lookup("STICKER_BASE_PRICES_CSV") {
            self.pricing.base_prices_csv = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("STICKER_QUANTITY_DISCOUNTS_CSV") {
            self.pricing.quantity_discounts_csv = Some(PathBuf::from(path));
        }
    }

    /// Rejects configurations the engine could never price with.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_roll(&self.roll)?;

        if self.materials.is_empty() {
            return Err(ConfigError::InvalidConfig(
                "at least one [[materials]] entry is required".into(),
            ));
        }

        for (i, profile) in self.materials.iter().enumerate() {
            if profile.name.trim().is_empty() {
                return Err(ConfigError::InvalidConfig(format!(
                    "material #{} has an empty name",
                    i + 1
                )));
            }
            if self.materials[..i]
                .iter()
                .any(|p| p.name.eq_ignore_ascii_case(&profile.name))
            {
                return Err(ConfigError::InvalidConfig(format!(
                    "material '{}' is defined more than once",
                    profile.name
                )));
            }
        }

        // Resolves the default material and checks every cost with it.
        let costs = self.unit_costs(None)?;
        validate_unit_costs(&costs)?;

        for profile in &self.materials {
            validate_unit_costs(&self.costs_with(profile))?;
        }

        Ok(())
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Finds a material profile by name, ignoring ASCII case.
    pub fn material(&self, name: &str) -> ConfigResult<&MaterialProfile> {
        self.materials
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| ConfigError::UnknownMaterial {
                name: name.to_string(),
                available: self.materials.iter().map(|p| p.name.clone()).collect(),
            })
    }

    /// Builds engine unit costs for `material`, or the default material.
    pub fn unit_costs(&self, material: Option<&str>) -> ConfigResult<UnitCosts> {
        let name = material.unwrap_or(&self.default_material);
        let profile = self.material(name)?;
        Ok(self.costs_with(profile))
    }

    fn costs_with(&self, profile: &MaterialProfile) -> UnitCosts {
        UnitCosts {
            vinyl_cost_per_roll: profile.vinyl_cost_per_roll,
            laminate_cost_per_roll: profile.laminate_cost_per_roll,
            ink_cost_per_ml: self.costs.ink_cost_per_ml,
            ink_ml_per_square_inch: self.costs.ink_ml_per_square_inch,
            ink_overhead_multiplier: self.costs.ink_overhead_multiplier,
            packaging: self.packaging,
            promotional_item_cost: self.costs.promotional_item_cost,
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "stickerpress", "sticker-quote")
            .map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use sticker_core::CoreError;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = EngineConfig::default();
        config.validate().unwrap();

        let costs = config.unit_costs(None).unwrap();
        assert_eq!(costs, UnitCosts::default());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            default_material = "matte"

            [roll]
            roll_width_inches = 38.0

            [packaging]
            mailer_max_quantity = 150
            "#,
        )
        .unwrap();

        assert_eq!(config.roll.roll_width_inches, 38.0);
        assert_eq!(config.roll.max_section_length_inches, 42.0);
        assert_eq!(config.packaging.mailer_max_quantity, 150);
        assert_eq!(config.packaging.box_cost, 0.85);
        assert_eq!(config.materials.len(), 4);

        let costs = config.unit_costs(None).unwrap();
        assert_eq!(costs.vinyl_cost_per_roll, 265.0);
        assert_eq!(costs.packaging.mailer_max_quantity, 150);
    }

    #[test]
    fn test_materials_replace_defaults() {
        let config = EngineConfig::from_toml_str(
            r#"
            default_material = "kraft"

            [[materials]]
            name = "kraft"
            vinyl_cost_per_roll = 199.0
            laminate_cost_per_roll = 150.0
            "#,
        )
        .unwrap();

        config.validate().unwrap();
        assert_eq!(config.materials.len(), 1);
        assert!(config.material("glossy").is_err());
        assert_eq!(config.material("KRAFT").unwrap().vinyl_cost_per_roll, 199.0);
    }

    #[test]
    fn test_unknown_material() {
        let config = EngineConfig::default();
        match config.unit_costs(Some("gold")) {
            Err(ConfigError::UnknownMaterial { name, available }) => {
                assert_eq!(name, "gold");
                assert!(available.contains(&"holographic".to_string()));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_env_overrides() {
        let mut config = EngineConfig::default();
        config.apply_overrides(env(&[
            ("STICKER_ROLL_WIDTH_INCHES", "38"),
            ("STICKER_MATERIAL", "holographic"),
            ("STICKER_MAILER_MAX_QUANTITY", "200"),
            ("STICKER_BASE_PRICES_CSV", "/srv/prices.csv"),
        ]));

        assert_eq!(config.roll.roll_width_inches, 38.0);
        assert_eq!(config.default_material, "holographic");
        assert_eq!(config.packaging.mailer_max_quantity, 200);
        assert_eq!(
            config.pricing.base_prices_csv,
            Some(PathBuf::from("/srv/prices.csv"))
        );
        assert_eq!(config.unit_costs(None).unwrap().vinyl_cost_per_roll, 420.0);
    }

    #[test]
    fn test_bad_env_override_is_ignored() {
        let mut config = EngineConfig::default();
        config.apply_overrides(env(&[
            ("STICKER_ROLL_WIDTH_INCHES", "wide"),
            ("STICKER_MAILER_MAX_QUANTITY", "-5"),
        ]));
        assert_eq!(config.roll.roll_width_inches, 54.0);
        assert_eq!(config.packaging.mailer_max_quantity, 300);
    }

    #[test]
    fn test_validate_rejects_margins_wider_than_roll() {
        let mut config = EngineConfig::default();
        config.roll.margin_left_inches = 30.0;
        config.roll.margin_right_inches = 30.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Core(CoreError::Validation(_)))
        ));
    }

    #[test]
    fn test_validate_rejects_free_vinyl() {
        let mut config = EngineConfig::default();
        config.materials[1].vinyl_cost_per_roll = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Core(CoreError::InvalidUnitCost { .. }))
        ));
    }

    #[test]
    fn test_validate_rejects_duplicate_material() {
        let mut config = EngineConfig::default();
        config.materials.push(MaterialProfile::new("Glossy", 1.0, 1.0));
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_default_material() {
        let config = EngineConfig {
            default_material: "gold".into(),
            ..EngineConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::UnknownMaterial { .. })
        ));
    }

    #[test]
    fn test_load_resolves_relative_csv_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(
            &path,
            "[pricing]\nbase_prices_csv = \"tables/base.csv\"\nquantity_discounts_csv = \"/abs/discounts.csv\"\n",
        )
        .unwrap();

        let config = EngineConfig::from_file(&path).unwrap();
        assert_eq!(
            config.pricing.base_prices_csv,
            Some(dir.path().join("tables/base.csv"))
        );
        assert_eq!(
            config.pricing.quantity_discounts_csv,
            Some(PathBuf::from("/abs/discounts.csv"))
        );
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = EngineConfig::load(Some(dir.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_rejects_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[roll\nroll_width_inches = ").unwrap();
        assert!(matches!(
            EngineConfig::load(Some(path)),
            Err(ConfigError::TomlParse(_))
        ));
    }

    #[test]
    fn test_rendered_toml_reloads() {
        let config = EngineConfig::default();
        let text = config.to_toml_string().unwrap();
        assert!(text.contains("[[materials]]"));
        assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
    }
}
