//! # Orders Configuration
//!
//! Settings that decide which optional data goes into a purchase unit.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     PPCP_LINE_ITEMS_ENABLED=false                                      │
//! │     PPCP_LINE_ITEM_MODE=l3                                             │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/ppcp/orders.toml (Linux)                                 │
//! │     ~/Library/Application Support/com.ppcp.orders/orders.toml (macOS)  │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     items + breakdown enabled, standard mode, unit "ITM"               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # orders.toml
//! [line_items]
//! enabled = true
//! breakdown_enabled = true
//! mode = "standard"        # standard | commercial (alias: l3)
//! unit_of_measure = "ITM"
//! ```

use ppcp_core::allocator::AllocatorSettings;
use ppcp_core::{LineItemMode, DEFAULT_UNIT_OF_MEASURE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::{OrdersError, OrdersResult};

const ENV_LINE_ITEMS_ENABLED: &str = "PPCP_LINE_ITEMS_ENABLED";
const ENV_BREAKDOWN_ENABLED: &str = "PPCP_BREAKDOWN_ENABLED";
const ENV_LINE_ITEM_MODE: &str = "PPCP_LINE_ITEM_MODE";
const ENV_UNIT_OF_MEASURE: &str = "PPCP_UNIT_OF_MEASURE";

// =============================================================================
// Line Item Settings
// =============================================================================

/// What to send alongside the order amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemSettings {
    /// Send the `items` array.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Send `amount.breakdown`. Items are never sent without it.
    #[serde(default = "default_true")]
    pub breakdown_enabled: bool,

    /// Standard or Level 3 item fields.
    #[serde(default)]
    pub mode: LineItemMode,

    /// Unit of measure for Level 3 items.
    #[serde(default = "default_unit_of_measure")]
    pub unit_of_measure: String,
}

fn default_true() -> bool {
    true
}

fn default_unit_of_measure() -> String {
    DEFAULT_UNIT_OF_MEASURE.to_string()
}

impl Default for LineItemSettings {
    fn default() -> Self {
        LineItemSettings {
            enabled: true,
            breakdown_enabled: true,
            mode: LineItemMode::default(),
            unit_of_measure: default_unit_of_measure(),
        }
    }
}

// =============================================================================
// Main Orders Configuration
// =============================================================================

/// Complete orders configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrdersConfig {
    #[serde(default)]
    pub line_items: LineItemSettings,
}

impl OrdersConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (orders.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> OrdersResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading orders config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load orders config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Parses a TOML file without applying overrides.
    pub fn from_file(path: &Path) -> OrdersResult<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| OrdersError::ConfigLoadFailed(format!("{}: {}", path.display(), e)))?;
        Ok(toml::from_str(&contents)?)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> OrdersResult<()> {
        let uom = &self.line_items.unit_of_measure;

        if uom.is_empty() {
            return Err(OrdersError::InvalidConfig(
                "unit_of_measure must not be empty".into(),
            ));
        }

        if uom.len() > 3 || !uom.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()) {
            return Err(OrdersError::InvalidConfig(format!(
                "unit_of_measure must be 1-3 upper-case characters, got: {}",
                uom
            )));
        }

        Ok(())
    }

    /// Applies overrides from a key lookup (the process environment in
    /// [`load`](Self::load)). Unparseable values are logged and skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_LINE_ITEMS_ENABLED) {
            match parse_flag(&value) {
                Some(flag) => {
                    debug!(enabled = flag, "Overriding line items flag from environment");
                    self.line_items.enabled = flag;
                }
                None => warn!(value = %value, "Ignoring invalid {}", ENV_LINE_ITEMS_ENABLED),
            }
        }

        if let Some(value) = lookup(ENV_BREAKDOWN_ENABLED) {
            match parse_flag(&value) {
                Some(flag) => self.line_items.breakdown_enabled = flag,
                None => warn!(value = %value, "Ignoring invalid {}", ENV_BREAKDOWN_ENABLED),
            }
        }

        if let Some(value) = lookup(ENV_LINE_ITEM_MODE) {
            match value.parse::<LineItemMode>() {
                Ok(mode) => {
                    debug!(mode = %mode, "Overriding line item mode from environment");
                    self.line_items.mode = mode;
                }
                Err(e) => warn!(error = %e, "Ignoring invalid {}", ENV_LINE_ITEM_MODE),
            }
        }

        if let Some(value) = lookup(ENV_UNIT_OF_MEASURE) {
            self.line_items.unit_of_measure = value.trim().to_uppercase();
        }
    }

    /// Settings handed to the allocator.
    pub fn allocator_settings(&self) -> AllocatorSettings {
        AllocatorSettings {
            mode: self.line_items.mode,
            unit_of_measure: self.line_items.unit_of_measure.clone(),
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "ppcp", "orders")
            .map(|dirs| dirs.config_dir().join("orders.toml"))
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = OrdersConfig::default();
        assert!(config.line_items.enabled);
        assert!(config.line_items.breakdown_enabled);
        assert_eq!(config.line_items.mode, LineItemMode::Standard);
        assert_eq!(config.line_items.unit_of_measure, "ITM");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_parsing() {
        let config: OrdersConfig = toml::from_str(
            r#"
            [line_items]
            enabled = false
            mode = "l3"
            unit_of_measure = "EA"
            "#,
        )
        .unwrap();

        assert!(!config.line_items.enabled);
        assert!(config.line_items.breakdown_enabled);
        assert_eq!(config.line_items.mode, LineItemMode::Commercial);
        assert_eq!(config.allocator_settings().unit_of_measure, "EA");
    }

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: OrdersConfig = toml::from_str("").unwrap();
        assert_eq!(config, OrdersConfig::default());
    }

    #[test]
    fn test_overrides() {
        let mut config = OrdersConfig::default();
        config.apply_overrides(lookup(&[
            ("PPCP_LINE_ITEMS_ENABLED", "off"),
            ("PPCP_LINE_ITEM_MODE", "commercial"),
            ("PPCP_UNIT_OF_MEASURE", "kgm"),
        ]));

        assert!(!config.line_items.enabled);
        assert!(config.line_items.breakdown_enabled);
        assert_eq!(config.line_items.mode, LineItemMode::Commercial);
        assert_eq!(config.line_items.unit_of_measure, "KGM");
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let mut config = OrdersConfig::default();
        config.apply_overrides(lookup(&[
            ("PPCP_BREAKDOWN_ENABLED", "maybe"),
            ("PPCP_LINE_ITEM_MODE", "level4"),
        ]));

        assert_eq!(config, OrdersConfig::default());
    }

    #[test]
    fn test_config_validation() {
        let mut config = OrdersConfig::default();

        config.line_items.unit_of_measure = String::new();
        assert!(config.validate().is_err());

        config.line_items.unit_of_measure = "PIECE".into();
        assert!(config.validate().is_err());

        config.line_items.unit_of_measure = "ea".into();
        assert!(config.validate().is_err());

        config.line_items.unit_of_measure = "C62".into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_toml_serialization() {
        let config = OrdersConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[line_items]"));
        assert!(toml_str.contains("mode = \"standard\""));
    }
}
