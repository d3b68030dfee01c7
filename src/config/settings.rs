//! Reconciliation settings loading from config.toml
//!
//! Operators can tune how the derived views are reported without touching code.
//! Every field has a default, so a missing file or a missing section simply
//! yields the standard behavior.

use crate::core::{deadline::DEFAULT_WARNING_DAYS, stock::StockVisibility};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{info, warn};

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_VAR: &str = "PRODUCTION_BUDDY_CONFIG";

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Stock ledger reporting
    pub stock: StockSettings,
    /// Delivery-status classification
    pub deadlines: DeadlineSettings,
}

/// `[stock]` section
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct StockSettings {
    /// Also list parts whose netted stock is negative (over-shipped)
    pub show_deficits: bool,
}

impl StockSettings {
    /// Visibility policy implied by these settings.
    #[must_use]
    pub const fn visibility(self) -> StockVisibility {
        if self.show_deficits {
            StockVisibility::IncludeDeficits
        } else {
            StockVisibility::PositiveOnly
        }
    }
}

/// `[deadlines]` section
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeadlineSettings {
    /// Days before the expected date at which an open order counts as approaching
    pub warning_days: i64,
}

impl Default for DeadlineSettings {
    fn default() -> Self {
        Self {
            warning_days: DEFAULT_WARNING_DAYS,
        }
    }
}

/// Loads settings from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read, the TOML syntax is invalid,
/// or `warning_days` is negative.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;
    parse_config(&contents)
}

/// Parses settings from TOML text.
pub fn parse_config(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if settings.deadlines.warning_days < 0 {
        return Err(Error::Config {
            message: format!(
                "deadlines.warning_days must not be negative (got {})",
                settings.deadlines.warning_days
            ),
        });
    }

    Ok(settings)
}

/// Loads settings from `$PRODUCTION_BUDDY_CONFIG` or `./config.toml`.
///
/// A missing file is not an error: defaults are used instead.
pub fn load_default_config() -> Result<Settings> {
    let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| "config.toml".to_string());
    if Path::new(&path).exists() {
        let settings = load_config(&path)?;
        info!("Loaded settings from {path}");
        Ok(settings)
    } else {
        warn!("No config file at {path}; using default settings");
        Ok(Settings::default())
    }
}
