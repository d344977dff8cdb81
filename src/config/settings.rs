//! Application settings loading from config.toml
//!
//! The settings file is optional. Its path comes from `PRICECALC_CONFIG`
//! (which may be set in `.env`) and defaults to `./config.toml`; when the
//! default file does not exist the built-in defaults are used.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Environment variable naming the settings file
pub const CONFIG_ENV_VAR: &str = "PRICECALC_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Which page a snapshot belongs to
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    /// The product recipe editor
    #[default]
    ProductEdit,
    /// The ingredient price list
    Ingredients,
}

impl std::str::FromStr for PageKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value {
            "product_edit" | "product" => Ok(Self::ProductEdit),
            "ingredients" => Ok(Self::Ingredients),
            other => Err(Error::Config {
                message: format!("Unknown page '{other}', expected 'product_edit' or 'ingredients'"),
            }),
        }
    }
}

/// Snapshot to load when none is given on the command line
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SnapshotSettings {
    /// Page the snapshot is for
    #[serde(default)]
    pub page: PageKind,
    /// Path of the snapshot JSON file
    pub path: Option<PathBuf>,
}

/// Structure of the whole config.toml file
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Tracing filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Default snapshot
    #[serde(default)]
    pub snapshot: SnapshotSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            snapshot: SnapshotSettings::default(),
        }
    }
}

fn default_log_filter() -> String {
    "info".to_string()
}

/// Loads settings from a TOML file.
///
/// # Errors
/// Returns an error if the file cannot be read or its TOML is invalid.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load settings from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;

    parse_settings(&contents)
}

/// Parses settings from TOML text.
///
/// # Errors
/// Returns an error if the TOML is invalid.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })
}

/// Loads settings from `PRICECALC_CONFIG`, or from `./config.toml` if that
/// file exists, or falls back to defaults.
///
/// # Errors
/// Returns an error if an explicitly configured file is missing or any
/// settings file is invalid.
pub fn load_app_settings() -> Result<Settings> {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) => load_settings(path),
        Err(std::env::VarError::NotPresent) => {
            if Path::new(DEFAULT_CONFIG_PATH).exists() {
                load_settings(DEFAULT_CONFIG_PATH)
            } else {
                tracing::debug!("No {} found, using default settings", DEFAULT_CONFIG_PATH);
                Ok(Settings::default())
            }
        }
        Err(e) => Err(Error::EnvVar(e)),
    }
}
