//! Optional TOML configuration file.
//!
//! ```toml
//! province = "BC"
//! show_cents = true
//! log_level = "debug"
//! log_file = "lease-buyout.log"
//! rates_file = "provinces.csv"
//! ```
//!
//! Every key is optional. Command-line flags take precedence.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Province code used when none is given on the command line.
    pub province: Option<String>,
    /// Show cents in results.
    pub show_cents: bool,
    /// Log filter directive, e.g. `"debug"` or `"info,buyout_core=trace"`.
    pub log_level: Option<String>,
    /// File to append log output to.
    pub log_file: Option<PathBuf>,
    /// CSV of province rates replacing the built-in table.
    pub rates_file: Option<PathBuf>,
}

impl CalculatorConfig {
    pub fn from_toml_str(
        s: &str,
        path: &Path,
    ) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&contents, path)
    }
}
