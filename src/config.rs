/// Optional JSON configuration
///
/// Every key is optional; command-line flags take precedence over the file.

use std::path::{Path, PathBuf};

use log::{error, info};
use serde::Deserialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Explicit location of sigcheck
    pub sigcheck_path: Option<PathBuf>,
    /// Extra arguments passed to sigcheck before `-nobanner`
    pub tool_args: Vec<String>,
    /// Worker count (1 = serial, 0 = auto)
    pub parallel: Option<usize>,
    /// Single ASCII character used to separate exported columns
    pub delimiter: Option<char>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    pub max_files: Option<usize>,
}

/// Load configuration from `config_path` if provided.
///
/// A missing file or invalid JSON is logged and yields the defaults.
pub fn load_config(config_path: Option<&Path>) -> Config {
    let Some(path) = config_path else {
        return Config::default();
    };

    if !path.exists() {
        error!("Configuration file not found: {}", path.display());
        return Config::default();
    }

    let config_str = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            error!("Cannot read configuration file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&config_str) {
        Ok(config) => {
            info!("Loaded configuration from {}", path.display());
            config
        }
        Err(e) => {
            error!("Invalid JSON in configuration file: {}", e);
            Config::default()
        }
    }
}
