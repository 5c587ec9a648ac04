//! Configuration loading utilities

use crate::Config;
use calls_common::CallsError;
use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Environment variable pointing at a configuration file
pub const CONFIG_PATH_VAR: &str = "CALLS911_CONFIG_PATH";

/// Files probed in the working directory when no path is given
const DEFAULT_CONFIG_FILES: [&str; 2] = ["calls911.yaml", "calls911.yml"];

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error when reading configuration file
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML configuration: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// Configuration validation error
    #[error("Configuration validation failed: {0}")]
    ValidationError(#[from] validator::ValidationErrors),

    /// Environment variable parsing error
    #[error("Failed to parse environment variable '{var}': {source}")]
    EnvParseError {
        var: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl From<ConfigError> for CallsError {
    fn from(err: ConfigError) -> Self {
        CallsError::config(err.to_string())
    }
}

/// Configuration loader for the application
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from a YAML file with environment variable overrides
    pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        debug!("Read configuration from {}", path.as_ref().display());
        Self::load_from_str(&content, |var| env::var(var).ok())
    }

    /// Parse YAML, apply overrides from `lookup`, and validate
    pub fn load_from_str<F>(content: &str, lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: Config = if content.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(content)?
        };
        Self::apply_overrides(&mut config, lookup)?;
        config.validate_all()?;
        Ok(config)
    }

    /// Resolve the configuration source and load it
    ///
    /// An explicit path wins, then `CALLS911_CONFIG_PATH`, then
    /// `calls911.yaml`/`calls911.yml` in the working directory, then defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Config, ConfigError> {
        match Self::resolve_path(explicit) {
            Some(path) => {
                info!("Loading configuration from {}", path.display());
                Self::load_config(path)
            }
            None => {
                debug!("No configuration file found, using defaults");
                Self::load_from_str("", |var| env::var(var).ok())
            }
        }
    }

    fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = env::var(CONFIG_PATH_VAR) {
            return Some(PathBuf::from(path));
        }
        DEFAULT_CONFIG_FILES
            .iter()
            .map(PathBuf::from)
            .find(|candidate| candidate.exists())
    }

    /// Apply environment variable overrides to configuration
    fn apply_overrides<F>(config: &mut Config, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup("CALLS911_OUTPUT_DIR") {
            config.output.directory = dir;
        }

        if let Some(top_n) = lookup("CALLS911_TOP_N") {
            config.analysis.top_n = top_n.trim().parse().map_err(|e| ConfigError::EnvParseError {
                var: "CALLS911_TOP_N".to_string(),
                source: Box::new(e),
            })?;
        }

        if let Some(level) = lookup("CALLS911_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Some(export) = lookup("CALLS911_EXPORT_JSON") {
            config.output.export_json =
                export.trim().parse().map_err(|e| ConfigError::EnvParseError {
                    var: "CALLS911_EXPORT_JSON".to_string(),
                    source: Box::new(e),
                })?;
        }

        Ok(())
    }
}
