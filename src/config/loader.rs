//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::config::schema::LogConfig;
use crate::config::validation::{validate_config, DisplayErrors, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: {}", DisplayErrors(errors))
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// On-disk layout: logging settings live under a `[log]` table so the file
/// can carry other sections for the host application.
#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    log: LogConfig,
}

/// Parse a `LogConfig` from TOML text without validating it.
pub fn parse_config(content: &str) -> Result<LogConfig, ConfigError> {
    let file: ConfigFile = toml::from_str(content).map_err(ConfigError::Parse)?;
    Ok(file.log)
}

/// Read and parse a TOML file without validating it.
///
/// For callers that still merge other sources (CLI flags) into the result
/// and validate the merged config themselves.
pub fn read_config(path: &Path) -> Result<LogConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    parse_config(&content)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<LogConfig, ConfigError> {
    let config = read_config(path)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
