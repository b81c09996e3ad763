//! Configuration schema definitions.
//!
//! This module defines the logging configuration value and its closed
//! enumerations. All types derive Serde traits for deserialization from
//! config files.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

/// Rotation threshold used when `max_size` is zero.
pub const DEFAULT_MAX_SIZE_MB: u32 = 100;

/// Logging configuration.
///
/// Built by the caller (by hand, from a TOML file, or from CLI flags) and
/// consumed by [`crate::observability::logging::init_logger`] or
/// [`crate::observability::logging::Logger::from_config`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct LogConfig {
    /// Severity threshold.
    pub level: LogLevel,

    /// Target of the rotating file writer. Only read when `output` is `file`.
    pub file_path: PathBuf,

    /// Rotation threshold in megabytes. Zero selects [`DEFAULT_MAX_SIZE_MB`].
    pub max_size: u32,

    /// Days to keep rotated backups. Zero keeps them forever.
    pub max_age: u32,

    /// Gzip rotated-out files.
    pub compress: bool,

    /// Backend selection.
    pub output: LogOutput,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            file_path: PathBuf::new(),
            max_size: DEFAULT_MAX_SIZE_MB,
            max_age: 0,
            compress: false,
            output: LogOutput::Console,
        }
    }
}

impl LogConfig {
    /// Rotation threshold in bytes, with the zero fallback applied.
    pub fn max_size_bytes(&self) -> usize {
        let mb = if self.max_size == 0 {
            DEFAULT_MAX_SIZE_MB
        } else {
            self.max_size
        };
        (mb as usize).saturating_mul(1024 * 1024)
    }
}

/// Severity threshold.
///
/// Parsing is total: anything other than the four exact lowercase names
/// becomes [`LogLevel::Info`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn parse(s: &str) -> Self {
        match s {
            "debug" => LogLevel::Debug,
            "info" => LogLevel::Info,
            "warn" => LogLevel::Warn,
            "error" => LogLevel::Error,
            _ => LogLevel::Info,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }

    /// The `tracing` filter admitting this level and everything more severe.
    pub fn as_level_filter(&self) -> LevelFilter {
        match self {
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl From<String> for LogLevel {
    fn from(s: String) -> Self {
        LogLevel::parse(&s)
    }
}

impl From<&str> for LogLevel {
    fn from(s: &str) -> Self {
        LogLevel::parse(s)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output backend.
///
/// Only the exact string `"file"` selects the rotating file; every other
/// value, the empty string included, selects the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize, Serialize)]
#[serde(from = "String", rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
}

impl LogOutput {
    pub fn parse(s: &str) -> Self {
        if s == "file" {
            LogOutput::File
        } else {
            LogOutput::Console
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LogOutput::Console => "console",
            LogOutput::File => "file",
        }
    }
}

impl From<String> for LogOutput {
    fn from(s: String) -> Self {
        LogOutput::parse(&s)
    }
}

impl From<&str> for LogOutput {
    fn from(s: &str) -> Self {
        LogOutput::parse(s)
    }
}

impl fmt::Display for LogOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
