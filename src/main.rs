//! logkit
//!
//! Builds a `LogConfig` from an optional TOML file plus command-line flags,
//! installs it as the process-wide log sink, and either emits one record per
//! level or keeps re-installing the sink as the config file changes.
//!
//! ```text
//! --config file ──▶ loader ──┐
//!                            ├─▶ LogConfig ──▶ init_logger ──▶ stdout | rotated file
//! --level/--output/... ──────┘        ▲
//!                                     │ (--watch)
//!                            watcher ─┘
//! ```

use std::path::PathBuf;

use clap::Parser;

use logkit::config::loader::{read_config, ConfigError};
use logkit::config::validation::validate_config;
use logkit::config::watcher::ConfigWatcher;
use logkit::config::{LogConfig, LogLevel, LogOutput};
use logkit::init_logger;

#[derive(Parser, Debug)]
#[command(name = "logkit")]
#[command(about = "Install a structured logger from a config file and flags", long_about = None)]
struct Cli {
    /// TOML file with a [log] table
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// debug, info, warn or error (anything else means info)
    #[arg(short, long)]
    level: Option<String>,

    /// "file" for the rotating file, anything else for the console
    #[arg(short, long)]
    output: Option<String>,

    /// Log file path
    #[arg(short, long)]
    file: Option<PathBuf>,

    /// Rotation threshold in megabytes
    #[arg(long)]
    max_size: Option<u32>,

    /// Days to keep rotated files
    #[arg(long)]
    max_age: Option<u32>,

    /// Gzip rotated files
    #[arg(long, overrides_with = "no_compress")]
    compress: bool,

    /// Keep rotated files uncompressed, even if the config file says otherwise
    #[arg(long, overrides_with = "compress")]
    no_compress: bool,

    /// Keep running and re-install the logger when the config file changes
    #[arg(short, long, requires = "config")]
    watch: bool,
}

impl Cli {
    /// Flags win over values from the file.
    fn apply_overrides(&self, mut config: LogConfig) -> LogConfig {
        if let Some(level) = &self.level {
            config.level = LogLevel::parse(level);
        }
        if let Some(output) = &self.output {
            config.output = LogOutput::parse(output);
        }
        if let Some(file) = &self.file {
            config.file_path = file.clone();
        }
        if let Some(max_size) = self.max_size {
            config.max_size = max_size;
        }
        if let Some(max_age) = self.max_age {
            config.max_age = max_age;
        }
        if self.compress {
            config.compress = true;
        }
        if self.no_compress {
            config.compress = false;
        }
        config
    }

    /// File values, then flags on top; only the merged result is validated.
    fn resolve(&self) -> Result<LogConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => read_config(path)?,
            None => LogConfig::default(),
        };
        let config = self.apply_overrides(base);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

fn emit_samples() {
    tracing::debug!(sample = 1, "debug record");
    tracing::info!(sample = 2, "info record");
    tracing::warn!(sample = 3, "warn record");
    tracing::error!(sample = 4, "error record");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = cli.resolve()?;

    init_logger(&config)?;

    tracing::info!(
        level = %config.level,
        output = %config.output,
        file_path = %config.file_path.display(),
        max_size_mb = config.max_size,
        max_age_days = config.max_age,
        compress = config.compress,
        "logkit v0.1.0 started"
    );

    if !cli.watch {
        emit_samples();
        return Ok(());
    }

    let Some(path) = cli.config.as_deref() else {
        return Ok(());
    };
    let (watcher, mut updates) = ConfigWatcher::new(path);
    let _watcher = watcher.run()?;

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(new_config) = updates.recv() => {
                let new_config = cli.apply_overrides(new_config);
                match init_logger(&new_config) {
                    Ok(()) => tracing::info!(
                        level = %new_config.level,
                        output = %new_config.output,
                        "Log config reloaded"
                    ),
                    Err(e) => tracing::error!("Failed to install reloaded log config: {}. Keeping current configuration.", e),
                }
            }
            _ = &mut shutdown => {
                tracing::info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}
