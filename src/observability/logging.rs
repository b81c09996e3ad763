//! Structured logging.
//!
//! # Responsibilities
//! - Map a `LogConfig` onto a `tracing` sink (threshold + encoder + writer)
//! - Hand out explicit `Logger` handles for callers that thread one through
//! - Install and replace the process-wide default sink
//!
//! # Design Decisions
//! - Text to stdout for the console, one JSON object per line for files
//! - The rotating file writer is only built when output is `file`
//! - The global default is a registry with a reloadable slot; it is
//!   installed once and every later `init_logger` swaps the slot, dropping
//!   the previous sink
//! - The threshold is composed in front of the encoder rather than used as
//!   a per-layer filter, since reloaded layers never get a filter id

use std::io;
use std::path::PathBuf;
use std::sync::OnceLock;

use thiserror::Error;
use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_subscriber::fmt::{self, MakeWriter};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{reload, Layer, Registry};

use crate::config::schema::{LogConfig, LogLevel, LogOutput};
use crate::config::validation::{validate_config, DisplayErrors, ValidationError};
use crate::observability::rotation::RotatingWriter;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;
type SinkHandle = reload::Handle<BoxedLayer, Registry>;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("invalid log config: {}", DisplayErrors(.0))]
    Invalid(Vec<ValidationError>),

    #[error("cannot open log file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to replace default log sink: {0}")]
    Reload(#[from] reload::Error),

    #[error("another global tracing subscriber is already installed")]
    AlreadyInstalled,
}

fn gated<L>(threshold: LevelFilter, layer: L) -> BoxedLayer
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    Box::new(<LevelFilter as Layer<Registry>>::and_then(threshold, layer))
}

fn build_layer<W>(config: &LogConfig, console: W) -> Result<BoxedLayer, LogError>
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    validate_config(config).map_err(LogError::Invalid)?;

    let threshold = config.level.as_level_filter();

    let layer = match config.output {
        LogOutput::Console => gated(
            threshold,
            fmt::layer().with_ansi(false).with_writer(console),
        ),
        LogOutput::File => {
            let writer = RotatingWriter::open(config).map_err(|source| LogError::Io {
                path: config.file_path.clone(),
                source,
            })?;
            gated(
                threshold,
                fmt::layer().json().with_ansi(false).with_writer(writer),
            )
        }
    };

    Ok(layer)
}

/// An explicitly constructed logger.
///
/// Holding a `Logger` does not affect the process-wide default; use
/// [`Logger::in_scope`] or [`Logger::set_thread_default`] to route records
/// through it, or [`init_logger`] to install a config globally.
#[derive(Clone, Debug)]
pub struct Logger {
    dispatch: Dispatch,
    level: LogLevel,
    output: LogOutput,
}

impl Logger {
    /// Build a logger whose console output goes to stdout.
    pub fn from_config(config: &LogConfig) -> Result<Self, LogError> {
        Self::with_console_writer(config, io::stdout)
    }

    /// Build a logger whose console output goes to `console` instead of
    /// stdout. File output is unaffected.
    pub fn with_console_writer<W>(config: &LogConfig, console: W) -> Result<Self, LogError>
    where
        W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
    {
        let layer = build_layer(config, console)?;

        Ok(Self {
            dispatch: Dispatch::new(tracing_subscriber::registry().with(layer)),
            level: config.level,
            output: config.output,
        })
    }

    pub fn dispatch(&self) -> &Dispatch {
        &self.dispatch
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn output(&self) -> LogOutput {
        self.output
    }

    /// Run `f` with this logger as the current thread's default.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    /// Make this logger the current thread's default until the guard drops.
    pub fn set_thread_default(&self) -> tracing::dispatcher::DefaultGuard {
        tracing::dispatcher::set_default(&self.dispatch)
    }
}

static DEFAULT_SINK: OnceLock<Option<SinkHandle>> = OnceLock::new();

fn install_default_sink() -> Option<SinkHandle> {
    let empty: BoxedLayer = Box::new(LevelFilter::OFF);
    let (slot, handle) = reload::Layer::new(empty);

    tracing_subscriber::registry()
        .with(slot)
        .try_init()
        .ok()
        .map(|()| handle)
}

/// Install `config` as the process-wide default log sink.
///
/// Replaces whatever an earlier call installed. Concurrent callers race and
/// the last swap wins; serialize calls if that matters.
pub fn init_logger(config: &LogConfig) -> Result<(), LogError> {
    let layer = build_layer(config, io::stdout)?;

    let handle = DEFAULT_SINK
        .get_or_init(install_default_sink)
        .as_ref()
        .ok_or(LogError::AlreadyInstalled)?;

    // Goes to the outgoing sink; the new one starts with the caller's records.
    tracing::debug!(
        level = %config.level,
        output = %config.output,
        "Replacing default log sink"
    );
    handle.reload(layer)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Captured {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for Captured {
        type Writer = Captured;

        fn make_writer(&'a self) -> Self::Writer {
            self.clone()
        }
    }

    fn console(level: &str) -> LogConfig {
        LogConfig {
            level: LogLevel::parse(level),
            output: LogOutput::Console,
            ..LogConfig::default()
        }
    }

    #[test]
    fn test_console_text_respects_threshold() {
        let sink = Captured::default();
        let logger = Logger::with_console_writer(&console("warn"), sink.clone()).unwrap();

        logger.in_scope(|| {
            tracing::debug!("debug-line");
            tracing::info!("info-line");
            tracing::warn!("warn-line");
            tracing::error!("error-line");
        });

        let out = sink.contents();
        assert!(!out.contains("debug-line"));
        assert!(!out.contains("info-line"));
        assert!(out.contains("WARN"));
        assert!(out.contains("warn-line"));
        assert!(out.contains("error-line"));
        assert!(!out.trim_start().starts_with('{'));
    }

    #[test]
    fn test_handle_reports_config() {
        let logger = Logger::with_console_writer(&console("bogus"), Captured::default()).unwrap();
        assert_eq!(logger.level(), LogLevel::Info);
        assert_eq!(logger.output(), LogOutput::Console);
    }

    #[test]
    fn test_thread_default_guard() {
        let sink = Captured::default();
        let logger = Logger::with_console_writer(&console("info"), sink.clone()).unwrap();

        {
            let _guard = logger.set_thread_default();
            tracing::info!("inside-guard");
        }
        tracing::info!("outside-guard");

        let out = sink.contents();
        assert!(out.contains("inside-guard"));
        assert!(!out.contains("outside-guard"));
    }

    #[test]
    fn test_file_output_without_path_is_invalid() {
        let config = LogConfig {
            output: LogOutput::File,
            ..LogConfig::default()
        };

        let err = Logger::from_config(&config).unwrap_err();
        assert!(matches!(err, LogError::Invalid(ref e) if e == &[ValidationError::MissingFilePath]));
        assert_eq!(
            err.to_string(),
            "invalid log config: file output selected but file_path is empty"
        );
    }

    #[test]
    fn test_file_output_unopenable_path_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let config = LogConfig {
            output: LogOutput::File,
            file_path: blocker.join("app.log"),
            ..LogConfig::default()
        };

        let err = Logger::from_config(&config).unwrap_err();
        assert!(matches!(err, LogError::Io { ref path, .. } if path == &config.file_path));
    }
}
