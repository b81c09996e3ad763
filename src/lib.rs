//! Process-wide structured logging setup.
//!
//! Turns a small [`LogConfig`] into a `tracing` sink: plain text on stdout,
//! or JSON lines in a size/age rotated file. The sink is either returned as
//! an explicit [`Logger`] or installed as the process default with
//! [`init_logger`].

pub mod config;
pub mod observability;

pub use config::schema::{LogConfig, LogLevel, LogOutput};
pub use observability::logging::{init_logger, LogError, Logger};
