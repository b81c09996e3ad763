//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! LogConfig
//!     → logging.rs (threshold, encoder, default sink)
//!     → rotation.rs (rotating file writer, file output only)
//!
//! Consumers:
//!     → stdout (human-readable text)
//!     → rotated log files (one JSON object per line)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Explicit `Logger` handles first; the global default is a convenience

pub mod logging;
pub mod rotation;

pub use logging::{init_logger, LogError, Logger};
