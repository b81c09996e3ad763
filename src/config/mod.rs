//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, [log] table) or CLI flags
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → LogConfig (validated, immutable)
//!     → observability::logging (build & install sink)
//!
//! On file change:
//!     watcher.rs detects change
//!     → loader.rs loads new config
//!     → validation.rs validates
//!     → caller re-installs the default sink
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require full reload
//! - All fields have defaults to allow minimal configs
//! - Unknown level/output strings fall back instead of failing the parse

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use schema::LogConfig;
pub use schema::LogLevel;
pub use schema::LogOutput;
