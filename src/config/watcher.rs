//! Configuration file watcher for hot reload.
//!
//! # Design Decisions
//! - The directory holding the file is watched, not the file: editors that
//!   save by renaming a temp file over the original replace its inode, and a
//!   file watch dies with the old inode
//! - Only events naming the config file itself are acted on
//! - Updates carry the parsed but unvalidated config; the receiver merges its
//!   own overrides and validation happens when the sink is installed

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::read_config;
use crate::config::schema::LogConfig;

/// Watches one TOML config file and streams every successfully parsed
/// version of it.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<LogConfig>,
}

/// Canonical parent directory and the config path inside it, in the form
/// `notify` reports event paths.
fn resolve_target(path: &Path) -> io::Result<(PathBuf, PathBuf)> {
    let file_name = path.file_name().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "config path has no file name")
    })?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let dir = parent.canonicalize()?;
    let target = dir.join(file_name);
    Ok((dir, target))
}

fn touches(event: &Event, target: &Path) -> bool {
    let writes = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
    writes && event.paths.iter().any(|p| p == target)
}

impl ConfigWatcher {
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<LogConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching in a background thread.
    ///
    /// The returned watcher must be kept alive for updates to keep flowing.
    /// Versions of the file that cannot be read or parsed are logged and
    /// skipped; a half-written save is usually followed by a complete one.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let (dir, target) = resolve_target(&self.path).map_err(notify::Error::io)?;
        let tx = self.update_tx;
        let watched = target.clone();

        let handler = move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(e) => {
                    tracing::error!(error = %e, "Config watch error");
                    return;
                }
            };
            if !touches(&event, &watched) {
                return;
            }

            match read_config(&watched) {
                Ok(config) => {
                    tracing::debug!(path = %watched.display(), "Log config changed");
                    if tx.send(config).is_err() {
                        tracing::debug!("Config update receiver dropped");
                    }
                }
                Err(e) => {
                    tracing::warn!(
                        path = %watched.display(),
                        "Skipping unreadable log config: {}",
                        e
                    );
                }
            }
        };

        let mut watcher = RecommendedWatcher::new(
            handler,
            Config::default().with_poll_interval(Duration::from_secs(1)),
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %target.display(), "Config watcher started");
        Ok(watcher)
    }
}
