//! Size/age based rotating file writer.
//!
//! # Responsibilities
//! - Prepare the log file target (parent directory, append access)
//! - Map `LogConfig` thresholds onto `file-rotate`
//! - Expose the writer to `tracing-subscriber` as a `MakeWriter`
//!
//! # Design Decisions
//! - Rotation, retention and compression are left to `file-rotate`
//! - Rotation happens after a record pushes the file past `max_size`, so a
//!   record is never split across two files
//! - Backups carry a timestamp suffix so `max_age` can be enforced
//! - Every record is flushed when its guard drops

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::sync::{Mutex, MutexGuard, PoisonError};

use file_rotate::compression::Compression;
use file_rotate::suffix::{AppendTimestamp, FileLimit};
use file_rotate::{ContentLimit, FileRotate};
use tracing_subscriber::fmt::MakeWriter;

use crate::config::schema::LogConfig;

type Inner = FileRotate<AppendTimestamp>;

/// Rotating file sink shared by every record of one installed logger.
pub struct RotatingWriter {
    inner: Mutex<Inner>,
}

impl RotatingWriter {
    /// Open (or create) `config.file_path` for appending.
    pub fn open(config: &LogConfig) -> io::Result<Self> {
        let path = config.file_path.as_path();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        // FileRotate panics on an unusable path; surface it as an error here.
        OpenOptions::new().create(true).append(true).open(path)?;

        let file_limit = if config.max_age == 0 {
            FileLimit::Unlimited
        } else {
            FileLimit::Age(chrono::Duration::days(i64::from(config.max_age)))
        };

        let compression = if config.compress {
            Compression::OnRotate(0)
        } else {
            Compression::None
        };

        let inner = FileRotate::new(
            path,
            AppendTimestamp::default(file_limit),
            ContentLimit::BytesSurpassed(config.max_size_bytes()),
            compression,
            #[cfg(unix)]
            None,
        );

        tracing::trace!(
            path = %path.display(),
            max_size_bytes = config.max_size_bytes(),
            max_age_days = config.max_age,
            compress = config.compress,
            "Rotating log file opened"
        );

        Ok(Self {
            inner: Mutex::new(inner),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for RotatingWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RotatingWriter").finish_non_exhaustive()
    }
}

/// Exclusive access to the rotating file for the duration of one record.
pub struct RotatingWriterGuard<'a> {
    file: MutexGuard<'a, Inner>,
}

impl Write for RotatingWriterGuard<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

impl Drop for RotatingWriterGuard<'_> {
    fn drop(&mut self) {
        let _ = self.file.flush();
    }
}

impl<'a> MakeWriter<'a> for RotatingWriter {
    type Writer = RotatingWriterGuard<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        RotatingWriterGuard { file: self.lock() }
    }
}
