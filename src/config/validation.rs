//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that a file-bound config names a usable target path
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: LogConfig → Result<(), Vec<ValidationError>>
//! - Level and output strings are never rejected; they were already
//!   normalized during parsing
//! - Console-bound configs always validate, whatever their file settings

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::config::schema::{LogConfig, LogOutput};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("file output selected but file_path is empty")]
    MissingFilePath,

    #[error("file_path {0:?} is a directory")]
    PathIsDirectory(PathBuf),

    #[error("file_path {0:?} has no file name")]
    NoFileName(PathBuf),
}

pub fn validate_config(config: &LogConfig) -> Result<(), Vec<ValidationError>> {
    if config.output != LogOutput::File {
        return Ok(());
    }

    let mut errors = Vec::new();
    let path = &config.file_path;

    if path.as_os_str().is_empty() {
        errors.push(ValidationError::MissingFilePath);
    } else {
        if path.is_dir() {
            errors.push(ValidationError::PathIsDirectory(path.clone()));
        }
        if path.file_name().is_none() {
            errors.push(ValidationError::NoFileName(path.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Comma-joined rendering used by the error types that wrap a list.
pub(crate) struct DisplayErrors<'a>(pub &'a [ValidationError]);

impl fmt::Display for DisplayErrors<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", err)?;
        }
        Ok(())
    }
}
