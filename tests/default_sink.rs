//! The process-wide default sink.
//!
//! Kept in its own test binary with a single test: the global subscriber can
//! only be installed once per process.

use logkit::{init_logger, LogConfig, LogLevel, LogOutput};

mod common;

use common::messages;

#[test]
fn test_second_init_replaces_default_sink() {
    let dir = tempfile::tempdir().unwrap();
    let first = dir.path().join("first.log");
    let second = dir.path().join("second.log");

    init_logger(&LogConfig {
        level: LogLevel::Error,
        file_path: first.clone(),
        output: LogOutput::File,
        ..LogConfig::default()
    })
    .unwrap();

    tracing::info!("info under error threshold");
    tracing::error!("error to first");

    init_logger(&LogConfig {
        level: LogLevel::Info,
        file_path: second.clone(),
        output: LogOutput::File,
        ..LogConfig::default()
    })
    .unwrap();

    tracing::info!("info to second");
    tracing::error!("error to second");

    // Nothing from after the swap reaches the first file.
    assert_eq!(messages(&first), vec!["error to first"]);

    assert_eq!(messages(&second), vec!["info to second", "error to second"]);

    // A rejected config leaves the current sink in place.
    let err = init_logger(&LogConfig {
        output: LogOutput::File,
        ..LogConfig::default()
    });
    assert!(err.is_err());

    tracing::warn!("still second");
    assert_eq!(
        messages(&second),
        vec!["info to second", "error to second", "still second"]
    );

    // A debug-level sink starts with the caller's own records.
    let third = dir.path().join("third.log");
    init_logger(&LogConfig {
        level: LogLevel::Debug,
        file_path: third.clone(),
        output: LogOutput::File,
        ..LogConfig::default()
    })
    .unwrap();

    tracing::debug!("first user record");
    assert_eq!(messages(&third), vec!["first user record"]);

    // The replacement notice is written to the outgoing sink.
    let fourth = dir.path().join("fourth.log");
    init_logger(&LogConfig {
        level: LogLevel::Debug,
        file_path: fourth.clone(),
        output: LogOutput::File,
        ..LogConfig::default()
    })
    .unwrap();

    assert_eq!(
        messages(&third),
        vec!["first user record", "Replacing default log sink"]
    );
    assert!(messages(&fourth).is_empty());
}
