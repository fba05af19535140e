//! Integration tests for logging system

use core_runtime::logging::{init_logging, LogFormat, LogLevel, LoggingConfig};
use core_runtime::Error;

#[test]
fn test_logging_initializes_once_per_process() {
    // Only one global subscriber can exist per process, so both calls live in
    // this single test.
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_spans(false);

    init_logging(config.clone()).expect("first initialization succeeds");
    tracing::debug!(target: "core_library", playlists = 3, "Loaded collection");

    let second = init_logging(config);
    assert!(matches!(second, Err(Error::Config(_))));
}

#[test]
fn test_invalid_filter_fails_before_installing() {
    let config = LoggingConfig::default().with_filter("core_playback=loudest");
    assert!(matches!(init_logging(config), Err(Error::Config(_))));
}
