//! Structured logging.
//!
//! Events go to stdout and, without ANSI colours, to a log file that
//! survives restarts. The file is written through a non-blocking worker so a
//! slow disk never stalls a request.

use std::fs;
use std::path::Path;
use tracing_appender::non_blocking::{NonBlocking, WorkerGuard};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::EnvFilter;

use crate::config::ObservabilityConfig;
use crate::observability::ObservabilityError;

/// Crates whose events are shown at the configured level.
const LOGGED_TARGETS: &[&str] = &["song_catalog", "tower_http"];

/// Default filter directive for a log level, e.g. `song_catalog=info,tower_http=info`.
pub fn default_directive(level: &str) -> String {
    LOGGED_TARGETS
        .iter()
        .map(|target| format!("{}={}", target, level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Filter from `RUST_LOG`, falling back to the configured level.
pub fn env_filter(config: &ObservabilityConfig) -> Result<EnvFilter, ObservabilityError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(default_directive(&config.log_level))?),
    }
}

/// Open the persistent log file and wrap it in a non-blocking writer.
///
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn file_writer(config: &ObservabilityConfig) -> Result<(NonBlocking, WorkerGuard), ObservabilityError> {
    let dir = Path::new(&config.log_dir);
    fs::create_dir_all(dir)?;

    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(config.log_file.as_str())
        .build(dir)?;

    Ok(tracing_appender::non_blocking(appender))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive("debug"), "song_catalog=debug,tower_http=debug");
    }

    #[test]
    fn test_file_writer_creates_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let config = ObservabilityConfig {
            log_dir: dir.path().join("logs").to_string_lossy().into_owned(),
            ..ObservabilityConfig::default()
        };

        let (_writer, _guard) = file_writer(&config).unwrap();
        assert!(dir.path().join("logs").join("app.log").exists());
    }

    #[test]
    fn test_invalid_level_rejected() {
        let config = ObservabilityConfig {
            log_level: "very-loud".to_string(),
            ..ObservabilityConfig::default()
        };
        // RUST_LOG may be set in the environment running the tests
        if std::env::var_os("RUST_LOG").is_none() {
            assert!(env_filter(&config).is_err());
        }
    }
}
