//! Logging system initialization
//!
//! This module provides functions to initialize the tracing/logging system
//! based on application configuration.

use tracing_appender::rolling;

use crate::config::LoggingConfig;

/// Initialize logging system based on configuration
///
/// Output goes to stdout unless `logging.file` is set; with
/// `enable_rotation` the file rotates daily and keeps `max_backups` files.
/// If the file cannot be opened, logging falls back to stdout.
///
/// **Note**: This should be called only once during application startup,
/// after the configuration has been loaded.
///
/// # Returns
/// * `WorkerGuard` - Must be kept alive for the duration of the program
///   to ensure non-blocking log writes are flushed
pub fn init_logging(config: &LoggingConfig) -> tracing_appender::non_blocking::WorkerGuard {
    let (writer, to_file) = make_writer(config);

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(config.level.clone()));

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(!to_file);

    if config.format == "json" {
        subscriber_builder.json().init();
    } else {
        subscriber_builder.init();
    }

    guard
}

/// Pick the log sink. The flag tells whether output goes to a file.
fn make_writer(config: &LoggingConfig) -> (Box<dyn std::io::Write + Send + Sync>, bool) {
    let Some(log_file) = config.file.as_deref().filter(|f| !f.is_empty()) else {
        return (Box::new(std::io::stdout()), false);
    };

    let path = std::path::Path::new(log_file);

    if config.enable_rotation {
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(std::path::Path::new("."));
        let filename = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("shortgate.log");

        match rolling::Builder::new()
            .rotation(rolling::Rotation::DAILY)
            .filename_prefix(filename.trim_end_matches(".log"))
            .filename_suffix("log")
            .max_log_files(config.max_backups.max(1) as usize)
            .build(dir)
        {
            Ok(appender) => (Box::new(appender), true),
            Err(e) => {
                eprintln!("[WARN] Failed to create rolling log appender: {}; logging to stdout", e);
                (Box::new(std::io::stdout()), false)
            }
        }
    } else {
        match std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
        {
            Ok(file) => (Box::new(file), true),
            Err(e) => {
                eprintln!("[WARN] Failed to open log file {}: {}; logging to stdout", log_file, e);
                (Box::new(std::io::stdout()), false)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stdout_when_no_file() {
        let (_, to_file) = make_writer(&LoggingConfig::default());
        assert!(!to_file);

        let config = LoggingConfig {
            file: Some(String::new()),
            ..Default::default()
        };
        assert!(!make_writer(&config).1);
    }

    #[test]
    fn test_plain_file_writer() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("app.log");
        let config = LoggingConfig {
            file: Some(path.to_string_lossy().into_owned()),
            enable_rotation: false,
            ..Default::default()
        };
        let (_, to_file) = make_writer(&config);
        assert!(to_file);
        assert!(path.exists());
    }
}
