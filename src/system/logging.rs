//! Logging system initialization
//!
//! Sets up the tracing subscriber from [`LoggingConfig`]: console or file
//! output, optional daily rotation, text or JSON format.

use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::LoggingConfig;
use crate::errors::{EngineError, Result};

/// Initialize logging system based on configuration
///
/// Call once at startup, after the configuration has been loaded.
///
/// # Returns
/// * `WorkerGuard` - Must be kept alive for the duration of the program
///   to ensure non-blocking log writes are flushed
pub fn init_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    install(config, Console::Stdout)
}

/// Same as [`init_logging`] but console output goes to stderr, leaving
/// stdout to command results.
pub fn init_cli_logging(config: &LoggingConfig) -> Result<WorkerGuard> {
    install(config, Console::Stderr)
}

enum Console {
    Stdout,
    Stderr,
}

fn install(config: &LoggingConfig, console: Console) -> Result<WorkerGuard> {
    let log_file = config.file.as_deref().filter(|f| !f.is_empty());

    let writer: Box<dyn std::io::Write + Send + Sync> = match log_file {
        Some(log_file) if config.enable_rotation => {
            let path = Path::new(log_file);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(Path::new("."));
            let filename = path
                .file_name()
                .and_then(|f| f.to_str())
                .unwrap_or("lapselink.log");
            let appender = rolling::Builder::new()
                .rotation(rolling::Rotation::DAILY)
                .filename_prefix(filename.trim_end_matches(".log"))
                .filename_suffix("log")
                .max_log_files(config.max_backups.max(1) as usize)
                .build(dir)
                .map_err(|e| {
                    EngineError::config(format!("Failed to create rolling log appender: {}", e))
                })?;
            Box::new(appender)
        }
        Some(log_file) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;
            Box::new(file)
        }
        None => match console {
            Console::Stdout => Box::new(std::io::stdout()),
            Console::Stderr => Box::new(std::io::stderr()),
        },
    };

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| EngineError::config(format!("Invalid log level '{}': {}", config.level, e)))?;

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(log_file.is_none());

    let installed = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    installed.map_err(|e| EngineError::config(format!("Failed to install logger: {}", e)))?;

    Ok(guard)
}
