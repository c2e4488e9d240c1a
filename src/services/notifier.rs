//! Outbound log notifications
//!
//! Hosts may forward engine events to an external log collector. Calls are
//! one-way: a sink must not block the caller and must swallow its own
//! failures. The engine runs unchanged with [`NoopLogSink`].

use tracing::{debug, error, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub trait LogSink: Send + Sync {
    fn log(&self, stack: &str, level: LogLevel, package: &str, message: &str);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLogSink;

impl LogSink for NoopLogSink {
    fn log(&self, _stack: &str, _level: LogLevel, _package: &str, _message: &str) {}
}

/// Forwards notifications into the process's `tracing` subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogSink;

impl LogSink for TracingLogSink {
    fn log(&self, stack: &str, level: LogLevel, package: &str, message: &str) {
        match level {
            LogLevel::Debug => debug!(stack, package, "{}", message),
            LogLevel::Info => info!(stack, package, "{}", message),
            LogLevel::Warn => warn!(stack, package, "{}", message),
            LogLevel::Error => error!(stack, package, "{}", message),
        }
    }
}
