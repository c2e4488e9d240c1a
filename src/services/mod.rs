//! Service layer for business logic
//!
//! This module provides unified business logic that can be shared between
//! different interfaces (HTTP API, CLI, embedding applications).

pub mod clock;
pub mod code_generator;
mod link_service;
pub mod notifier;

pub use clock::{Clock, FixedClock, SystemClock};
pub use code_generator::{CodeGenerator, RandomCodeGenerator};
pub use link_service::*;
pub use notifier::{LogLevel, LogSink, NoopLogSink, TracingLogSink};
