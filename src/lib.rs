//! lapselink - an expiring URL shortener
//!
//! Issues short codes for target URLs, enforces a validity window on every
//! link, records clicks and reports per-link statistics. The core lives in
//! [`services::LinkService`]; storage sits behind
//! [`storage::StorageBackend`].
//!
//! # Features
//! - **server**: HTTP host (default)
//! - **cli**: Command-line interface (default)
//!
//! # Architecture
//! - `services`: link lifecycle, code generation, clock and log sink ports
//! - `storage`: link table and click log over memory or file backends
//! - `analytics`: click buffering and location lookup
//! - `api`: HTTP handlers
//! - `interfaces`: CLI commands
//! - `config`: Configuration management
//! - `runtime`: Application lifecycle and execution modes
//! - `system`: Logging setup

pub mod analytics;
#[cfg(feature = "server")]
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
#[cfg(feature = "cli")]
pub mod interfaces;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod utils;
