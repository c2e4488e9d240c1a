//! Storage port
//!
//! The engine persists two logical tables: `links` keyed by code, and
//! `clicks`, an append log keyed by code. Backends implement
//! [`StorageBackend`] over `serde_json::Value` payloads so the link and click
//! layers own their own serialization.

mod file;
mod memory;
mod table;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::{EngineError, Result};

pub use file::FileBackend;
pub use memory::MemoryBackend;

/// Logical table names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Links,
    Clicks,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Links => "links",
            Table::Clicks => "clicks",
        }
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key-value storage port.
///
/// Every call is atomic with respect to other calls on the same backend:
/// readers never observe a half-applied `put` or `append_batch`. Callers that
/// need check-then-act semantics (`LinkStore`) serialize themselves on top.
#[async_trait]
pub trait StorageBackend: Send + Sync {
    /// First entry stored under `key`.
    async fn get(&self, table: Table, key: &str) -> Result<Option<Value>>;

    /// Insert `key`, or replace its value in place if present.
    async fn put(&self, table: Table, key: &str, value: Value) -> Result<()>;

    /// Append an entry; duplicate keys are kept.
    async fn append(&self, table: Table, key: &str, value: Value) -> Result<()>;

    /// Append all entries in one atomic step.
    async fn append_batch(&self, table: Table, entries: Vec<(String, Value)>) -> Result<()> {
        for (key, value) in entries {
            self.append(table, &key, value).await?;
        }
        Ok(())
    }

    /// All entries in insertion order.
    async fn scan(&self, table: Table) -> Result<Vec<(String, Value)>>;

    fn backend_name(&self) -> &'static str;
}

/// Supported backend names
pub const SUPPORTED_BACKENDS: &[&str] = &["memory", "file"];

/// 规范化 backend 名称
pub fn normalize_backend_name(backend: &str) -> Result<&'static str> {
    match backend.trim().to_ascii_lowercase().as_str() {
        "memory" | "mem" | "" => Ok("memory"),
        "file" | "json" => Ok("file"),
        other => Err(EngineError::config(format!(
            "Unknown storage backend '{}'. Supported: {}",
            other,
            SUPPORTED_BACKENDS.join(", ")
        ))),
    }
}
