//! Link table
//!
//! Owns the uniqueness invariant: a code, once stored, is never handed out
//! again, whether the record behind it is live or expired.

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::backend::{StorageBackend, Table};
use super::models::LinkRecord;
use crate::errors::{EngineError, Result};

pub struct LinkStore {
    backend: Arc<dyn StorageBackend>,
    /// Serializes the free-check and the write of `put`
    write_lock: Mutex<()>,
}

impl LinkStore {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            write_lock: Mutex::new(()),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        self.backend.backend_name()
    }

    /// True iff no record holds `code`.
    pub async fn is_free(&self, code: &str) -> Result<bool> {
        Ok(self.backend.get(Table::Links, code).await?.is_none())
    }

    /// Insert a new record, failing with `CodeTaken` if the code is held.
    pub async fn put(&self, record: LinkRecord) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if !self.is_free(&record.code).await? {
            debug!("LinkStore: code '{}' already taken", record.code);
            return Err(EngineError::code_taken(format!(
                "Code '{}' already exists",
                record.code
            )));
        }

        let value = serde_json::to_value(&record)?;
        self.backend.put(Table::Links, &record.code, value).await?;
        trace!("LinkStore: stored '{}'", record.code);
        Ok(())
    }

    pub async fn get(&self, code: &str) -> Result<Option<LinkRecord>> {
        match self.backend.get(Table::Links, code).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    /// Every record in insertion order.
    pub async fn all(&self) -> Result<Vec<LinkRecord>> {
        self.backend
            .scan(Table::Links)
            .await?
            .into_iter()
            .map(|(_, value)| serde_json::from_value(value).map_err(EngineError::from))
            .collect()
    }

    pub async fn len(&self) -> Result<usize> {
        Ok(self.backend.scan(Table::Links).await?.len())
    }
}
