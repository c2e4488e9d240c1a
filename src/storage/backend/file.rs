use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;
use tracing::{debug, error, info};

use super::table::{Document, Tables};
use super::{StorageBackend, Table};
use crate::errors::{EngineError, Result};

/// Single JSON document holding both tables.
///
/// The whole document is rewritten on every mutation (temp file + rename),
/// and the in-memory copy is only replaced after the write succeeded, so a
/// failed write leaves both disk and memory at the previous state.
pub struct FileBackend {
    file_path: PathBuf,
    tables: RwLock<Tables>,
}

impl FileBackend {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file_path = path.as_ref().to_path_buf();
        let tables = Self::load_from_file(&file_path)?;

        let backend = Self {
            file_path,
            tables: RwLock::new(tables),
        };

        if !backend.file_path.exists() {
            backend.save_to_file(&backend.tables.read())?;
            info!("Created empty link file: {}", backend.file_path.display());
        }

        Ok(backend)
    }

    fn load_from_file(path: &Path) -> Result<Tables> {
        match fs::read_to_string(path) {
            Ok(content) if content.trim().is_empty() => Ok(Tables::default()),
            Ok(content) => match serde_json::from_str::<Document>(&content) {
                Ok(doc) => {
                    let tables = Tables::from(doc);
                    info!(
                        "Loaded {} links and {} clicks from {}",
                        tables.len(Table::Links),
                        tables.len(Table::Clicks),
                        path.display()
                    );
                    Ok(tables)
                }
                Err(e) => {
                    error!("Failed to parse link file: {}", e);
                    Err(EngineError::serialization(format!(
                        "Failed to parse link file {}: {}",
                        path.display(),
                        e
                    )))
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!("Link file not found, starting with empty storage");
                Ok(Tables::default())
            }
            Err(e) => Err(EngineError::file_operation(format!(
                "Failed to read link file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    fn save_to_file(&self, tables: &Tables) -> Result<()> {
        let json = serde_json::to_string_pretty(&Document::from(tables))?;

        if let Some(parent) = self.file_path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }

        let mut tmp = self.file_path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.file_path)?;
        debug!("Persisted link file: {}", self.file_path.display());
        Ok(())
    }

    /// Apply `mutate` to a copy, persist it, then publish it.
    fn commit<F>(&self, mutate: F) -> Result<()>
    where
        F: FnOnce(&mut Tables),
    {
        let mut guard = self.tables.write();
        let mut next = guard.clone();
        mutate(&mut next);
        self.save_to_file(&next)?;
        *guard = next;
        Ok(())
    }
}

#[async_trait]
impl StorageBackend for FileBackend {
    async fn get(&self, table: Table, key: &str) -> Result<Option<Value>> {
        Ok(self.tables.read().get(table, key))
    }

    async fn put(&self, table: Table, key: &str, value: Value) -> Result<()> {
        self.commit(|tables| tables.put(table, key, value))
    }

    async fn append(&self, table: Table, key: &str, value: Value) -> Result<()> {
        self.commit(|tables| tables.append(table, key.to_string(), value))
    }

    async fn append_batch(&self, table: Table, entries: Vec<(String, Value)>) -> Result<()> {
        if entries.is_empty() {
            return Ok(());
        }
        self.commit(|tables| {
            for (key, value) in entries {
                tables.append(table, key, value);
            }
        })
    }

    async fn scan(&self, table: Table) -> Result<Vec<(String, Value)>> {
        Ok(self.tables.read().scan(table))
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
