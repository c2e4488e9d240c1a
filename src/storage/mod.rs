use std::sync::Arc;

use tracing::info;

use crate::config::StorageConfig;
use crate::errors::Result;

pub mod backend;
pub mod link_store;
pub mod models;

pub use backend::{FileBackend, MemoryBackend, StorageBackend, Table};
pub use link_store::LinkStore;
pub use models::{ClickEvent, LinkRecord};

pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: &StorageConfig) -> Result<Arc<dyn StorageBackend>> {
        let backend: Arc<dyn StorageBackend> =
            match backend::normalize_backend_name(&config.backend)? {
                "file" => Arc::new(FileBackend::open(&config.path)?),
                _ => Arc::new(MemoryBackend::new()),
            };

        info!("Using storage backend: {}", backend.backend_name());
        Ok(backend)
    }
}
