use async_trait::async_trait;
use parking_lot::RwLock;
use serde_json::Value;

use super::table::Tables;
use super::{StorageBackend, Table};
use crate::errors::Result;

/// Process-local backend; contents vanish with the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: RwLock<Tables>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self, table: Table) -> usize {
        self.tables.read().len(table)
    }

    pub fn is_empty(&self, table: Table) -> bool {
        self.tables.read().is_empty(table)
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, table: Table, key: &str) -> Result<Option<Value>> {
        Ok(self.tables.read().get(table, key))
    }

    async fn put(&self, table: Table, key: &str, value: Value) -> Result<()> {
        self.tables.write().put(table, key, value);
        Ok(())
    }

    async fn append(&self, table: Table, key: &str, value: Value) -> Result<()> {
        self.tables.write().append(table, key.to_string(), value);
        Ok(())
    }

    async fn append_batch(&self, table: Table, entries: Vec<(String, Value)>) -> Result<()> {
        let mut tables = self.tables.write();
        for (key, value) in entries {
            tables.append(table, key, value);
        }
        Ok(())
    }

    async fn scan(&self, table: Table) -> Result<Vec<(String, Value)>> {
        Ok(self.tables.read().scan(table))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_tables_are_independent() {
        let backend = MemoryBackend::new();
        backend.put(Table::Links, "abc", json!({"n": 1})).await.unwrap();
        backend.append(Table::Clicks, "abc", json!({"n": 2})).await.unwrap();

        assert_eq!(backend.len(Table::Links), 1);
        assert_eq!(backend.len(Table::Clicks), 1);
        assert_eq!(
            backend.get(Table::Links, "abc").await.unwrap(),
            Some(json!({"n": 1}))
        );
        assert!(backend.get(Table::Links, "missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_batch_keeps_order() {
        let backend = MemoryBackend::new();
        backend
            .append_batch(
                Table::Clicks,
                vec![("b".into(), json!(1)), ("a".into(), json!(2)), ("b".into(), json!(3))],
            )
            .await
            .unwrap();

        let values: Vec<Value> = backend
            .scan(Table::Clicks)
            .await
            .unwrap()
            .into_iter()
            .map(|(_, v)| v)
            .collect();
        assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
    }
}
