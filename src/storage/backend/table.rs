use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::Table;

/// Insertion-ordered entries plus a first-occurrence index.
#[derive(Debug, Clone, Default)]
pub(super) struct TableData {
    entries: Vec<(String, Value)>,
    index: HashMap<String, usize>,
}

impl TableData {
    fn from_entries(entries: Vec<(String, Value)>) -> Self {
        let mut index = HashMap::with_capacity(entries.len());
        for (pos, (key, _)) in entries.iter().enumerate() {
            index.entry(key.clone()).or_insert(pos);
        }
        Self { entries, index }
    }

    fn get(&self, key: &str) -> Option<&Value> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    fn put(&mut self, key: &str, value: Value) {
        match self.index.get(key) {
            Some(&pos) => self.entries[pos].1 = value,
            None => self.append(key.to_string(), value),
        }
    }

    fn append(&mut self, key: String, value: Value) {
        let pos = self.entries.len();
        self.index.entry(key.clone()).or_insert(pos);
        self.entries.push((key, value));
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Both logical tables of one backend.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    links: TableData,
    clicks: TableData,
}

impl Tables {
    fn table(&self, table: Table) -> &TableData {
        match table {
            Table::Links => &self.links,
            Table::Clicks => &self.clicks,
        }
    }

    fn table_mut(&mut self, table: Table) -> &mut TableData {
        match table {
            Table::Links => &mut self.links,
            Table::Clicks => &mut self.clicks,
        }
    }

    pub fn get(&self, table: Table, key: &str) -> Option<Value> {
        self.table(table).get(key).cloned()
    }

    pub fn put(&mut self, table: Table, key: &str, value: Value) {
        self.table_mut(table).put(key, value);
    }

    pub fn append(&mut self, table: Table, key: String, value: Value) {
        self.table_mut(table).append(key, value);
    }

    pub fn scan(&self, table: Table) -> Vec<(String, Value)> {
        self.table(table).entries.clone()
    }

    pub fn len(&self, table: Table) -> usize {
        self.table(table).len()
    }

    pub fn is_empty(&self, table: Table) -> bool {
        self.len(table) == 0
    }
}

/// On-disk layout of the file backend
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub links: Vec<DocumentEntry>,
    #[serde(default)]
    pub clicks: Vec<DocumentEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentEntry {
    pub key: String,
    pub value: Value,
}

impl From<Document> for Tables {
    fn from(doc: Document) -> Self {
        let convert = |entries: Vec<DocumentEntry>| {
            TableData::from_entries(entries.into_iter().map(|e| (e.key, e.value)).collect())
        };
        Tables {
            links: convert(doc.links),
            clicks: convert(doc.clicks),
        }
    }
}

impl From<&Tables> for Document {
    fn from(tables: &Tables) -> Self {
        let convert = |data: &TableData| {
            data.entries
                .iter()
                .map(|(key, value)| DocumentEntry {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect()
        };
        Document {
            links: convert(&tables.links),
            clicks: convert(&tables.clicks),
        }
    }
}
