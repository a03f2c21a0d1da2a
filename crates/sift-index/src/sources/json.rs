//! JSON record store.
//!
//! A store file maps table names to arrays of row objects. Every row needs an
//! `id` (string or number); `kind` defaults to the table name.
//!
//! ```json
//! {
//!   "pages": [{ "id": 1, "pid": 0, "title": "Home", "slug": "" }],
//!   "content": [{ "id": 10, "pid": 1, "kind": "text", "bodytext": "<p>Hi</p>" }]
//! }
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use sift_core::{Error, Result};

use crate::record::Record;

/// Tables of records loaded from a JSON file.
#[derive(Debug, Clone, Default)]
pub struct JsonRecordStore {
    path: Option<PathBuf>,
    tables: BTreeMap<String, Vec<Record>>,
}

impl JsonRecordStore {
    /// Load a store file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let mut store = Self::from_json_str(&content)
            .map_err(|e| Error::parse(format!("{}: {e}", path.display())))?;
        store.path = Some(path.to_path_buf());
        log::debug!(
            "Loaded {} table(s) from {}",
            store.tables.len(),
            path.display()
        );
        Ok(store)
    }

    /// Parse a store from JSON text.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: BTreeMap<String, Vec<Map<String, Value>>> = serde_json::from_str(json)?;
        let mut tables = BTreeMap::new();
        for (table, rows) in raw {
            let records = rows
                .into_iter()
                .enumerate()
                .map(|(n, fields)| to_record(&table, n, fields))
                .collect::<Result<Vec<_>>>()?;
            tables.insert(table, records);
        }
        Ok(Self { path: None, tables })
    }

    /// Build a store from records in memory.
    pub fn from_tables(tables: BTreeMap<String, Vec<Record>>) -> Self {
        Self { path: None, tables }
    }

    /// File the store was loaded from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Records of a table; empty when the table does not exist.
    pub fn table(&self, name: &str) -> &[Record] {
        self.tables.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Table names.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }
}

fn to_record(table: &str, n: usize, fields: Map<String, Value>) -> Result<Record> {
    let id = match fields.get("id") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        Some(Value::Number(num)) => num.to_string(),
        _ => {
            return Err(Error::parse(format!(
                "row {n} of table '{table}' has no id"
            )));
        }
    };
    let kind = fields
        .get("kind")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| table.to_string());
    Ok(Record { kind, id, fields })
}
