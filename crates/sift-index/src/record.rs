//! Raw records and the record source contract.
//!
//! A [`Record`] is one row handed over by the host platform: a kind (page,
//! content element type, news, ...), an id and a bag of JSON fields.
//! A [`RecordIndexer`] enumerates the records visible in the current queue
//! scope and converts each of them into an [`IndexNode`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sift_core::{Error, IndexNode, Result};

use crate::request::QueueRequest;

/// Lazy sequence of records produced by [`RecordIndexer::resolve`].
pub type RecordIter<'a> = Box<dyn Iterator<Item = Result<Record>> + 'a>;

/// One raw record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Record kind, used for transformer dispatch.
    pub kind: String,
    /// Record id, unique within its kind.
    pub id: String,
    /// Remaining fields.
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Create a record without fields.
    pub fn new(kind: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            id: id.into(),
            fields: Map::new(),
        }
    }

    /// Builder-style field setter.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Raw field value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Non-blank string field.
    pub fn text(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// String or number field rendered as a string.
    pub fn string(&self, key: &str) -> Option<String> {
        match self.fields.get(key)? {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Integer field; numeric strings are accepted.
    pub fn integer(&self, key: &str) -> Option<i64> {
        match self.fields.get(key)? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// Boolean flag; `true`, non-zero numbers, `"1"` and `"true"` are set.
    pub fn flag(&self, key: &str) -> bool {
        match self.fields.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::Number(n)) => n.as_i64().is_some_and(|v| v != 0),
            Some(Value::String(s)) => matches!(s.trim(), "1" | "true"),
            _ => false,
        }
    }

    /// List field: a JSON array of strings or a comma separated string.
    pub fn list(&self, key: &str) -> Vec<String> {
        let items: Vec<String> = match self.fields.get(key) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
            _ => Vec::new(),
        };
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    /// Timestamp field: RFC 3339, a plain `YYYY-MM-DD` date, or Unix seconds.
    ///
    /// A present but unreadable value is a conversion error.
    pub fn timestamp(&self, key: &str) -> Result<Option<DateTime<Utc>>> {
        let Some(value) = self.fields.get(key) else {
            return Ok(None);
        };
        let parsed = match value {
            Value::Null => return Ok(None),
            Value::Number(n) => n.as_i64().and_then(|s| DateTime::from_timestamp(s, 0)),
            Value::String(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|dt| dt.with_timezone(&Utc))
                .ok()
                .or_else(|| {
                    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
                        .ok()
                        .and_then(|d| d.and_hms_opt(0, 0, 0))
                        .map(|dt| dt.and_utc())
                }),
            _ => None,
        };
        parsed.map(Some).ok_or_else(|| {
            Error::conversion(format!(
                "{} '{}': invalid timestamp in field '{key}': {value}",
                self.kind, self.id
            ))
        })
    }

    /// Whether the record is visible in the given site.
    ///
    /// Records without a `site` field belong to every site.
    pub fn in_site(&self, site: &str) -> bool {
        self.text("site").is_none_or(|s| s == site)
    }

    /// Whether the record is visible in the given language.
    ///
    /// Records without a `language` field belong to every language.
    pub fn in_language(&self, code: &str) -> bool {
        self.text("language")
            .is_none_or(|l| l.eq_ignore_ascii_case(code))
    }
}

/// Identity of the record currently being converted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordRef {
    /// Record kind.
    pub kind: String,
    /// Record id.
    pub id: String,
}

impl RecordRef {
    /// Identity of a record.
    pub fn of(record: &Record) -> Self {
        Self {
            kind: record.kind.clone(),
            id: record.id.clone(),
        }
    }
}

impl std::fmt::Display for RecordRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A pluggable record source.
///
/// Implementations are registered on the [`crate::Indexer`] and referenced
/// by name from the `indexers` list of a search domain.
pub trait RecordIndexer: Send + Sync {
    /// Name referenced by domain configuration.
    fn name(&self) -> &str;

    /// Enumerate the records visible in the request scope (site, domain,
    /// language and environment are resolved).
    fn resolve<'a>(&'a self, request: &QueueRequest) -> Result<RecordIter<'a>>;

    /// Populate `node` from `record`.
    fn index(&self, record: &Record, node: &mut IndexNode, request: &QueueRequest) -> Result<()>;
}

// ============================================================================
// Tests
// ============================================================================
