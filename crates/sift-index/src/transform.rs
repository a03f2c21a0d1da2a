//! Record to text conversion.
//!
//! Transformers are tried in registration order; the first one whose
//! [`ContentTransformer::can_handle`] accepts the record kind converts it.
//! [`DefaultTransformer`] accepts everything and always runs last.

use std::sync::LazyLock;

use regex::Regex;
use sift_core::Result;

use crate::record::Record;

static TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("Invalid HTML tag regex"));

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\r\f\v]+").expect("Invalid whitespace regex"));

/// Fields that describe a record rather than hold its text.
pub const RESERVED_FIELDS: &[&str] = &[
    "id",
    "pid",
    "kind",
    "site",
    "language",
    "link",
    "slug",
    "image",
    "timestamp",
    "updated",
    "tag",
    "priority",
    "sorting",
    "hidden",
    "no_search",
    "no_search_sub",
    "title",
    "description",
    "keywords",
];

/// Strip markup and decode the common entities.
///
/// ```
/// use sift_index::transform::strip_html;
///
/// assert_eq!(strip_html("<p>Fish &amp; <b>Chips</b></p>"), "Fish & Chips");
/// ```
pub fn strip_html(html: &str) -> String {
    let text = TAG.replace_all(html, " ");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    text.lines()
        .map(|line| WHITESPACE.replace_all(line, " ").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Converts one kind of record into indexable text.
pub trait ContentTransformer: Send + Sync {
    /// Name for diagnostics.
    fn name(&self) -> &'static str;

    /// Whether this transformer converts records of `kind`.
    fn can_handle(&self, kind: &str) -> bool;

    /// Convert a record into plain text.
    fn convert(&self, record: &Record) -> Result<String>;
}

/// Text elements: header plus body text.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextTransformer;

impl ContentTransformer for TextTransformer {
    fn name(&self) -> &'static str {
        "text"
    }

    fn can_handle(&self, kind: &str) -> bool {
        matches!(kind, "text" | "textpic" | "textmedia")
    }

    fn convert(&self, record: &Record) -> Result<String> {
        let parts: Vec<String> = ["header", "subheader", "bodytext"]
            .iter()
            .filter_map(|field| record.text(field))
            .map(strip_html)
            .filter(|s| !s.is_empty())
            .collect();
        Ok(parts.join("\n"))
    }
}

/// Bullet lists: one item per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct BulletsTransformer;

impl ContentTransformer for BulletsTransformer {
    fn name(&self) -> &'static str {
        "bullets"
    }

    fn can_handle(&self, kind: &str) -> bool {
        kind == "bullets"
    }

    fn convert(&self, record: &Record) -> Result<String> {
        let mut lines: Vec<String> = record.text("header").map(strip_html).into_iter().collect();
        if let Some(body) = record.text("bodytext") {
            lines.extend(
                body.lines()
                    .map(strip_html)
                    .filter(|line| !line.is_empty()),
            );
        }
        Ok(lines.join("\n"))
    }
}

/// Tables: rows on lines, cells separated by `|`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableTransformer;

impl ContentTransformer for TableTransformer {
    fn name(&self) -> &'static str {
        "table"
    }

    fn can_handle(&self, kind: &str) -> bool {
        kind == "table"
    }

    fn convert(&self, record: &Record) -> Result<String> {
        let mut lines: Vec<String> = record.text("header").map(strip_html).into_iter().collect();
        if let Some(body) = record.text("bodytext") {
            for row in body.lines() {
                let cells: Vec<String> = row
                    .split('|')
                    .map(strip_html)
                    .filter(|cell| !cell.is_empty())
                    .collect();
                if !cells.is_empty() {
                    lines.push(cells.join(" "));
                }
            }
        }
        Ok(lines.join("\n"))
    }
}

/// Fallback: every non-reserved string field, in field order.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultTransformer;

impl ContentTransformer for DefaultTransformer {
    fn name(&self) -> &'static str {
        "default"
    }

    fn can_handle(&self, _kind: &str) -> bool {
        true
    }

    fn convert(&self, record: &Record) -> Result<String> {
        let parts: Vec<String> = record
            .fields
            .iter()
            .filter(|(key, _)| !RESERVED_FIELDS.contains(&key.as_str()))
            .filter_map(|(_, value)| value.as_str())
            .map(strip_html)
            .filter(|s| !s.is_empty())
            .collect();
        Ok(parts.join("\n"))
    }
}

/// Ordered transformer list with the default appended last.
pub struct TransformerRegistry {
    transformers: Vec<Box<dyn ContentTransformer>>,
    fallback: DefaultTransformer,
}

impl TransformerRegistry {
    /// Registry with the built-in transformers.
    pub fn new() -> Self {
        Self {
            transformers: vec![
                Box::new(TextTransformer),
                Box::new(BulletsTransformer),
                Box::new(TableTransformer),
            ],
            fallback: DefaultTransformer,
        }
    }

    /// Registry without built-ins; only the default transformer applies.
    pub fn empty() -> Self {
        Self {
            transformers: Vec::new(),
            fallback: DefaultTransformer,
        }
    }

    /// Register a transformer after those already present.
    pub fn with_transformer(mut self, transformer: Box<dyn ContentTransformer>) -> Self {
        self.transformers.push(transformer);
        self
    }

    /// The transformer that handles `kind`.
    pub fn transformer_for(&self, kind: &str) -> &dyn ContentTransformer {
        self.transformers
            .iter()
            .find(|t| t.can_handle(kind))
            .map(|t| t.as_ref())
            .unwrap_or(&self.fallback)
    }

    /// Convert a record with the transformer that handles its kind.
    pub fn convert(&self, record: &Record) -> Result<String> {
        let transformer = self.transformer_for(&record.kind);
        log::trace!(
            "Converting {} '{}' with the {} transformer",
            record.kind,
            record.id,
            transformer.name()
        );
        transformer.convert(record)
    }
}

impl Default for TransformerRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TransformerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.transformers.iter().map(|t| t.name()).collect();
        f.debug_struct("TransformerRegistry")
            .field("transformers", &names)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
