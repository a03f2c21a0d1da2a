//! Structured indexer log.
//!
//! Every entry carries the queue scope it was raised in as tags and is
//! forwarded to the `log` facade under the `sift::indexer` target. Entries at
//! [`LogLevel::Error`] and above are also retained: they form the error list
//! of a run.

use std::fmt;

use crate::request::QueueRequest;

/// Log target of all indexer entries.
pub const LOG_TARGET: &str = "sift::indexer";

/// Severity of an indexer log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Diagnostic detail.
    Debug,
    /// Progress.
    Info,
    /// Something odd that did not fail anything.
    Warning,
    /// A node or a branch of the walk failed.
    Error,
    /// The run itself is compromised.
    Critical,
}

impl LogLevel {
    /// Whether entries of this level are retained.
    pub fn is_retained(self) -> bool {
        self >= LogLevel::Error
    }

    fn as_log_level(self) -> log::Level {
        match self {
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Info => log::Level::Info,
            LogLevel::Warning => log::Level::Warn,
            LogLevel::Error | LogLevel::Critical => log::Level::Error,
        }
    }
}

/// Scope tags of a log entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogTags {
    /// Site id.
    pub site: Option<String>,
    /// Search domain key.
    pub domain: Option<String>,
    /// Language code.
    pub language: Option<String>,
    /// Record indexer name.
    pub indexer: Option<String>,
    /// Record (`kind:id`).
    pub record: Option<String>,
}

impl LogTags {
    /// Tags for everything resolved in `request`.
    pub fn from_request(request: &QueueRequest) -> Self {
        Self {
            site: request.site_id().map(str::to_string),
            domain: request.domain_name().map(str::to_string),
            language: request.language_code().map(str::to_string),
            indexer: request.indexer_name().map(str::to_string),
            record: request.record_ref().map(ToString::to_string),
        }
    }
}

impl fmt::Display for LogTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags = [
            ("site", &self.site),
            ("domain", &self.domain),
            ("language", &self.language),
            ("indexer", &self.indexer),
            ("record", &self.record),
        ];
        let mut first = true;
        for (name, value) in tags {
            if let Some(value) = value {
                if !first {
                    f.write_str(" ")?;
                }
                write!(f, "{name}={value}")?;
                first = false;
            }
        }
        Ok(())
    }
}

/// One log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    /// Severity.
    pub level: LogLevel,
    /// Scope tags.
    pub tags: LogTags,
    /// Message.
    pub message: String,
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tags = self.tags.to_string();
        if tags.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "[{tags}] {}", self.message)
        }
    }
}

/// Indexer logger retaining error entries.
#[derive(Debug, Default)]
pub struct IndexLogger {
    retained: Vec<LogEntry>,
}

impl IndexLogger {
    /// Create an empty logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Log an entry.
    pub fn log(&mut self, level: LogLevel, tags: LogTags, message: impl Into<String>) {
        let entry = LogEntry {
            level,
            tags,
            message: message.into(),
        };
        log::log!(target: LOG_TARGET, level.as_log_level(), "{entry}");
        if level.is_retained() {
            self.retained.push(entry);
        }
    }

    /// Log at [`LogLevel::Info`] with the tags of `request`.
    pub fn info(&mut self, request: &QueueRequest, message: impl Into<String>) {
        self.log(LogLevel::Info, LogTags::from_request(request), message);
    }

    /// Log at [`LogLevel::Warning`] with the tags of `request`.
    pub fn warning(&mut self, request: &QueueRequest, message: impl Into<String>) {
        self.log(LogLevel::Warning, LogTags::from_request(request), message);
    }

    /// Log at [`LogLevel::Error`] with the tags of `request`.
    pub fn error(&mut self, request: &QueueRequest, message: impl Into<String>) {
        self.log(LogLevel::Error, LogTags::from_request(request), message);
    }

    /// Retained entries.
    pub fn errors(&self) -> &[LogEntry] {
        &self.retained
    }

    /// Number of retained entries.
    pub fn error_count(&self) -> usize {
        self.retained.len()
    }

    /// Retained entries rendered as strings.
    pub fn error_messages(&self) -> Vec<String> {
        self.retained.iter().map(ToString::to_string).collect()
    }
}
