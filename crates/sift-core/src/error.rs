//! Error types for sift-core.
//!
//! Every Sift library crate reports failures through this error type (or wraps
//! it), so the indexing pipeline can decide per variant whether a failure is
//! isolated to one node, one branch of the walk, or the whole run.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for Sift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur across the Sift crates.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// I/O failure, with the path that was being accessed.
    #[error("I/O error at {path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Invalid or inconsistent configuration.
    #[error("Configuration error: {message}")]
    Config {
        /// What is wrong with the configuration.
        message: String,
    },

    /// Input could not be parsed.
    #[error("Parse error: {message}")]
    Parse {
        /// What failed to parse.
        message: String,
    },

    /// A named entity does not exist.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// Kind of entity (site, domain, chunk, ...).
        kind: String,
        /// Key that was looked up.
        key: String,
    },

    /// A queue scope was read before the stage resolving it had run.
    #[error("Queue scope '{scope}' is not resolved yet")]
    NotResolved {
        /// Scope name (site, domain, language, environment, indexer, record).
        scope: &'static str,
    },

    /// A record could not be converted into an index node.
    #[error("Conversion error: {message}")]
    Conversion {
        /// Human-readable description.
        message: String,
    },

    /// Writing to or activating the index failed.
    #[error("Persistence error: {message}")]
    Persistence {
        /// Human-readable description.
        message: String,
    },

    /// Generic operation failure.
    #[error("Operation failed: {message}")]
    Operation {
        /// Human-readable description.
        message: String,
    },

    /// JSON serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns whether this error must abort a whole indexing run.
    ///
    /// Configuration and persistence failures are fatal; everything else is
    /// isolated to the node or branch that produced it.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Config { .. } | Error::Persistence { .. })
    }

    /// Creates an I/O error carrying the offending path.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Error::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a parse error.
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Error::Parse {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found<K: Into<String>, S: Into<String>>(key: K, kind: S) -> Self {
        Error::NotFound {
            kind: kind.into(),
            key: key.into(),
        }
    }

    /// Creates a conversion error.
    pub fn conversion<S: Into<String>>(message: S) -> Self {
        Error::Conversion {
            message: message.into(),
        }
    }

    /// Creates a persistence error.
    pub fn persistence<S: Into<String>>(message: S) -> Self {
        Error::Persistence {
            message: message.into(),
        }
    }

    /// Creates a generic operation error.
    pub fn operation<S: Into<String>>(message: S) -> Self {
        Error::Operation {
            message: message.into(),
        }
    }
}
