//! Error types for sift-cli

use thiserror::Error;

/// Result type alias for sift-cli operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in sift-cli
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from sift-core
    #[error(transparent)]
    Core(#[from] sift_core::Error),

    /// Rejected query parameters or a failed provider call
    #[error("Query error: {0}")]
    Query(#[from] sift_query::QueryError),
}
