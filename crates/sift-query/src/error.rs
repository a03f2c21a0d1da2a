//! Error types for sift-query.
//!
//! [`QueryError`] is what the query surface reports to its clients. Every
//! variant maps to an HTTP-style status via [`QueryError::status_code`].

use thiserror::Error;

/// Result type alias for query operations.
pub type Result<T> = std::result::Result<T, QueryError>;

/// Errors of the query surface.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum QueryError {
    /// A required parameter is absent or blank.
    #[error("Missing required parameter '{0}'")]
    MissingParameter(&'static str),

    /// A parameter could not be read.
    #[error("Invalid value for parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// What is wrong with it.
        message: String,
    },

    /// The requested search domain is not configured.
    #[error("Unknown search domain '{0}'")]
    UnknownDomain(String),

    /// The requested site is not configured.
    #[error("Unknown site '{0}'")]
    UnknownSite(String),

    /// Error from sift-core, typically raised by a search provider.
    #[error("Core error: {0}")]
    Core(#[from] sift_core::Error),
}

impl QueryError {
    /// Create an invalid parameter error.
    pub fn invalid(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// HTTP-style status code: 400 for bad input, 404 for unknown scopes,
    /// 500 for provider failures.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingParameter(_) | Self::InvalidParameter { .. } => 400,
            Self::UnknownDomain(_) | Self::UnknownSite(_) => 404,
            Self::Core(sift_core::Error::Config { .. } | sift_core::Error::Parse { .. }) => 400,
            Self::Core(sift_core::Error::NotFound { .. }) => 404,
            Self::Core(_) => 500,
        }
    }

    /// Whether the caller is at fault.
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }
}
