//! Sift Query: the read side contract.
//!
//! Search providers answer ranked queries against the active index
//! generation. This crate defines what they receive and return, pages
//! through their results, and validates the parameters of the query
//! surface before anything reaches a provider.
//!
//! # Modules
//!
//! - [`error`]: Client-facing [`QueryError`] with status codes
//! - [`options`]: [`SearchOptions`], result rows and counts
//! - [`provider`]: The async [`SearchProvider`] contract
//! - [`paginator`]: [`SearchPaginator`] with a cached count query
//! - [`request`]: Parameter validation for search and autocomplete

#![forbid(unsafe_code)]

pub mod error;
pub mod options;
pub mod paginator;
pub mod provider;
pub mod request;

// Re-export key types at crate root for convenience
pub use error::{QueryError, Result};
pub use options::{SearchCounts, SearchOptions, SearchResultRow};
pub use paginator::{SearchPage, SearchPaginator};
pub use provider::SearchProvider;
pub use request::{AutocompleteRequest, SearchRequest};
