//! Sift Core: shared types, configuration, errors and the repository contract.
//!
//! This crate has no internal Sift dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`config`]: TOML configuration model and validation
//! - [`ids`]: Node guids and URL hashes
//! - [`node`]: The [`IndexNode`] entity
//! - [`rows`]: Persistable node and word rows
//! - [`repository`]: Write-side [`IndexRepository`] contract

#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod ids;
pub mod node;
pub mod repository;
pub mod rows;

// Re-export key types at crate root for convenience
pub use config::{
    DomainConfig, LanguageConfig, SiftConfig, SiteConfig, SourceConfig, SourceKind,
};
pub use error::{Error, Result};
pub use ids::{node_guid, normalize_id, url_hash};
pub use node::{IndexNode, NodeImage, NodeScope};
pub use repository::{ActivationStats, IndexRepository};
pub use rows::{NodeRow, WordRow};
