//! Sift Index: the indexing pipeline.
//!
//! Walks every configured site, search domain, language and record source,
//! converts records into [`sift_core::IndexNode`]s, extracts their terms,
//! collects sitemap entries and writes everything to an
//! [`sift_core::IndexRepository`] as a pending generation that is activated
//! atomically at the end of the run.
//!
//! # Modules
//!
//! - [`pipeline`]: [`Indexer`] and its [`RunReport`]
//! - [`stages`]: The nested queue stages
//! - [`request`]: [`QueueRequest`] scope and [`RenderContext`]
//! - [`record`]: Raw records and the [`RecordIndexer`] contract
//! - [`sources`]: JSON record store and the page/table indexers
//! - [`transform`]: Record to text transformers
//! - [`tree`]: Page trees walked depth first
//! - [`terms`]: Term rows and statistics per node
//! - [`hooks`]: Extension points of a run
//! - [`logger`]: Tagged indexer log
//! - [`state`]: Per-run mutable state

#![forbid(unsafe_code)]

pub mod hooks;
pub mod logger;
pub mod pipeline;
pub mod record;
pub mod request;
pub mod sources;
pub mod stages;
pub mod state;
pub mod terms;
pub mod transform;
pub mod tree;

// Re-export key types at crate root for convenience
pub use hooks::{ActivationSummary, IndexerHooks, NoHooks};
pub use logger::{IndexLogger, LogEntry, LogLevel, LogTags};
pub use pipeline::{Indexer, RunReport};
pub use record::{Record, RecordIndexer, RecordIter, RecordRef};
pub use request::{QueueRequest, RenderContext};
pub use sources::{JsonRecordStore, PageIndexer, RecordTableIndexer, record_indexers};
pub use stages::{ConfiguredLanguages, LanguageProvider};
pub use transform::{ContentTransformer, TransformerRegistry};
pub use tree::ContentTree;
