//! Sift Store: the in-memory index.
//!
//! [`MemoryIndex`] takes the rows written by an indexing run, keeps them
//! pending until activation, and then swaps them in as the new active
//! generation in one step. The same type answers ranked searches, counts,
//! autocompletion and sitemap listings over the active generation.
//!
//! # Modules
//!
//! - [`generation`]: An immutable generation with its posting lists
//! - [`memory`]: [`MemoryIndex`], the repository and search provider
//! - [`ranking`]: Matching and scoring rules
//! - [`snapshot`]: Atomic JSON snapshots of the active generation
//! - [`snippet`]: Content match excerpts around query words

#![forbid(unsafe_code)]

pub mod generation;
pub mod memory;
pub mod ranking;
pub mod snapshot;
pub mod snippet;

// Re-export key types at crate root for convenience
pub use generation::{Generation, GenerationData, Posting};
pub use memory::{IndexStats, MemoryIndex};
pub use ranking::{Hit, PhoneticOverrides};
