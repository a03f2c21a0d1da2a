//! Write-side repository contract.
//!
//! The pipeline writes every row as part of a *pending* generation and only
//! promotes it with [`IndexRepository::activate_new_and_remove_old`]. Readers
//! must observe either the complete previous generation or the complete new
//! one; implementations swap a generation marker instead of deleting and
//! re-inserting rows.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::rows::{NodeRow, WordRow};

/// Outcome of an activation swap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivationStats {
    /// Generation number that became active.
    pub generation: u64,
    /// Nodes now active.
    pub activated: usize,
    /// Previously active nodes not refreshed in this run.
    pub removed: usize,
}

/// Storage contract used by the indexing pipeline.
///
/// Calls arrive from the single pipeline thread; implementations must still
/// be safe against concurrent readers.
pub trait IndexRepository: Send + Sync {
    /// Drop rows left pending by an earlier, unfinished run.
    ///
    /// Returns the number of pending nodes removed.
    fn remove_inactive_nodes(&self) -> Result<usize>;

    /// Append node and word rows to the pending generation.
    fn persist(&self, nodes: Vec<NodeRow>, words: Vec<WordRow>) -> Result<()>;

    /// Record the over-common terms learned during the run.
    fn persist_nerf_words(&self, words: Vec<String>) -> Result<()>;

    /// Promote the pending generation and retire everything else, atomically
    /// from the reader's point of view.
    fn activate_new_and_remove_old(&self) -> Result<ActivationStats>;
}
