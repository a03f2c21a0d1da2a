use std::sync::Arc;

use sift_core::Result;

use super::{Next, QueueHandler};
use crate::record::RecordIndexer;
use crate::request::QueueRequest;
use crate::state::RunState;

/// Enumerates the record indexers the current search domain uses.
pub struct IndexerStage {
    indexers: Vec<Arc<dyn RecordIndexer>>,
}

impl IndexerStage {
    /// Stage over the registered record indexers.
    pub fn new(indexers: Vec<Arc<dyn RecordIndexer>>) -> Self {
        Self { indexers }
    }
}

impl QueueHandler for IndexerStage {
    fn name(&self) -> &'static str {
        "indexer"
    }

    fn handle(
        &self,
        request: &mut QueueRequest,
        state: &mut RunState,
        next: Next<'_>,
    ) -> Result<()> {
        let domain = request.domain()?;
        let selected: Vec<Arc<dyn RecordIndexer>> = self
            .indexers
            .iter()
            .filter(|indexer| domain.uses_indexer(indexer.name()))
            .cloned()
            .collect();

        for indexer in selected {
            request.set_indexer(Some(indexer));
            let result = next.run(request, state);
            let result = state.isolate(request, result, "Record indexer failed");
            request.set_indexer(None);
            result?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for IndexerStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.indexers.iter().map(|i| i.name()).collect();
        f.debug_struct("IndexerStage")
            .field("indexers", &names)
            .finish()
    }
}
