use std::sync::Arc;

use sift_core::{IndexNode, NodeRow, Result};

use super::{Next, QueueHandler};
use crate::record::{Record, RecordIndexer, RecordRef};
use crate::request::QueueRequest;
use crate::state::RunState;

/// Converts every record of the current indexer into a node.
///
/// Innermost stage: a failing record is logged and counted, the remaining
/// records are still converted.
#[derive(Debug, Clone, Copy, Default)]
pub struct NodeStage;

impl QueueHandler for NodeStage {
    fn name(&self) -> &'static str {
        "node"
    }

    fn handle(
        &self,
        request: &mut QueueRequest,
        state: &mut RunState,
        _next: Next<'_>,
    ) -> Result<()> {
        let indexer = Arc::clone(request.indexer()?);
        let records = indexer.resolve(request)?;

        for record in records {
            let record = match record {
                Ok(record) => record,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    state.stats_mut().records_failed += 1;
                    state
                        .logger_mut()
                        .error(request, format!("Record could not be read: {e}"));
                    continue;
                }
            };

            request.set_record(Some(RecordRef::of(&record)));
            let result = convert(indexer.as_ref(), &record, request, state);
            if result.as_ref().is_err_and(|e| !e.is_fatal()) {
                state.stats_mut().records_failed += 1;
            }
            let result = state.isolate(request, result, "Record conversion failed");
            request.set_record(None);
            result?;
        }
        Ok(())
    }
}

fn convert(
    indexer: &dyn RecordIndexer,
    record: &Record,
    request: &QueueRequest,
    state: &mut RunState,
) -> Result<()> {
    let hooks = state.hooks();
    if !hooks.before_convert(record, request) {
        state.stats_mut().records_skipped += 1;
        return Ok(());
    }

    let mut node = IndexNode::new(
        record.kind.clone(),
        record.id.clone(),
        request.node_scope()?,
    );
    indexer.index(record, &mut node, request)?;
    hooks.after_convert(&mut node, request);

    let domain = request.domain()?;
    if !domain.disable_priority_decay {
        node.apply_priority_decay(state.today());
    }
    if domain.hide_from_sitemap {
        node.add_to_sitemap = false;
    }

    let url = request.environment()?.absolute_url(&node.link);
    let analyzer = state.analyzer(request.domain_key()?, domain, &node.scope().language);
    let terms = analyzer.analyze(&node);
    state.learner_mut().learn(&terms.stats);

    if state.sitemap_enabled() {
        state.sitemap_mut().add_node(&node, &url);
    }
    state.buffer(NodeRow::from_node(&node, url), terms.rows)?;
    state.stats_mut().nodes_indexed += 1;
    Ok(())
}
