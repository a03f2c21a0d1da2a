use sift_core::Result;

use super::{Next, QueueHandler};
use crate::request::QueueRequest;
use crate::state::RunState;

/// Enumerates the search domains of the current site.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomainStage;

impl QueueHandler for DomainStage {
    fn name(&self) -> &'static str {
        "domain"
    }

    fn handle(
        &self,
        request: &mut QueueRequest,
        state: &mut RunState,
        next: Next<'_>,
    ) -> Result<()> {
        let keys = request.site()?.domains.clone();
        for key in keys {
            request.set_domain(Some(key));
            let result = next.run(request, state);
            let result = state.isolate(request, result, "Search domain failed");
            request.set_domain(None);
            result?;
        }
        Ok(())
    }
}
