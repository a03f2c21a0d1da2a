use sift_core::Result;

use super::{Next, QueueHandler};
use crate::request::QueueRequest;
use crate::state::RunState;

/// Enumerates the configured sites.
#[derive(Debug, Clone, Copy, Default)]
pub struct SiteStage;

impl QueueHandler for SiteStage {
    fn name(&self) -> &'static str {
        "site"
    }

    fn handle(
        &self,
        request: &mut QueueRequest,
        state: &mut RunState,
        next: Next<'_>,
    ) -> Result<()> {
        let count = request.config().sites.len();
        for index in 0..count {
            request.set_site(Some(index));
            let result = next.run(request, state);
            let result = state.isolate(request, result, "Site failed");
            request.set_site(None);
            result?;
        }
        Ok(())
    }
}
