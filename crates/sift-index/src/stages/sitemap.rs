use sift_core::Result;

use super::{Next, QueueHandler};
use crate::request::QueueRequest;
use crate::state::RunState;

/// Resets the sitemap accumulator before the walk and renders it afterwards.
#[derive(Debug, Clone, Copy, Default)]
pub struct SitemapStage;

impl QueueHandler for SitemapStage {
    fn name(&self) -> &'static str {
        "sitemap"
    }

    fn handle(
        &self,
        request: &mut QueueRequest,
        state: &mut RunState,
        next: Next<'_>,
    ) -> Result<()> {
        if !state.sitemap_enabled() {
            return next.run(request, state);
        }

        state.sitemap_mut().reset();
        next.run(request, state)?;
        state.generate_sitemap();
        Ok(())
    }
}
