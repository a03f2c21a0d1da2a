use sift_core::{Error, Result};

use super::{Next, QueueHandler};
use crate::request::{QueueRequest, RenderContext};
use crate::state::RunState;

/// Sets up the rendering context record indexers resolve links in.
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvironmentStage;

impl QueueHandler for EnvironmentStage {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn handle(
        &self,
        request: &mut QueueRequest,
        state: &mut RunState,
        next: Next<'_>,
    ) -> Result<()> {
        let site = request.site()?;
        let base_url = site.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::operation(format!(
                "site '{}' has no absolute base URL ('{base_url}')",
                site.id
            )));
        }
        let context = RenderContext::new(base_url, request.language()?);

        request.set_environment(Some(context));
        let result = next.run(request, state);
        request.set_environment(None);
        result
    }
}
