//! Pipeline stages.
//!
//! The walk is a chain of [`QueueHandler`]s. Each enumerating stage pushes
//! one value of its scope into the [`QueueRequest`], runs the rest of the
//! chain through [`Next`], and clears the value again. A failure below a
//! value is logged with the request tags and the stage moves on to the next
//! value; only fatal errors travel all the way up.
//!
//! Canonical order:
//!
//! | Stage | Scope |
//! |-------|-------|
//! | [`SitemapStage`] | sitemap accumulator setup and rendering |
//! | [`SiteStage`] | configured sites |
//! | [`DomainStage`] | search domains of the site |
//! | [`LanguageStage`] | languages of the (site, domain) |
//! | [`EnvironmentStage`] | rendering context |
//! | [`IndexerStage`] | record indexers used by the domain |
//! | [`NodeStage`] | records yielded by the indexer |

mod domain;
mod environment;
mod indexer;
mod language;
mod node;
mod site;
mod sitemap;

pub use domain::DomainStage;
pub use environment::EnvironmentStage;
pub use indexer::IndexerStage;
pub use language::{ConfiguredLanguages, LanguageProvider, LanguageStage};
pub use node::NodeStage;
pub use site::SiteStage;
pub use sitemap::SitemapStage;

use sift_core::Result;

use crate::request::QueueRequest;
use crate::state::RunState;

/// One stage of the indexing walk.
pub trait QueueHandler: Send + Sync {
    /// Stage name for diagnostics.
    fn name(&self) -> &'static str;

    /// Handle the request, delegating to `next` for each scope value.
    fn handle(
        &self,
        request: &mut QueueRequest,
        state: &mut RunState,
        next: Next<'_>,
    ) -> Result<()>;
}

/// The remainder of the stage chain.
#[derive(Clone, Copy)]
pub struct Next<'a> {
    handlers: &'a [Box<dyn QueueHandler>],
}

impl<'a> Next<'a> {
    /// Chain starting at the first handler.
    pub fn new(handlers: &'a [Box<dyn QueueHandler>]) -> Self {
        Self { handlers }
    }

    /// Run the next handler, if any.
    pub fn run(self, request: &mut QueueRequest, state: &mut RunState) -> Result<()> {
        match self.handlers.split_first() {
            Some((handler, rest)) => {
                log::trace!("Entering stage {}", handler.name());
                handler.handle(request, state, Next { handlers: rest })
            }
            None => Ok(()),
        }
    }

    /// Whether no handler is left.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for Next<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.handlers.iter().map(|h| h.name()).collect();
        f.debug_struct("Next").field("handlers", &names).finish()
    }
}
