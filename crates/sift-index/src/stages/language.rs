use std::sync::Arc;

use sift_core::{DomainConfig, Error, LanguageConfig, Result, SiteConfig};

use super::{Next, QueueHandler};
use crate::request::QueueRequest;
use crate::state::RunState;

/// Resolves the languages indexed for a (site, domain) pair.
pub trait LanguageProvider: Send + Sync {
    /// Languages to walk. An error aborts the (site, domain) branch.
    fn languages(
        &self,
        site: &SiteConfig,
        domain_key: &str,
        domain: &DomainConfig,
    ) -> Result<Vec<LanguageConfig>>;
}

/// Languages from the site configuration, restricted by the domain.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConfiguredLanguages;

impl LanguageProvider for ConfiguredLanguages {
    fn languages(
        &self,
        site: &SiteConfig,
        domain_key: &str,
        domain: &DomainConfig,
    ) -> Result<Vec<LanguageConfig>> {
        if site.languages.is_empty() {
            return Err(Error::operation(format!(
                "site '{}' has no languages configured",
                site.id
            )));
        }
        let languages: Vec<LanguageConfig> = site
            .languages
            .iter()
            .filter(|language| domain.allows_language(&language.code))
            .cloned()
            .collect();
        if languages.is_empty() {
            log::debug!(
                "Domain '{domain_key}' indexes none of the languages of site '{}'",
                site.id
            );
        }
        Ok(languages)
    }
}

/// Enumerates the languages of the current (site, domain).
pub struct LanguageStage {
    provider: Arc<dyn LanguageProvider>,
}

impl LanguageStage {
    /// Stage resolving languages through `provider`.
    pub fn new(provider: Arc<dyn LanguageProvider>) -> Self {
        Self { provider }
    }
}

impl QueueHandler for LanguageStage {
    fn name(&self) -> &'static str {
        "language"
    }

    fn handle(
        &self,
        request: &mut QueueRequest,
        state: &mut RunState,
        next: Next<'_>,
    ) -> Result<()> {
        let languages = self.provider.languages(
            request.site()?,
            request.domain_key()?,
            request.domain()?,
        )?;

        for language in languages {
            request.set_language(Some(language));
            let result = next.run(request, state);
            let result = state.isolate(request, result, "Language failed");
            request.set_language(None);
            result?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for LanguageStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LanguageStage").finish_non_exhaustive()
    }
}
