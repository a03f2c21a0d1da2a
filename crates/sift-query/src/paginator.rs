//! Self-paginating search results.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::OnceCell;

use crate::error::Result;
use crate::options::{SearchOptions, SearchResultRow};
use crate::provider::SearchProvider;

/// One page of results.
#[derive(Debug, Clone, Serialize)]
pub struct SearchPage {
    /// Rows of the page.
    pub items: Vec<SearchResultRow>,
    /// 1-based page number.
    pub page: usize,
    /// Requested page size.
    pub page_size: usize,
    /// All matching rows.
    pub total: usize,
    /// Number of pages.
    pub page_count: usize,
}

/// Pages through the results of one search.
///
/// Items are fetched per window; the total comes from the provider's
/// separate count query, which runs at most once per paginator. Pages may be
/// requested in any order.
pub struct SearchPaginator {
    provider: Arc<dyn SearchProvider>,
    options: SearchOptions,
    count: OnceCell<usize>,
}

impl SearchPaginator {
    /// Paginator for `options`; its window fields are ignored.
    pub fn new(provider: Arc<dyn SearchProvider>, options: SearchOptions) -> Self {
        Self {
            provider,
            options,
            count: OnceCell::new(),
        }
    }

    /// Search options.
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Rows `offset .. offset + limit` of the ranked result list.
    pub async fn items_for(&self, offset: usize, limit: usize) -> Result<Vec<SearchResultRow>> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let window = self.options.window(offset, limit);
        log::debug!(
            "Fetching results {offset}..{} from {}",
            offset.saturating_add(limit),
            self.provider.name()
        );
        Ok(self.provider.find_search_results(&window).await?)
    }

    /// Number of matching rows.
    pub async fn item_count(&self) -> Result<usize> {
        let count = self
            .count
            .get_or_try_init(|| async {
                self.provider
                    .find_search_counts(&self.options)
                    .await
                    .map(|counts| counts.total)
            })
            .await?;
        Ok(*count)
    }

    /// Page `page` (1-based; 0 is read as 1) of `page_size` rows.
    pub async fn page(&self, page: usize, page_size: usize) -> Result<SearchPage> {
        let page = page.max(1);
        let page_size = page_size.max(1);
        let items = self
            .items_for((page - 1).saturating_mul(page_size), page_size)
            .await?;
        let total = self.item_count().await?;
        Ok(SearchPage {
            items,
            page,
            page_size,
            total,
            page_count: total.div_ceil(page_size),
        })
    }
}

impl std::fmt::Debug for SearchPaginator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchPaginator")
            .field("provider", &self.provider.name())
            .field("domain", &self.options.domain)
            .field("count", &self.count.get())
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use sift_core::NodeRow;

    use crate::options::SearchCounts;

    struct FixedProvider {
        rows: Vec<SearchResultRow>,
        count_calls: AtomicUsize,
    }

    impl FixedProvider {
        fn with_rows(n: usize) -> Arc<Self> {
            let rows = (0..n)
                .map(|i| SearchResultRow {
                    guid: format!("g{i:03}"),
                    title: format!("Result {i}"),
                    description: String::new(),
                    url: format!("https://example.org/{i}"),
                    tag: "pages".to_string(),
                    language: "en".to_string(),
                    timestamp: None,
                    image: None,
                    content_match: String::new(),
                    score: (n - i) as f64,
                })
                .collect();
            Arc::new(Self {
                rows,
                count_calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl SearchProvider for FixedProvider {
        async fn find_search_results(
            &self,
            options: &SearchOptions,
        ) -> sift_core::Result<Vec<SearchResultRow>> {
            Ok(self
                .rows
                .iter()
                .skip(options.offset)
                .take(options.max_items)
                .cloned()
                .collect())
        }

        async fn find_search_counts(
            &self,
            _options: &SearchOptions,
        ) -> sift_core::Result<SearchCounts> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            Ok(SearchCounts {
                total: self.rows.len(),
                ..Default::default()
            })
        }

        async fn find_autocomplete_results(
            &self,
            _prefix: &str,
            _options: &SearchOptions,
        ) -> sift_core::Result<Vec<String>> {
            Ok(Vec::new())
        }

        async fn find_sitemap_rows(&self, _domain: &str) -> sift_core::Result<Vec<NodeRow>> {
            Ok(Vec::new())
        }

        fn name(&self) -> &str {
            "fixed"
        }
    }

    fn paginator(provider: Arc<FixedProvider>) -> SearchPaginator {
        SearchPaginator::new(
            provider,
            SearchOptions::new(sift_fts::parse("result"), "default"),
        )
    }

    // ------------------------------------------------------------------------
    // Windows
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_out_of_order_pages_are_consistent() {
        let provider = FixedProvider::with_rows(25);
        let paginator = paginator(Arc::clone(&provider));

        let third = paginator.items_for(20, 10).await.unwrap();
        let first = paginator.items_for(0, 10).await.unwrap();
        let second = paginator.items_for(10, 10).await.unwrap();

        assert_eq!(third.len(), 5);
        let all: Vec<String> = first
            .iter()
            .chain(&second)
            .chain(&third)
            .map(|r| r.guid.clone())
            .collect();
        let expected: Vec<String> = provider.rows.iter().map(|r| r.guid.clone()).collect();
        assert_eq!(all, expected);
    }

    #[tokio::test]
    async fn test_zero_limit() {
        let paginator = paginator(FixedProvider::with_rows(3));
        assert!(paginator.items_for(0, 0).await.unwrap().is_empty());
    }

    // ------------------------------------------------------------------------
    // Counts
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_count_query_runs_once() {
        let provider = FixedProvider::with_rows(7);
        let paginator = paginator(Arc::clone(&provider));

        assert_eq!(paginator.item_count().await.unwrap(), 7);
        assert_eq!(paginator.item_count().await.unwrap(), 7);
        paginator.page(2, 3).await.unwrap();
        assert_eq!(provider.count_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_page_metadata() {
        let paginator = paginator(FixedProvider::with_rows(7));
        let page = paginator.page(3, 3).await.unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 7);
        assert_eq!(page.page_count, 3);

        let clamped = paginator.page(0, 0).await.unwrap();
        assert_eq!(clamped.page, 1);
        assert_eq!(clamped.page_size, 1);
    }

    #[tokio::test]
    async fn test_page_past_the_end_is_empty() {
        let paginator = paginator(FixedProvider::with_rows(7));
        let page = paginator.page(usize::MAX, 100).await.unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.page, usize::MAX);
        assert_eq!(page.total, 7);
        assert_eq!(page.page_count, 1);
    }
}
