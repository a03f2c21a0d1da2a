//! Identifier and hash utilities.
//!
//! Index nodes are keyed by a guid derived from where the node came from
//! (record kind and id) and which index partition it lands in (site,
//! language, search domain). Sitemap entries are deduplicated by URL hash.

/// Normalize an identifier to lowercase kebab-case.
///
/// # Examples
///
/// ```
/// use sift_core::ids::normalize_id;
///
/// assert_eq!(normalize_id("News Articles"), "news-articles");
/// assert_eq!(normalize_id("tx_news_domain"), "tx-news-domain");
/// assert_eq!(normalize_id("  Mixed   Case  "), "mixed-case");
/// ```
pub fn normalize_id(id: &str) -> String {
    id.trim()
        .to_lowercase()
        .replace('_', " ")
        .split_whitespace()
        .collect::<Vec<&str>>()
        .join("-")
}

/// Compute the globally unique key of an index node.
///
/// The same record indexed into another site, language or search domain
/// yields a different guid, so one record can live in several partitions.
///
/// # Examples
///
/// ```
/// use sift_core::ids::node_guid;
///
/// let a = node_guid("page", "42", "main", "en", "default");
/// let b = node_guid("page", "42", "main", "de", "default");
/// assert_ne!(a, b);
/// assert_eq!(a, node_guid("page", "42", "main", "en", "default"));
/// assert_eq!(a.len(), 32);
/// ```
pub fn node_guid(kind: &str, record_id: &str, site: &str, language: &str, domain: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    for part in [kind, record_id, site, language, domain] {
        hasher.update(part.as_bytes());
        // Separator byte keeps ("ab", "c") and ("a", "bc") apart.
        hasher.update(&[0x1f]);
    }
    hasher.finalize().to_hex()[..32].to_string()
}

/// Hash a URL for sitemap deduplication.
pub fn url_hash(url: &str) -> String {
    blake3::hash(url.as_bytes()).to_hex().to_string()
}
