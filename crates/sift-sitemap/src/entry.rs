//! Sitemap entries and the priority mapping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sift_core::{NodeImage, NodeRow};

/// `<changefreq>` values Sift emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeFrequency {
    /// High priority content.
    Daily,
    /// Slightly above average content.
    Weekly,
    /// Average and below.
    Monthly,
}

impl ChangeFrequency {
    /// Tier for an internal node priority.
    ///
    /// The priority is scaled to `[-1, 1]`; `<= 0` is monthly, below `0.3`
    /// weekly, anything higher daily.
    pub fn for_priority(priority: i32) -> Self {
        let scaled = f64::from(priority) / 100.0;
        if scaled <= 0.0 {
            Self::Monthly
        } else if scaled < 0.3 {
            Self::Weekly
        } else {
            Self::Daily
        }
    }

    /// XML text value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl std::fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map an internal priority (`-100..=100` nominal) to a sitemap priority in
/// `[0, 1]`, rounded to one decimal.
///
/// ```
/// use sift_sitemap::entry::sitemap_priority;
///
/// assert_eq!(sitemap_priority(100), 1.0);
/// assert_eq!(sitemap_priority(0), 0.5);
/// assert_eq!(sitemap_priority(-100), 0.0);
/// assert_eq!(sitemap_priority(200), 1.0);
/// ```
pub fn sitemap_priority(priority: i32) -> f64 {
    let fraction = (f64::from(priority) + 100.0) / 200.0;
    ((fraction * 10.0).round() / 10.0).clamp(0.0, 1.0)
}

/// One `<url>` element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapEntry {
    /// Absolute URL.
    pub url: String,
    /// Last modification.
    pub last_modified: Option<DateTime<Utc>>,
    /// Image with optional caption.
    pub image: Option<NodeImage>,
    /// Priority in `[0, 1]`.
    pub priority: f64,
    /// Change frequency, when enabled.
    pub change_frequency: Option<ChangeFrequency>,
}

impl SitemapEntry {
    /// Entry for a node rendered at `url`.
    pub fn new(
        url: impl Into<String>,
        priority: i32,
        last_modified: Option<DateTime<Utc>>,
        image: Option<NodeImage>,
        with_change_frequency: bool,
    ) -> Self {
        Self {
            url: url.into(),
            last_modified,
            image,
            priority: sitemap_priority(priority),
            change_frequency: with_change_frequency
                .then(|| ChangeFrequency::for_priority(priority)),
        }
    }

    /// Entry for a stored node row.
    pub fn from_row(row: &NodeRow, with_change_frequency: bool) -> Self {
        Self::new(
            row.url.clone(),
            row.priority,
            row.timestamp,
            row.image.clone(),
            with_change_frequency,
        )
    }
}
