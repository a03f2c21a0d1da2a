//! Sitemap XML rendering.
//!
//! Chunk files are `<urlset>` documents with the image extension namespace.
//! Index files are `<sitemapindex>` documents whose `<loc>` elements hold a
//! child placeholder instead of a URL; the serving side rewrites it (see
//! [`crate::server`]), so stored files stay host agnostic.

use std::fmt::Write;

use chrono::SecondsFormat;

use crate::entry::SitemapEntry;

/// Namespace of `<urlset>` and `<sitemapindex>`.
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Namespace of the image extension.
pub const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// Placeholder referencing a chunk from an index file.
pub fn child_placeholder(chunk_id: &str) -> String {
    format!("{{{{child:{chunk_id}}}}}")
}

/// Escape text for XML content and attribute values.
///
/// ```
/// use sift_sitemap::xml::escape;
///
/// assert_eq!(escape("a&b <c> \"d\" 'e'"), "a&amp;b &lt;c&gt; &quot;d&quot; &apos;e&apos;");
/// ```
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Render a `<urlset>` document.
pub fn render_urlset(entries: &[SitemapEntry]) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<urlset xmlns=\"{SITEMAP_NS}\" xmlns:image=\"{IMAGE_NS}\">");

    for entry in entries {
        xml.push_str("  <url>\n");
        let _ = writeln!(xml, "    <loc>{}</loc>", escape(&entry.url));
        if let Some(modified) = entry.last_modified {
            let _ = writeln!(
                xml,
                "    <lastmod>{}</lastmod>",
                modified.to_rfc3339_opts(SecondsFormat::Secs, true)
            );
        }
        if let Some(frequency) = entry.change_frequency {
            let _ = writeln!(xml, "    <changefreq>{frequency}</changefreq>");
        }
        let _ = writeln!(xml, "    <priority>{:.1}</priority>", entry.priority);
        if let Some(image) = &entry.image {
            xml.push_str("    <image:image>\n");
            let _ = writeln!(xml, "      <image:loc>{}</image:loc>", escape(&image.url));
            if let Some(caption) = image.caption.as_deref().filter(|c| !c.is_empty()) {
                let _ = writeln!(xml, "      <image:caption>{}</image:caption>", escape(caption));
            }
            xml.push_str("    </image:image>\n");
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

/// Render a `<sitemapindex>` referencing chunks by placeholder.
pub fn render_index<'a>(chunk_ids: impl IntoIterator<Item = &'a str>) -> String {
    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(xml, "<sitemapindex xmlns=\"{SITEMAP_NS}\">");
    for id in chunk_ids {
        let _ = writeln!(
            xml,
            "  <sitemap>\n    <loc>{}</loc>\n  </sitemap>",
            child_placeholder(id)
        );
    }
    xml.push_str("</sitemapindex>\n");
    xml
}
