//! Sitemap generation.
//!
//! Serializes derived sitemap entries into the sitemaps.org XML format.

use std::io::Write;

use quire_core::SitemapEntry;
use thiserror::Error;
use tracing::debug;

/// Sitemap generation errors.
#[derive(Debug, Error)]
pub enum SitemapError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for sitemap operations.
pub type Result<T> = std::result::Result<T, SitemapError>;

/// Sitemap generator.
#[derive(Debug, Default, Clone, Copy)]
pub struct SitemapGenerator;

impl SitemapGenerator {
    /// Create a new sitemap generator.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Generate sitemap XML, one `<url>` per entry in order.
    pub fn generate(&self, entries: &[SitemapEntry]) -> String {
        debug!(count = entries.len(), "generating sitemap");

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        for entry in entries {
            xml.push_str(&self.entry_to_xml(entry));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    fn entry_to_xml(&self, entry: &SitemapEntry) -> String {
        let mut xml = String::from("  <url>\n");

        xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(&entry.loc)));
        xml.push_str(&format!(
            "    <lastmod>{}</lastmod>\n",
            entry.lastmod.format("%Y-%m-%d")
        ));
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.changefreq.as_str()
        ));
        xml.push_str(&format!(
            "    <priority>{}</priority>\n",
            entry.priority_str()
        ));

        xml.push_str("  </url>\n");
        xml
    }

    /// Write sitemap to a writer.
    pub fn write_to<W: Write>(&self, entries: &[SitemapEntry], writer: &mut W) -> Result<()> {
        writer.write_all(self.generate(entries).as_bytes())?;
        Ok(())
    }
}

/// Escape special XML characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use quire_core::derive::ChangeFreq;

    use super::*;

    fn entry(loc: &str, priority: f32, changefreq: ChangeFreq) -> SitemapEntry {
        SitemapEntry {
            loc: loc.to_string(),
            lastmod: Utc.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
            changefreq,
            priority,
        }
    }

    #[test]
    fn test_generate_sitemap() {
        let entries = vec![
            entry("https://example.com", 1.0, ChangeFreq::Weekly),
            entry("https://example.com/about", 0.8, ChangeFreq::Monthly),
        ];

        let xml = SitemapGenerator::new().generate(&entries);

        assert!(xml.starts_with(r#"<?xml version="1.0""#));
        assert!(xml.contains("<urlset"));
        assert!(xml.contains("<loc>https://example.com/about</loc>"));
        assert!(xml.contains("<lastmod>2024-01-15</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert_eq!(xml.matches("<url>").count(), 2);

        let root = xml.find("<loc>https://example.com</loc>").unwrap();
        let about = xml.find("<loc>https://example.com/about</loc>").unwrap();
        assert!(root < about);
    }

    #[test]
    fn test_empty_sitemap() {
        let xml = SitemapGenerator::new().generate(&[]);
        assert!(xml.contains("<urlset"));
        assert!(xml.ends_with("</urlset>\n"));
        assert!(!xml.contains("<url>"));
    }

    #[test]
    fn test_loc_is_escaped() {
        let entries = vec![entry("https://example.com/?a=1&b=2", 0.8, ChangeFreq::Monthly)];
        let xml = SitemapGenerator::new().generate(&entries);
        assert!(xml.contains("<loc>https://example.com/?a=1&amp;b=2</loc>"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("a & b"), "a &amp; b");
        assert_eq!(escape_xml("<tag>"), "&lt;tag&gt;");
        assert_eq!(escape_xml("\"quoted\""), "&quot;quoted&quot;");
    }
}
