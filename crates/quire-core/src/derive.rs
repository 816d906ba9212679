//! Derived artifacts.
//!
//! Pure functions that turn pages into feed items, sitemap entries, slugs and
//! reading-time estimates. Nothing here touches the filesystem or fails:
//! malformed input (an unparseable date, say) falls back to a documented
//! default.

use chrono::{DateTime, NaiveDate, Utc};

use crate::{document::Page, validate::parse_date};

/// Assumed reading speed.
pub const WORDS_PER_MINUTE: usize = 200;

/// Length of a feed description cut from page content, in characters.
pub const SUMMARY_CHARS: usize = 200;

/// Base URL used when none is configured.
pub const DEFAULT_BASE_URL: &str = "https://example.com";

/// Estimate reading time in whole minutes, rounded up.
///
/// Empty content reads in zero minutes; anything else takes at least one.
pub fn estimate_reading_time(content: &str) -> u32 {
    let words = content.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE) as u32
}

/// Turn a title into a URL slug.
///
/// Lowercases, drops everything outside `[a-z0-9\s-]`, joins whitespace runs
/// with a hyphen, collapses repeated hyphens and trims them from both ends.
pub fn slugify(title: &str) -> String {
    let lowered = title.to_lowercase();
    let mut slug = String::with_capacity(lowered.len());

    for c in lowered.chars() {
        let mapped = match c {
            'a'..='z' | '0'..='9' => c,
            '-' => '-',
            c if c.is_whitespace() => '-',
            _ => continue,
        };
        if mapped == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(mapped);
    }

    slug.trim_matches('-').to_string()
}

/// Normalize a configured base URL, falling back to [`DEFAULT_BASE_URL`].
pub fn resolve_base_url(base_url: Option<&str>) -> String {
    match base_url.map(|u| u.trim().trim_end_matches('/')) {
        Some(url) if !url.is_empty() => url.to_string(),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

/// Absolute URL of a page.
pub fn page_url(base_url: &str, slug: &str) -> String {
    format!("{}/{}", base_url.trim_end_matches('/'), slug)
}

/// Publication date of a page at midnight UTC, if it parses.
pub fn published_at(page: &Page) -> Option<DateTime<Utc>> {
    page.published_date()
        .and_then(parse_date)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
}

/// One syndication-feed entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    pub description: String,
    pub link: String,
    pub pub_date: Option<DateTime<Utc>>,
    pub categories: Vec<String>,
}

/// Build feed items, newest first.
///
/// Pages without a usable `publishedAt` sort after every dated page. Ties
/// keep document order.
pub fn build_feed_items(pages: &[Page], base_url: &str) -> Vec<FeedItem> {
    let mut dated: Vec<(NaiveDate, &Page)> = pages
        .iter()
        .map(|page| {
            let date = page
                .published_date()
                .and_then(parse_date)
                .unwrap_or(NaiveDate::MIN);
            (date, page)
        })
        .collect();
    dated.sort_by(|(a, _), (b, _)| b.cmp(a));

    dated
        .into_iter()
        .map(|(_, page)| FeedItem {
            title: page.title.clone(),
            description: feed_description(page),
            link: page_url(base_url, &page.slug),
            pub_date: published_at(page),
            categories: page
                .category
                .iter()
                .chain(page.tag_list())
                .cloned()
                .collect(),
        })
        .collect()
}

/// Page description, or a plain-text excerpt of its content.
fn feed_description(page: &Page) -> String {
    if let Some(desc) = page.description.as_deref().filter(|d| !d.trim().is_empty()) {
        return desc.to_string();
    }

    let plain: String = page
        .content
        .chars()
        .filter(|c| !matches!(c, '*' | '_' | '#' | '`'))
        .collect();
    let plain = plain.split_whitespace().collect::<Vec<_>>().join(" ");

    plain.chars().take(SUMMARY_CHARS).collect()
}

/// Sitemap change frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFreq {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Always => "always",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
            Self::Never => "never",
        }
    }
}

/// One sitemap URL record.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: DateTime<Utc>,
    pub changefreq: ChangeFreq,
    /// Crawl priority, 0.0 to 1.0.
    pub priority: f32,
}

impl SitemapEntry {
    /// Priority with one decimal, as written to the sitemap.
    pub fn priority_str(&self) -> String {
        format!("{:.1}", self.priority)
    }
}

/// Build sitemap entries: the site root first, then every page in document
/// order. Pages without a usable `publishedAt` use `now` as `lastmod`.
pub fn build_sitemap_entries(
    pages: &[Page],
    base_url: &str,
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let root = SitemapEntry {
        loc: base_url.to_string(),
        lastmod: now,
        changefreq: ChangeFreq::Weekly,
        priority: 1.0,
    };

    std::iter::once(root)
        .chain(pages.iter().map(|page| SitemapEntry {
            loc: page_url(base_url, &page.slug),
            lastmod: published_at(page).unwrap_or(now),
            changefreq: ChangeFreq::Monthly,
            priority: 0.8,
        }))
        .collect()
}
