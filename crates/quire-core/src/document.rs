//! Site document schema.
//!
//! The content of a quire site lives in a single JSON document:
//!
//! ```json
//! {
//!   "site": { "title": "My Site", "theme": "light" },
//!   "pages": [
//!     { "title": "About", "slug": "about", "content": "Hello." }
//!   ],
//!   "header": { "...": "passed through untouched" }
//! }
//! ```
//!
//! Everything the core does not interpret (UI configuration blocks, unknown
//! keys) is kept as raw JSON, and keys written as an explicit `null` are
//! remembered, so a [`SiteDocument::from_json`] / [`SiteDocument::to_json`]
//! cycle is lossless.

use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Root content and configuration record for a site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteDocument {
    /// Site-wide metadata.
    pub site: SiteInfo,

    /// Pages in display order.
    pub pages: Vec<Page>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub header: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub footer: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_blocks: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub floating_elements: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animations: Option<Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Value>,

    /// Any other top-level keys.
    #[serde(flatten)]
    pub extra: Map<String, Value>,

    /// Keys that were an explicit `null` in the source. They are written
    /// back as `null` for as long as their field stays unset.
    #[serde(skip)]
    pub null_keys: BTreeSet<String>,
}

impl SiteDocument {
    /// Create an empty document for a freshly initialized project.
    pub fn new(site: SiteInfo) -> Self {
        Self {
            site,
            pages: Vec::new(),
            header: None,
            footer: None,
            content_blocks: None,
            ui: None,
            floating_elements: None,
            animations: None,
            layout: None,
            extra: Map::new(),
            null_keys: BTreeSet::new(),
        }
    }

    /// Parse a document from raw JSON.
    pub fn from_json(raw: Value) -> serde_json::Result<Self> {
        let top = explicit_nulls(Some(&raw));
        let site = explicit_nulls(raw.get("site"));
        let pages: Vec<_> = raw
            .get("pages")
            .and_then(Value::as_array)
            .map(|pages| pages.iter().map(|p| explicit_nulls(Some(p))).collect())
            .unwrap_or_default();

        let mut doc: Self = serde_json::from_value(raw)?;
        doc.null_keys = top;
        doc.site.null_keys = site;
        for (page, nulls) in doc.pages.iter_mut().zip(pages) {
            page.null_keys = nulls;
        }
        Ok(doc)
    }

    /// Serialize to raw JSON, restoring explicit `null`s.
    pub fn to_json(&self) -> serde_json::Result<Value> {
        let mut value = serde_json::to_value(self)?;
        restore_nulls(&mut value, &self.null_keys);
        if let Some(site) = value.get_mut("site") {
            restore_nulls(site, &self.site.null_keys);
        }
        if let Some(Value::Array(pages)) = value.get_mut("pages") {
            for (out, page) in pages.iter_mut().zip(&self.pages) {
                restore_nulls(out, &page.null_keys);
            }
        }
        Ok(value)
    }

    /// First page with exactly this slug.
    pub fn page(&self, slug: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.slug == slug)
    }

    /// Index of the first page with exactly this slug.
    pub fn position(&self, slug: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.slug == slug)
    }

    /// Whether any page uses this slug.
    pub fn contains_slug(&self, slug: &str) -> bool {
        self.page(slug).is_some()
    }

    /// Slugs in document order.
    pub fn slugs(&self) -> Vec<String> {
        self.pages.iter().map(|p| p.slug.clone()).collect()
    }
}

fn explicit_nulls(value: Option<&Value>) -> BTreeSet<String> {
    value
        .and_then(Value::as_object)
        .map(|obj| {
            obj.iter()
                .filter(|(_, v)| v.is_null())
                .map(|(k, _)| k.clone())
                .collect()
        })
        .unwrap_or_default()
}

fn restore_nulls(value: &mut Value, keys: &BTreeSet<String>) {
    if let Value::Object(obj) = value {
        for key in keys {
            obj.entry(key.clone()).or_insert(Value::Null);
        }
    }
}

impl Default for SiteDocument {
    fn default() -> Self {
        Self::new(SiteInfo::default())
    }
}

/// Site-wide metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteInfo {
    /// Site title. Missing in the file deserializes as empty, which the
    /// validator reports.
    #[serde(default)]
    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Theme name. Kept as a string so unknown themes survive a round trip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    /// Canonical site URL, used as the feed/sitemap base when nothing else
    /// is configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(skip)]
    pub null_keys: BTreeSet<String>,
}

impl Default for SiteInfo {
    fn default() -> Self {
        Self {
            title: "My Site".to_string(),
            description: Some("A site built with quire".to_string()),
            theme: Some(Theme::default().to_string()),
            author: None,
            url: None,
            extra: Map::new(),
            null_keys: BTreeSet::new(),
        }
    }
}

impl SiteInfo {
    /// The theme, if it is one of the known set.
    pub fn known_theme(&self) -> Option<Theme> {
        self.theme.as_deref().and_then(|t| t.parse().ok())
    }
}

/// Built-in themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
    Minimal,
    Ocean,
    Sunset,
    Forest,
    Midnight,
    Neon,
}

impl Theme {
    /// Every theme, in display order.
    pub const ALL: [Theme; 8] = [
        Self::Light,
        Self::Dark,
        Self::Minimal,
        Self::Ocean,
        Self::Sunset,
        Self::Forest,
        Self::Midnight,
        Self::Neon,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Minimal => "minimal",
            Self::Ocean => "ocean",
            Self::Sunset => "sunset",
            Self::Forest => "forest",
            Self::Midnight => "midnight",
            Self::Neon => "neon",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown theme name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTheme(pub String);

impl fmt::Display for UnknownTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let known: Vec<_> = Theme::ALL.iter().map(Theme::as_str).collect();
        write!(
            f,
            "unknown theme `{}` (expected one of: {})",
            self.0,
            known.join(", ")
        )
    }
}

impl std::error::Error for UnknownTheme {}

impl FromStr for Theme {
    type Err = UnknownTheme;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownTheme(s.to_string()))
    }
}

/// A field that keeps its raw JSON when the value does not have the expected
/// shape, so the validator can report it instead of the loader rejecting the
/// whole document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Lenient<T> {
    Typed(T),
    Raw(Value),
}

impl<T> Lenient<T> {
    /// The typed value, if the field had the expected shape.
    pub fn typed(&self) -> Option<&T> {
        match self {
            Self::Typed(value) => Some(value),
            Self::Raw(_) => None,
        }
    }
}

impl<T> From<T> for Lenient<T> {
    fn from(value: T) -> Self {
        Self::Typed(value)
    }
}

/// One content entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub title: String,

    /// Unique, URL-safe identifier.
    pub slug: String,

    /// Markdown body.
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Lenient<Vec<String>>>,

    /// Publication date, `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<Lenient<String>>,

    /// Reading time in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reading_time: Option<Lenient<Number>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub draft: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub featured: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,

    #[serde(skip)]
    pub null_keys: BTreeSet<String>,
}

impl Page {
    /// Create a page with only the required fields set.
    pub fn new(
        title: impl Into<String>,
        slug: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            slug: slug.into(),
            content: content.into(),
            description: None,
            category: None,
            tags: None,
            published_at: None,
            reading_time: None,
            draft: None,
            featured: None,
            author: None,
            image: None,
            extra: Map::new(),
            null_keys: BTreeSet::new(),
        }
    }

    /// Tags, or an empty slice when absent or malformed.
    pub fn tag_list(&self) -> &[String] {
        self.tags
            .as_ref()
            .and_then(Lenient::typed)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Publication date as written, when it is a string.
    pub fn published_date(&self) -> Option<&str> {
        self.published_at
            .as_ref()
            .and_then(Lenient::typed)
            .map(String::as_str)
    }

    /// Reading time in minutes, when present and numeric.
    pub fn reading_minutes(&self) -> Option<f64> {
        self.reading_time
            .as_ref()
            .and_then(Lenient::typed)
            .and_then(Number::as_f64)
    }

    pub fn is_draft(&self) -> bool {
        self.draft.unwrap_or(false)
    }

    pub fn is_featured(&self) -> bool {
        self.featured.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_theme_parse() {
        assert_eq!("ocean".parse::<Theme>(), Ok(Theme::Ocean));
        assert_eq!("neon".parse::<Theme>(), Ok(Theme::Neon));
        let err = "solarized".parse::<Theme>().unwrap_err();
        assert!(err.to_string().contains("solarized"));
        assert!(err.to_string().contains("midnight"));
    }

    #[test]
    fn test_page_camel_case_fields() {
        let page: Page = serde_json::from_value(json!({
            "title": "Hello",
            "slug": "hello",
            "content": "Body",
            "publishedAt": "2024-01-15",
            "readingTime": 3,
            "tags": ["rust", "web"]
        }))
        .unwrap();

        assert_eq!(page.published_date(), Some("2024-01-15"));
        assert_eq!(page.reading_minutes(), Some(3.0));
        assert_eq!(page.tag_list(), ["rust", "web"]);
    }

    #[test]
    fn test_lenient_fields_keep_raw_values() {
        let raw = json!({
            "title": "Hello",
            "slug": "hello",
            "content": "Body",
            "readingTime": "five",
            "tags": "rust"
        });
        let page: Page = serde_json::from_value(raw.clone()).unwrap();

        assert!(page.tag_list().is_empty());
        assert_eq!(page.reading_minutes(), None);
        assert_eq!(serde_json::to_value(&page).unwrap(), raw);
    }

    #[test]
    fn test_non_string_published_at_is_kept_raw() {
        let raw = json!({ "title": "t", "slug": "s", "content": "c", "publishedAt": 20240101 });
        let page: Page = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(page.published_date(), None);
        assert!(matches!(page.published_at, Some(Lenient::Raw(_))));
        assert_eq!(serde_json::to_value(&page).unwrap(), raw);
    }

    #[test]
    fn test_explicit_nulls_survive_round_trip() {
        let raw = json!({
            "site": { "title": "x", "description": null },
            "pages": [{ "title": "t", "slug": "s", "content": "c", "author": null }],
            "header": null
        });
        let doc = SiteDocument::from_json(raw.clone()).unwrap();

        assert!(doc.header.is_none());
        assert!(doc.site.description.is_none());
        assert!(doc.null_keys.contains("header"));
        assert_eq!(doc.to_json().unwrap(), raw);
    }

    #[test]
    fn test_set_field_replaces_explicit_null() {
        let raw = json!({
            "site": { "title": "x", "description": null },
            "pages": []
        });
        let mut doc = SiteDocument::from_json(raw).unwrap();
        doc.site.description = Some("Now set".into());

        let out = doc.to_json().unwrap();
        assert_eq!(out["site"]["description"], json!("Now set"));
    }

    #[test]
    fn test_integer_reading_time_stays_integer() {
        let raw = json!({ "title": "t", "slug": "s", "content": "c", "readingTime": 2 });
        let page: Page = serde_json::from_value(raw).unwrap();
        let out = serde_json::to_string(&page).unwrap();
        assert!(out.contains(r#""readingTime":2"#));
    }

    #[test]
    fn test_passthrough_blocks_and_unknown_keys() {
        let raw = json!({
            "site": { "title": "Site", "tagline": "kept" },
            "pages": [],
            "header": { "logo": "/logo.svg", "links": [1, 2] },
            "floatingElements": [{ "kind": "button" }],
            "somethingElse": true
        });
        let doc: SiteDocument = serde_json::from_value(raw.clone()).unwrap();

        assert!(doc.header.is_some());
        assert!(doc.floating_elements.is_some());
        assert_eq!(doc.extra.get("somethingElse"), Some(&json!(true)));
        assert_eq!(doc.site.extra.get("tagline"), Some(&json!("kept")));
        assert_eq!(serde_json::to_value(&doc).unwrap(), raw);
    }

    #[test]
    fn test_document_lookup() {
        let mut doc = SiteDocument::default();
        doc.pages.push(Page::new("A", "a", "x"));
        doc.pages.push(Page::new("B", "b", "y"));

        assert_eq!(doc.page("b").map(|p| p.title.as_str()), Some("B"));
        assert_eq!(doc.position("b"), Some(1));
        assert!(!doc.contains_slug("B"));
        assert_eq!(doc.slugs(), vec!["a", "b"]);
    }

    #[test]
    fn test_default_site_has_known_theme() {
        let site = SiteInfo::default();
        assert_eq!(site.known_theme(), Some(Theme::Light));
    }
}
