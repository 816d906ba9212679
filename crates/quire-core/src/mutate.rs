//! Page and site mutations.
//!
//! Every mutator works on an in-memory [`SiteDocument`] and either applies
//! the whole change or leaves the document untouched. Persisting is the
//! caller's job, usually through [`ContentStore::update`].
//!
//! [`ContentStore::update`]: crate::store::ContentStore::update

use std::fmt;

use chrono::NaiveDate;
use serde_json::Number;
use tracing::info;

use crate::{
    derive::{estimate_reading_time, slugify},
    document::{Page, SiteDocument, SiteInfo, Theme},
    error::{CoreError, Result},
    validate::{is_valid_slug, parse_date},
};

/// Input for [`create_page`].
#[derive(Debug, Clone, Default)]
pub struct NewPage {
    pub title: String,
    /// Derived from the title when absent.
    pub slug: Option<String>,
    pub content: String,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    /// `YYYY-MM-DD`. Defaults to the creation date.
    pub published_at: Option<String>,
    /// At least one minute. Estimated from the content when absent.
    pub reading_time: Option<u32>,
    pub draft: bool,
    pub featured: bool,
    pub author: Option<String>,
    pub image: Option<String>,
}

/// Fields to overwrite on an existing page. `None` and empty strings are
/// ignored.
#[derive(Debug, Clone, Default)]
pub struct PageUpdate {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub published_at: Option<String>,
    pub reading_time: Option<u32>,
    pub draft: Option<bool>,
    pub featured: Option<bool>,
    pub author: Option<String>,
    pub image: Option<String>,
}

/// Site metadata to overwrite. `None` and empty strings are ignored.
#[derive(Debug, Clone, Default)]
pub struct SiteUpdate {
    pub title: Option<String>,
    pub theme: Option<Theme>,
    pub description: Option<String>,
}

/// How a page is addressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageSelector {
    Slug(String),
    Index(usize),
}

impl PageSelector {
    fn resolve(&self, doc: &SiteDocument) -> Option<usize> {
        match self {
            Self::Slug(slug) => doc.position(slug),
            Self::Index(index) => (*index < doc.pages.len()).then_some(*index),
        }
    }
}

impl fmt::Display for PageSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Slug(slug) => write!(f, "`{slug}`"),
            Self::Index(index) => write!(f, "at index {index}"),
        }
    }
}

impl From<&str> for PageSelector {
    fn from(slug: &str) -> Self {
        Self::Slug(slug.to_string())
    }
}

impl From<usize> for PageSelector {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Problems with an explicit date or reading time.
fn check_metadata(published_at: Option<&str>, reading_time: Option<u32>) -> Vec<String> {
    let mut problems = Vec::new();
    if let Some(date) = published_at
        && parse_date(date).is_none()
    {
        problems.push(format!("publishedAt `{date}` is not in YYYY-MM-DD format"));
    }
    if reading_time == Some(0) {
        problems.push("reading time must be at least one minute".to_string());
    }
    problems
}

fn check_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(CoreError::invalid("slug is empty"));
    }
    if !is_valid_slug(slug) {
        return Err(CoreError::invalid(format!(
            "slug `{slug}` may only contain lowercase letters, digits and hyphens"
        )));
    }
    Ok(())
}

/// Add a page at the front of the document.
///
/// `today` becomes `publishedAt` unless one is given.
pub fn create_page(doc: &mut SiteDocument, new: NewPage, today: NaiveDate) -> Result<&Page> {
    let mut problems = Vec::new();
    if new.title.trim().is_empty() {
        problems.push("title is required".to_string());
    }
    if new.content.trim().is_empty() {
        problems.push("content is required".to_string());
    }
    let published_at = non_empty(new.published_at);
    problems.extend(check_metadata(published_at.as_deref(), new.reading_time));
    if !problems.is_empty() {
        return Err(CoreError::Validation(problems));
    }

    let slug = non_empty(new.slug).unwrap_or_else(|| slugify(&new.title));
    check_slug(&slug)?;
    if doc.contains_slug(&slug) {
        return Err(CoreError::DuplicateSlug(slug));
    }

    let reading_time = new
        .reading_time
        .unwrap_or_else(|| estimate_reading_time(&new.content));

    let mut page = Page::new(new.title, slug, new.content);
    page.description = non_empty(new.description);
    page.category = non_empty(new.category);
    page.tags = (!new.tags.is_empty()).then(|| new.tags.into());
    page.published_at = Some(
        published_at
            .unwrap_or_else(|| today.format("%Y-%m-%d").to_string())
            .into(),
    );
    page.reading_time = Some(Number::from(reading_time).into());
    page.draft = new.draft.then_some(true);
    page.featured = new.featured.then_some(true);
    page.author = non_empty(new.author);
    page.image = non_empty(new.image);

    info!(slug = %page.slug, "created page");
    doc.pages.insert(0, page);
    Ok(&doc.pages[0])
}

/// Overwrite the given fields of one page.
///
/// A new slug must be valid and unused by any other page. Changing the
/// content without an explicit reading time re-estimates it.
pub fn update_page<'a>(
    doc: &'a mut SiteDocument,
    selector: &PageSelector,
    update: PageUpdate,
) -> Result<&'a Page> {
    let index = selector
        .resolve(doc)
        .ok_or_else(|| CoreError::page_not_found(selector))?;

    let published_at = non_empty(update.published_at);
    let problems = check_metadata(published_at.as_deref(), update.reading_time);
    if !problems.is_empty() {
        return Err(CoreError::Validation(problems));
    }

    let slug = non_empty(update.slug);
    if let Some(slug) = &slug {
        check_slug(slug)?;
        if doc.position(slug).is_some_and(|other| other != index) {
            return Err(CoreError::DuplicateSlug(slug.clone()));
        }
    }

    let page = &mut doc.pages[index];

    if let Some(title) = non_empty(update.title) {
        page.title = title;
    }
    if let Some(slug) = slug {
        page.slug = slug;
    }
    if let Some(content) = non_empty(update.content) {
        if update.reading_time.is_none() {
            page.reading_time = Some(Number::from(estimate_reading_time(&content)).into());
        }
        page.content = content;
    }
    if let Some(minutes) = update.reading_time {
        page.reading_time = Some(Number::from(minutes).into());
    }
    if let Some(description) = non_empty(update.description) {
        page.description = Some(description);
    }
    if let Some(category) = non_empty(update.category) {
        page.category = Some(category);
    }
    if let Some(tags) = update.tags {
        page.tags = Some(tags.into());
    }
    if let Some(date) = published_at {
        page.published_at = Some(date.into());
    }
    if let Some(draft) = update.draft {
        page.draft = Some(draft);
    }
    if let Some(featured) = update.featured {
        page.featured = Some(featured);
    }
    if let Some(author) = non_empty(update.author) {
        page.author = Some(author);
    }
    if let Some(image) = non_empty(update.image) {
        page.image = Some(image);
    }

    info!(slug = %page.slug, "updated page");
    Ok(page)
}

/// Remove a page and hand it back.
pub fn delete_page(doc: &mut SiteDocument, selector: &PageSelector) -> Result<Page> {
    let index = selector
        .resolve(doc)
        .ok_or_else(|| CoreError::page_not_found(selector))?;

    let page = doc.pages.remove(index);
    info!(slug = %page.slug, "deleted page");
    Ok(page)
}

/// Overwrite site title, theme and description.
pub fn update_site_config(doc: &mut SiteDocument, update: SiteUpdate) -> &SiteInfo {
    let site = &mut doc.site;

    if let Some(title) = non_empty(update.title) {
        site.title = title;
    }
    if let Some(theme) = update.theme {
        site.theme = Some(theme.to_string());
    }
    if let Some(description) = non_empty(update.description) {
        site.description = Some(description);
    }

    info!(title = %site.title, "updated site configuration");
    site
}
