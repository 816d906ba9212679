//! Document validation.
//!
//! Validation never fails: every check runs over the whole document and the
//! problems are collected into a [`ValidationReport`]. Errors block a build,
//! warnings are informational. Messages are emitted site-level first, then
//! per page in array order, so two runs over the same document produce the
//! same report.

use std::{
    collections::{HashMap, HashSet},
    sync::LazyLock,
};

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::{
    document::{Lenient, Page, SiteDocument, Theme},
    error::{CoreError, Result},
};

static SLUG_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9-]+$").expect("valid slug regex"));

static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date regex"));

/// Errors and warnings found in a document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Whether the document may be built.
    pub fn is_valid(&self) -> bool {
        !self.has_errors()
    }

    /// Fail with [`CoreError::Validation`] if there are errors, otherwise
    /// hand back the warnings.
    pub fn into_result(self) -> Result<Vec<String>> {
        if self.errors.is_empty() {
            Ok(self.warnings)
        } else {
            Err(CoreError::Validation(self.errors))
        }
    }

    fn extend(&mut self, other: ValidationReport) {
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Whether `slug` is non-empty lowercase alphanumerics and hyphens.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG_PATTERN.is_match(slug)
}

/// Parse a `YYYY-MM-DD` date, rejecting anything looser.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    if !DATE_PATTERN.is_match(value) {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Fail with [`CoreError::DuplicateSlug`] on the first slug used twice.
pub fn ensure_unique_slugs(doc: &SiteDocument) -> Result<()> {
    let mut seen = HashSet::new();
    for page in &doc.pages {
        if !page.slug.is_empty() && !seen.insert(page.slug.as_str()) {
            return Err(CoreError::DuplicateSlug(page.slug.clone()));
        }
    }
    Ok(())
}

/// Validate a typed document.
pub fn validate(doc: &SiteDocument) -> ValidationReport {
    let mut report = ValidationReport::default();

    check_site(doc, &mut report);

    let mut seen: HashMap<&str, usize> = HashMap::new();
    for (index, page) in doc.pages.iter().enumerate() {
        check_page_errors(index, page, &mut seen, &mut report);
        check_page_warnings(index, page, &mut report);
    }

    tracing::debug!(
        pages = doc.pages.len(),
        errors = report.errors.len(),
        warnings = report.warnings.len(),
        "validated document"
    );

    report
}

/// Validate raw JSON, reporting shape problems a typed document cannot
/// express (a missing `site` object, `pages` that is not an array) before
/// running the typed checks.
pub fn validate_value(raw: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();

    let Some(root) = raw.as_object() else {
        report.add_error("document root must be an object");
        return report;
    };

    // A missing `site.title` is left to the typed checks.
    let site_ok = root.get("site").is_some_and(Value::is_object);
    if !site_ok {
        report.add_error("site object is missing");
    }

    let pages_ok = match root.get("pages") {
        Some(Value::Array(pages)) => {
            let mut ok = true;
            for (index, page) in pages.iter().enumerate() {
                let Some(page) = page.as_object() else {
                    report.add_error(format!("pages[{index}]: page must be an object"));
                    ok = false;
                    continue;
                };
                for field in ["title", "slug", "content"] {
                    if page.get(field).is_none_or(Value::is_null) {
                        report.add_error(format!("pages[{index}]: {field} is missing"));
                        ok = false;
                    }
                }
            }
            ok
        }
        _ => {
            report.add_error("pages must be an array");
            false
        }
    };

    if !site_ok || !pages_ok {
        return report;
    }

    match serde_json::from_value::<SiteDocument>(raw.clone()) {
        Ok(doc) => report.extend(validate(&doc)),
        Err(e) => report.add_error(format!("document does not match the schema: {e}")),
    }

    report
}

fn check_site(doc: &SiteDocument, report: &mut ValidationReport) {
    let site = &doc.site;

    if site.title.trim().is_empty() {
        report.add_error("site.title is missing");
    }

    if site.description.as_deref().is_none_or(|d| d.trim().is_empty()) {
        report.add_warning("site.description is missing");
    }

    if let Some(theme) = &site.theme
        && let Err(e) = theme.parse::<Theme>()
    {
        report.add_warning(format!("site.theme: {e}"));
    }
}

fn check_page_errors<'a>(
    index: usize,
    page: &'a Page,
    seen: &mut HashMap<&'a str, usize>,
    report: &mut ValidationReport,
) {
    if page.title.trim().is_empty() {
        report.add_error(format!("pages[{index}]: title is missing"));
    }

    let slug = page.slug.as_str();
    if slug.is_empty() {
        report.add_error(format!("pages[{index}]: slug is missing"));
    }

    if page.content.trim().is_empty() {
        report.add_error(format!("pages[{index}]: content is missing"));
    }

    if slug.is_empty() {
        return;
    }

    if let Some(first) = seen.get(slug) {
        report.add_error(format!(
            "pages[{index}]: duplicate slug `{slug}` (first used by pages[{first}])"
        ));
    } else {
        seen.insert(slug, index);
    }

    if !is_valid_slug(slug) {
        report.add_error(format!(
            "pages[{index}]: slug `{slug}` may only contain lowercase letters, digits and hyphens"
        ));
    }
}

fn check_page_warnings(index: usize, page: &Page, report: &mut ValidationReport) {
    match &page.published_at {
        Some(Lenient::Typed(date)) if parse_date(date).is_none() => {
            report.add_warning(format!(
                "pages[{index}]: publishedAt `{date}` is not in YYYY-MM-DD format"
            ));
        }
        Some(Lenient::Raw(value)) => {
            report.add_warning(format!(
                "pages[{index}]: publishedAt `{value}` is not in YYYY-MM-DD format"
            ));
        }
        _ => {}
    }

    if page.reading_time.is_some() && !page.reading_minutes().is_some_and(|m| m >= 1.0) {
        report.add_warning(format!(
            "pages[{index}]: readingTime must be a positive number of minutes"
        ));
    }

    if page.tags.as_ref().is_some_and(|t| t.typed().is_none()) {
        report.add_warning(format!("pages[{index}]: tags must be a list of strings"));
    }

    for warning in markdown_warnings(&page.content) {
        report.add_warning(format!("pages[{index}]: {warning}"));
    }
}

/// Unbalanced emphasis on a single line and unclosed code fences.
fn markdown_warnings(content: &str) -> Vec<String> {
    let mut warnings = Vec::new();
    let mut in_code_block = false;

    for (number, line) in content.lines().enumerate().map(|(i, l)| (i + 1, l)) {
        if line.trim_start().starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }
        if in_code_block {
            continue;
        }

        if line.matches("**").count() % 2 != 0 {
            warnings.push(format!("line {number}: unmatched bold marker `**`"));
        }

        let body = line.trim_start();
        let body = body.strip_prefix("* ").unwrap_or(body);
        if body.replace("**", "").matches('*').count() % 2 != 0 {
            warnings.push(format!("line {number}: unmatched italic marker `*`"));
        }
    }

    if in_code_block {
        warnings.push("unclosed code block".to_string());
    }

    warnings
}

#[cfg(test)]
mod tests {
    use serde_json::{Number, json};

    use super::*;
    use crate::document::SiteInfo;

    fn doc_with(pages: Vec<Page>) -> SiteDocument {
        let mut doc = SiteDocument::new(SiteInfo::default());
        doc.pages = pages;
        doc
    }

    #[test]
    fn test_valid_document_is_clean() {
        let doc = doc_with(vec![
            Page::new("Home", "home", "Welcome."),
            Page::new("About", "about", "About us."),
            Page::new("Contact", "contact-us", "Write to us."),
        ]);

        let report = validate(&doc);
        assert!(report.is_valid(), "{report:?}");
        assert!(!report.has_warnings(), "{report:?}");
    }

    #[test]
    fn test_duplicate_slug_reported_once_at_later_index() {
        let doc = doc_with(vec![
            Page::new("A", "about", "x"),
            Page::new("B", "other", "y"),
            Page::new("C", "about", "z"),
        ]);

        let report = validate(&doc);
        let dupes: Vec<_> = report
            .errors
            .iter()
            .filter(|e| e.contains("duplicate slug"))
            .collect();
        assert_eq!(dupes.len(), 1);
        assert!(dupes[0].starts_with("pages[2]"));
        assert!(dupes[0].contains("pages[0]"));
    }

    #[test]
    fn test_required_fields_and_slug_pattern() {
        let doc = doc_with(vec![
            Page::new("", "", ""),
            Page::new("Bad", "Bad Slug", "x"),
        ]);

        let report = validate(&doc);
        assert_eq!(
            report.errors,
            vec![
                "pages[0]: title is missing",
                "pages[0]: slug is missing",
                "pages[0]: content is missing",
                "pages[1]: slug `Bad Slug` may only contain lowercase letters, digits and hyphens",
            ]
        );
    }

    #[test]
    fn test_site_checks() {
        let mut doc = doc_with(vec![]);
        doc.site.title = String::new();
        doc.site.description = None;
        doc.site.theme = Some("solarized".into());

        let report = validate(&doc);
        assert_eq!(report.errors, vec!["site.title is missing"]);
        assert_eq!(report.warnings.len(), 2);
        assert_eq!(report.warnings[0], "site.description is missing");
        assert!(report.warnings[1].contains("solarized"));
    }

    #[test]
    fn test_bad_date_is_warning_only() {
        let mut page = Page::new("Post", "post", "Body");
        page.published_at = Some(Lenient::Typed("01-01-2024".into()));
        let report = validate(&doc_with(vec![page]));

        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 1);
        assert!(report.warnings[0].contains("publishedAt"));
    }

    #[test]
    fn test_reading_time_and_tags_warnings() {
        let mut page = Page::new("Post", "post", "Body");
        page.reading_time = Some(Lenient::Typed(Number::from(0)));
        page.tags = Some(Lenient::Raw(json!("rust")));
        let report = validate(&doc_with(vec![page]));

        assert!(report.is_valid());
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].contains("readingTime"));
        assert!(report.warnings[1].contains("tags"));
    }

    #[test]
    fn test_markdown_warnings() {
        let content = "Some **bold** text\nBroken **bold\n* list item with *emphasis*\nodd *italic\n```\n**ignored in code\n```\n```rust\nlet x = 1;";
        let warnings = markdown_warnings(content);

        assert_eq!(
            warnings,
            vec![
                "line 2: unmatched bold marker `**`",
                "line 4: unmatched italic marker `*`",
                "unclosed code block",
            ]
        );
    }

    #[test]
    fn test_parse_date() {
        assert!(parse_date("2024-06-01").is_some());
        assert!(parse_date("2024-6-1").is_none());
        assert!(parse_date("2024-13-40").is_none());
        assert!(parse_date("01-01-2024").is_none());
    }

    #[test]
    fn test_validate_value_shape_errors() {
        let report = validate_value(&json!({ "pages": {} }));
        assert_eq!(
            report.errors,
            vec!["site object is missing", "pages must be an array"]
        );

        let report = validate_value(&json!({
            "site": { "title": "Site" },
            "pages": [{ "title": "t", "content": "c" }]
        }));
        assert_eq!(report.errors, vec!["pages[0]: slug is missing"]);
    }

    #[test]
    fn test_validate_value_runs_typed_checks() {
        let report = validate_value(&json!({
            "site": { "title": "Site", "description": "d" },
            "pages": [
                { "title": "a", "slug": "a", "content": "x" },
                { "title": "b", "slug": "a", "content": "y" }
            ]
        }));
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].contains("duplicate slug"));
    }

    #[test]
    fn test_validate_value_missing_title_keeps_page_checks() {
        let report = validate_value(&json!({
            "site": { "description": "d" },
            "pages": [
                { "title": "a", "slug": "a", "content": "x" },
                { "title": "b", "slug": "a", "content": "y" },
                { "title": "c", "slug": "Bad Slug", "content": "z" }
            ]
        }));

        assert_eq!(report.errors.len(), 3, "{report:?}");
        assert_eq!(report.errors[0], "site.title is missing");
        assert!(report.errors[1].contains("duplicate slug"));
        assert!(report.errors[2].contains("Bad Slug"));
    }

    #[test]
    fn test_validate_value_non_string_date_is_warning() {
        let report = validate_value(&json!({
            "site": { "title": "Site", "description": "d" },
            "pages": [{ "title": "a", "slug": "a", "content": "x", "publishedAt": 20240101 }]
        }));

        assert!(report.is_valid(), "{report:?}");
        assert_eq!(
            report.warnings,
            vec!["pages[0]: publishedAt `20240101` is not in YYYY-MM-DD format"]
        );
    }

    #[test]
    fn test_ensure_unique_slugs() {
        let doc = doc_with(vec![Page::new("A", "a", "x"), Page::new("B", "b", "y")]);
        assert!(ensure_unique_slugs(&doc).is_ok());

        let doc = doc_with(vec![Page::new("A", "a", "x"), Page::new("B", "a", "y")]);
        assert!(matches!(
            ensure_unique_slugs(&doc),
            Err(CoreError::DuplicateSlug(slug)) if slug == "a"
        ));
    }

    #[test]
    fn test_into_result() {
        let report = ValidationReport {
            errors: vec![],
            warnings: vec!["w".into()],
        };
        assert_eq!(report.into_result().unwrap(), vec!["w"]);

        let report = ValidationReport {
            errors: vec!["e".into()],
            warnings: vec![],
        };
        assert!(matches!(
            report.into_result(),
            Err(CoreError::Validation(errors)) if errors == vec!["e"]
        ));
    }
}
