//! Build orchestration.
//!
//! Loads the site document, validates it, and writes the derived feed and
//! sitemap. Validation errors stop the build before anything is written.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use chrono::{DateTime, Utc};
use quire_core::{
    Config, ContentStore, CoreError, Page, SiteDocument,
    derive::{build_feed_items, build_sitemap_entries},
    store::inherit_permissions,
    validate::validate,
};
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    rss::{RssError, RssGenerator},
    sitemap::{SitemapError, SitemapGenerator},
};

/// Build errors.
#[derive(Debug, Error)]
pub enum BuildError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Loading the document failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The document has validation errors.
    #[error("document has {} validation error(s): {}", .0.len(), .0.join("; "))]
    Validation(Vec<String>),

    /// RSS generation error.
    #[error("RSS error: {0}")]
    Rss(#[from] RssError),

    /// Sitemap generation error.
    #[error("sitemap error: {0}")]
    Sitemap(#[from] SitemapError),

    /// Writing an artifact failed.
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;

/// Build statistics.
#[derive(Debug, Clone, Default)]
pub struct BuildStats {
    /// Number of pages included in the build.
    pub pages: usize,

    /// Number of draft pages left out.
    pub drafts: usize,

    /// Number of items written to the feed.
    pub feed_items: usize,

    /// Number of URLs written to the sitemap.
    pub sitemap_entries: usize,

    /// Validator warnings.
    pub warnings: Vec<String>,

    /// Build duration in milliseconds.
    pub duration_ms: u64,
}

/// Site builder that orchestrates the build process.
#[derive(Debug)]
pub struct Builder {
    config: Config,
    store: ContentStore,
    output_dir: PathBuf,
    base_url: Option<String>,
    now: Option<DateTime<Utc>>,
}

impl Builder {
    /// Create a builder for the project at `root`.
    #[must_use]
    pub fn new(config: Config, root: &Path) -> Self {
        Self {
            store: config.store(root),
            output_dir: config.output_dir(root),
            config,
            base_url: None,
            now: None,
        }
    }

    /// Override the output directory.
    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Override the base URL from configuration.
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Fix the timestamp used for undated sitemap entries.
    #[must_use]
    pub fn with_now(mut self, now: DateTime<Utc>) -> Self {
        self.now = Some(now);
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Execute the full build process.
    pub fn build(&self) -> Result<BuildStats> {
        let start = Instant::now();
        let mut stats = BuildStats::default();

        info!(
            document = %self.store.path().display(),
            output = %self.output_dir.display(),
            "starting build"
        );

        // 1. Load and validate
        let doc = self.store.load()?;
        let report = validate(&doc);
        for warning in &report.warnings {
            warn!("{warning}");
        }
        if report.has_errors() {
            return Err(BuildError::Validation(report.errors));
        }
        stats.warnings = report.warnings;

        // 2. Select pages
        let SiteDocument { site, pages, .. } = doc;
        let total = pages.len();
        let pages: Vec<Page> = if self.config.build.drafts {
            pages
        } else {
            pages.into_iter().filter(|p| !p.is_draft()).collect()
        };
        stats.pages = pages.len();
        stats.drafts = total - pages.len();

        let base_url = self
            .config
            .base_url(self.base_url.as_deref(), site.url.as_deref());
        debug!(
            base_url = %base_url,
            pages = stats.pages,
            drafts = stats.drafts,
            "resolved build inputs"
        );

        fs::create_dir_all(&self.output_dir)
            .map_err(|e| self.write_error(&self.output_dir, e))?;

        // 3. Generate RSS feed
        if self.config.feed.enabled {
            let items = build_feed_items(&pages, &base_url);
            let generator = RssGenerator::new(&site, base_url.as_str(), &self.config.feed);
            let path = self.write_artifact(&self.config.feed.filename, |out| {
                Ok(generator.write_to(&items, out)?)
            })?;
            stats.feed_items = items.len().min(self.config.feed.limit);
            info!(path = %path.display(), items = stats.feed_items, "generated RSS feed");
        }

        // 4. Generate sitemap
        if self.config.sitemap.enabled {
            let now = self.now.unwrap_or_else(Utc::now);
            let entries = build_sitemap_entries(&pages, &base_url, now);
            let path = self.write_artifact(&self.config.sitemap.filename, |out| {
                Ok(SitemapGenerator::new().write_to(&entries, out)?)
            })?;
            stats.sitemap_entries = entries.len();
            info!(path = %path.display(), entries = stats.sitemap_entries, "generated sitemap");
        }

        stats.duration_ms = start.elapsed().as_millis() as u64;

        info!(
            pages = stats.pages,
            feed_items = stats.feed_items,
            sitemap_entries = stats.sitemap_entries,
            warnings = stats.warnings.len(),
            duration_ms = stats.duration_ms,
            "build complete"
        );

        Ok(stats)
    }

    /// Write one artifact into the output directory through a temporary
    /// file, so an interrupted build never leaves a truncated artifact.
    fn write_artifact(
        &self,
        name: &str,
        write: impl FnOnce(&mut NamedTempFile) -> Result<()>,
    ) -> Result<PathBuf> {
        let path = self.output_dir.join(name);

        let mut tmp =
            NamedTempFile::new_in(&self.output_dir).map_err(|e| self.write_error(&path, e))?;
        write(&mut tmp)?;
        inherit_permissions(&tmp, &path)
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| self.write_error(&path, e))?;
        tmp.persist(&path)
            .map_err(|e| self.write_error(&path, e.error))?;

        debug!(path = %path.display(), "wrote artifact");
        Ok(path)
    }

    fn write_error(&self, path: &Path, source: std::io::Error) -> BuildError {
        BuildError::Write {
            path: path.to_path_buf(),
            source,
        }
    }
}
