//! Durable storage for the site document.
//!
//! The document is read from disk on every operation; nothing is cached
//! between calls. Saves go through a temporary file in the same directory
//! and an atomic rename, so a reader never sees a half-written document.

use std::{
    fs,
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};

use serde_json::Value;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::{
    document::{Page, SiteDocument},
    error::{CoreError, Result},
    validate::ensure_unique_slugs,
};

/// Document location relative to the project root.
pub const DEFAULT_DOCUMENT_PATH: &str = "content/site.json";

/// File-backed store for a [`SiteDocument`].
#[derive(Debug, Clone)]
pub struct ContentStore {
    path: PathBuf,
}

impl ContentStore {
    /// Store backed by the file at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default location under a project root.
    pub fn in_project(root: &Path) -> Self {
        Self::new(root.join(DEFAULT_DOCUMENT_PATH))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }

    /// Read and parse the file without checking its shape.
    pub fn load_raw(&self) -> Result<Value> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(CoreError::file_not_found(&self.path));
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&text).map_err(|e| CoreError::parse(&self.path, e.to_string()))
    }

    /// Load the document.
    ///
    /// Fails fast when `site` or `pages` is missing, or when a page lacks
    /// `title`, `slug` or `content`. Everything else is left to the
    /// validator.
    pub fn load(&self) -> Result<SiteDocument> {
        let raw = self.load_raw()?;
        self.check_shape(&raw)?;

        let doc = SiteDocument::from_json(raw)
            .map_err(|e| CoreError::parse(&self.path, e.to_string()))?;

        debug!(path = %self.path.display(), pages = doc.pages.len(), "loaded document");
        Ok(doc)
    }

    fn check_shape(&self, raw: &Value) -> Result<()> {
        let Some(root) = raw.as_object() else {
            return Err(CoreError::schema(&self.path, "document root must be an object"));
        };

        if !root.get("site").is_some_and(Value::is_object) {
            return Err(CoreError::schema(&self.path, "missing `site` object"));
        }

        let Some(pages) = root.get("pages").and_then(Value::as_array) else {
            return Err(CoreError::schema(&self.path, "missing `pages` array"));
        };

        for (index, page) in pages.iter().enumerate() {
            let Some(page) = page.as_object() else {
                return Err(CoreError::schema(
                    &self.path,
                    format!("pages[{index}] must be an object"),
                ));
            };
            for field in ["title", "slug", "content"] {
                if page.get(field).is_none_or(Value::is_null) {
                    return Err(CoreError::schema(
                        &self.path,
                        format!("pages[{index}] is missing `{field}`"),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Persist the document, replacing the file atomically.
    pub fn save(&self, doc: &SiteDocument) -> Result<()> {
        let mut json = serde_json::to_string_pretty(&doc.to_json()?)?;
        json.push('\n');

        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| CoreError::write(&self.path, e))?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CoreError::write(&self.path, e))?;
        tmp.write_all(json.as_bytes())
            .and_then(|()| inherit_permissions(&tmp, &self.path))
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|e| CoreError::write(&self.path, e))?;
        tmp.persist(&self.path)
            .map_err(|e| CoreError::write(&self.path, e.error))?;

        debug!(path = %self.path.display(), pages = doc.pages.len(), "saved document");
        Ok(())
    }

    /// Write a fresh document. Refuses to overwrite an existing file.
    pub fn init(&self, doc: &SiteDocument) -> Result<()> {
        if self.path.exists() {
            return Err(CoreError::AlreadyExists(self.path.clone()));
        }
        self.save(doc)?;
        info!(path = %self.path.display(), "initialized content document");
        Ok(())
    }

    /// First page with exactly this slug.
    pub fn page_by_slug(&self, slug: &str) -> Result<Option<Page>> {
        let doc = self.load()?;
        Ok(doc.pages.into_iter().find(|p| p.slug == slug))
    }

    /// Every slug, in document order.
    pub fn all_slugs(&self) -> Result<Vec<String>> {
        Ok(self.load()?.slugs())
    }

    /// Load, apply `mutate`, and save.
    ///
    /// Nothing is written if `mutate` fails or leaves two pages sharing a
    /// slug.
    pub fn update<T>(&self, mutate: impl FnOnce(&mut SiteDocument) -> Result<T>) -> Result<T> {
        let mut doc = self.load()?;
        let out = mutate(&mut doc)?;
        ensure_unique_slugs(&doc)?;
        self.save(&doc)?;
        Ok(out)
    }
}

/// Give a temporary file the mode it should have once it replaces `target`:
/// that of the existing file, or `0644` for a new one.
///
/// Temporary files are created owner-only and a rename keeps the mode.
pub fn inherit_permissions(tmp: &NamedTempFile, target: &Path) -> io::Result<()> {
    let permissions = match fs::metadata(target) {
        Ok(meta) => meta.permissions(),
        Err(e) if e.kind() == ErrorKind::NotFound => new_file_permissions(tmp)?,
        Err(e) => return Err(e),
    };
    tmp.as_file().set_permissions(permissions)
}

#[cfg(unix)]
fn new_file_permissions(_tmp: &NamedTempFile) -> io::Result<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Ok(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn new_file_permissions(tmp: &NamedTempFile) -> io::Result<fs::Permissions> {
    Ok(tmp.as_file().metadata()?.permissions())
}
