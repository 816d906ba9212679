//! Error types for the quire core library.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for quire.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A content file or a page that was asked for does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The content file is not well-formed, or a field has the wrong type.
    #[error("Parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// A required top-level or per-page field is missing.
    #[error("Schema error in {path}: {message}")]
    Schema { path: PathBuf, message: String },

    /// A page with this slug already exists.
    #[error("Duplicate slug: a page with slug `{0}` already exists")]
    DuplicateSlug(String),

    /// Aggregated validation errors.
    #[error("Validation failed with {} error(s): {}", .0.len(), .0.join("; "))]
    Validation(Vec<String>),

    /// Persisting the content file failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Refusing to overwrite an existing content file.
    #[error("Already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    /// Configuration loading or parsing error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error outside of document loading.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a not-found error for a missing file.
    pub fn file_not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(format!("content file {}", path.into().display()))
    }

    /// Create a not-found error for a missing page.
    pub fn page_not_found(selector: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("page {selector}"))
    }

    /// Create a new parse error.
    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Parse {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new schema error.
    pub fn schema(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new write error.
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Create a validation error from a single message.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Validation(vec![message.into()])
    }

    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error means something was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}
