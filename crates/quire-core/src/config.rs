//! Project configuration (`quire.toml`).
//!
//! Every section is optional; a project without a config file builds with
//! the defaults. Values can be overridden from the environment with a
//! `QUIRE_` prefix and `__` between section and key, e.g.
//! `QUIRE_BUILD__BASE_URL=https://blog.dev`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    derive::resolve_base_url,
    error::{CoreError, Result},
    store::{ContentStore, DEFAULT_DOCUMENT_PATH},
};

/// Default config file name, relative to the project root.
pub const CONFIG_FILE: &str = "quire.toml";

/// Main configuration structure for quire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Content document settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Build settings.
    #[serde(default)]
    pub build: BuildConfig,

    /// RSS feed settings.
    #[serde(default)]
    pub feed: FeedConfig,

    /// Sitemap settings.
    #[serde(default)]
    pub sitemap: SitemapConfig,
}

/// Where the site document lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Document path, relative to the project root.
    #[serde(default = "default_content_path")]
    pub path: String,
}

/// Build configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Output directory for generated artifacts.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Base URL for feed and sitemap links. Falls back to `site.url`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Whether draft pages are included.
    #[serde(default)]
    pub drafts: bool,
}

/// RSS feed configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Maximum number of items in feed.
    #[serde(default = "default_feed_limit")]
    pub limit: usize,

    #[serde(default = "default_feed_filename")]
    pub filename: String,
}

/// Sitemap configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SitemapConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_sitemap_filename")]
    pub filename: String,
}

// Default value functions
fn default_content_path() -> String {
    DEFAULT_DOCUMENT_PATH.to_string()
}

fn default_output_dir() -> String {
    "public".to_string()
}

fn default_true() -> bool {
    true
}

fn default_feed_limit() -> usize {
    20
}

fn default_feed_filename() -> String {
    "rss.xml".to_string()
}

fn default_sitemap_filename() -> String {
    "sitemap.xml".to_string()
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            path: default_content_path(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            base_url: None,
            drafts: false,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            limit: default_feed_limit(),
            filename: default_feed_filename(),
        }
    }
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            filename: default_sitemap_filename(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load the file if present, then apply `QUIRE_*` environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        Self::load_layered(path, Self::environment())
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("QUIRE")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_layered(path: &Path, env: config::Environment) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(env)
            .build()?;

        let config: Config = settings.try_deserialize()?;
        config.validate()?;

        tracing::debug!(path = %path.display(), exists = path.exists(), "loaded configuration");
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<()> {
        if self.content.path.trim().is_empty() {
            return Err(CoreError::config("content.path cannot be empty"));
        }

        if self.build.output_dir.trim().is_empty() {
            return Err(CoreError::config("build.output_dir cannot be empty"));
        }

        if self.feed.enabled && self.feed.filename.trim().is_empty() {
            return Err(CoreError::config("feed.filename cannot be empty"));
        }

        if self.sitemap.enabled && self.sitemap.filename.trim().is_empty() {
            return Err(CoreError::config("sitemap.filename cannot be empty"));
        }

        if self.build.base_url.as_deref().is_some_and(|u| u.ends_with('/')) {
            tracing::warn!("build.base_url should not have a trailing slash");
        }

        Ok(())
    }

    /// Serialize back to TOML, as written by `quire init`.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| CoreError::config_with_source("Failed to serialize configuration", e))
    }

    /// Absolute path of the site document under `root`.
    pub fn document_path(&self, root: &Path) -> PathBuf {
        root.join(&self.content.path)
    }

    /// Store for the site document under `root`.
    pub fn store(&self, root: &Path) -> ContentStore {
        ContentStore::new(self.document_path(root))
    }

    /// Output directory under `root`.
    pub fn output_dir(&self, root: &Path) -> PathBuf {
        root.join(&self.build.output_dir)
    }

    /// Resolve the base URL: an explicit override, then `build.base_url`,
    /// then the site's own URL, then the placeholder.
    pub fn base_url(&self, override_url: Option<&str>, site_url: Option<&str>) -> String {
        let configured = [override_url, self.build.base_url.as_deref(), site_url]
            .into_iter()
            .flatten()
            .find(|u| !u.trim().is_empty());
        resolve_base_url(configured)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn create_test_config() -> String {
        r#"
[content]
path = "data/site.json"

[build]
output_dir = "dist"
base_url = "https://blog.dev"
drafts = true

[feed]
limit = 15
filename = "feed.xml"

[sitemap]
enabled = false
"#
        .to_string()
    }

    #[test]
    fn test_load_config() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("quire.toml");
        let mut file = std::fs::File::create(&config_path).expect("create file");
        file.write_all(create_test_config().as_bytes())
            .expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config.content.path, "data/site.json");
        assert_eq!(config.build.output_dir, "dist");
        assert_eq!(config.build.base_url.as_deref(), Some("https://blog.dev"));
        assert!(config.build.drafts);
        assert!(config.feed.enabled);
        assert_eq!(config.feed.limit, 15);
        assert_eq!(config.feed.filename, "feed.xml");
        assert!(!config.sitemap.enabled);
        assert_eq!(config.sitemap.filename, "sitemap.xml");
        assert_eq!(
            config.document_path(dir.path()),
            dir.path().join("data/site.json")
        );
    }

    #[test]
    fn test_config_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("quire.toml");
        std::fs::write(&config_path, "").expect("write");

        let config = Config::load(&config_path).expect("load config");

        assert_eq!(config, Config::default());
        assert_eq!(config.content.path, "content/site.json");
        assert_eq!(config.build.output_dir, "public");
        assert_eq!(config.feed.limit, 20);
        assert_eq!(config.feed.filename, "rss.xml");
    }

    #[test]
    fn test_config_not_found() {
        let result = Config::load(Path::new("/nonexistent/quire.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_load_with_env_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let env = Config::environment().source(Some(config::Map::new()));

        let config = Config::load_layered(&dir.path().join("quire.toml"), env).expect("load");
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_environment_overrides_file() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("quire.toml");
        std::fs::write(&config_path, create_test_config()).expect("write");

        let vars = [
            ("QUIRE_BUILD__BASE_URL", "https://env.dev"),
            ("QUIRE_FEED__LIMIT", "5"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
        let env = Config::environment().source(Some(vars));

        let config = Config::load_layered(&config_path, env).expect("load");
        assert_eq!(config.build.base_url.as_deref(), Some("https://env.dev"));
        assert_eq!(config.feed.limit, 5);
        assert_eq!(config.build.output_dir, "dist");
    }

    #[test]
    fn test_config_validation_empty_output_dir() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let config_path = dir.path().join("quire.toml");
        std::fs::write(&config_path, "[build]\noutput_dir = \"\"\n").expect("write");

        let result = Config::load(&config_path);
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("output_dir cannot be empty")
        );
    }

    #[test]
    fn test_base_url_precedence() {
        let mut config = Config::default();
        assert_eq!(config.base_url(None, None), "https://example.com");
        assert_eq!(
            config.base_url(None, Some("https://site.dev/")),
            "https://site.dev"
        );

        config.build.base_url = Some("https://config.dev".into());
        assert_eq!(
            config.base_url(None, Some("https://site.dev")),
            "https://config.dev"
        );
        assert_eq!(
            config.base_url(Some("https://cli.dev"), Some("https://site.dev")),
            "https://cli.dev"
        );
        assert_eq!(config.base_url(Some(""), None), "https://config.dev");
    }

    #[test]
    fn test_to_toml_round_trip() {
        let config = Config::default();
        let text = config.to_toml().expect("serialize");
        let parsed: Config = toml::from_str(&text).expect("parse");
        assert_eq!(parsed, config);
    }
}
