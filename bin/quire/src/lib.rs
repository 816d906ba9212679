//! quire CLI library
//!
//! Command implementations for the `quire` binary, exposed as a library so
//! they can be driven from tests.
//!
//! # Modules
//!
//! - [`cmd`] - Command implementations (init, check, build, page, site)
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//!
//! use quire::{Project, cmd};
//!
//! let project = Project::open(Path::new("."), Path::new("quire.toml")).unwrap();
//! cmd::build::run(&project, None, None, false).unwrap();
//! ```

use std::path::{Path, PathBuf};

use color_eyre::eyre::{Result, WrapErr};
use quire_core::{Config, ContentStore};

pub mod cmd;

// Re-export core types for convenience
pub use quire_core::{Page, SiteDocument};
pub use quire_generator::{BuildStats, Builder};

/// Everything a command needs to know about the project it runs in.
#[derive(Debug, Clone)]
pub struct Project {
    root: PathBuf,
    config_path: PathBuf,
    config: Config,
}

impl Project {
    /// Load the project at `root`.
    ///
    /// A relative `config_path` is resolved against `root`. A missing
    /// config file means defaults; `QUIRE_*` variables apply either way.
    pub fn open(root: &Path, config_path: &Path) -> Result<Self> {
        let config_path = root.join(config_path);
        let config = Config::load_with_env(&config_path)
            .wrap_err_with(|| format!("Failed to load {}", config_path.display()))?;

        Ok(Self::with_config(root, config_path, config))
    }

    /// Project with an already loaded configuration.
    pub fn with_config(root: &Path, config_path: impl Into<PathBuf>, config: Config) -> Self {
        Self {
            root: root.to_path_buf(),
            config_path: config_path.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Store for the project's site document.
    pub fn store(&self) -> ContentStore {
        self.config.store(&self.root)
    }
}

/// Initialize tracing with the specified verbosity level.
///
/// # Arguments
///
/// * `verbose` - Verbosity level (0 = WARN, 1 = INFO, 2 = DEBUG, 3+ = TRACE)
///
/// # Example
///
/// ```no_run
/// quire::init_tracing(2); // Enable DEBUG level logging
/// ```
pub fn init_tracing(verbose: u8) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
