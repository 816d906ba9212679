//! Init command - scaffold a new project

use std::fs;

use color_eyre::eyre::{Result, WrapErr, bail};
use quire_core::{SiteDocument, SiteInfo, Theme};

use crate::Project;

/// Run the init command.
///
/// Writes an empty site document and, if there is none yet, a `quire.toml`
/// with the default settings. Refuses to touch an existing document.
pub fn run(
    project: &Project,
    title: Option<&str>,
    theme: Option<Theme>,
    description: Option<&str>,
) -> Result<()> {
    tracing::info!(root = %project.root().display(), "Initializing project");

    let store = project.store();
    if store.exists() {
        bail!(
            "{} already exists; refusing to overwrite it",
            store.path().display()
        );
    }

    let defaults = SiteInfo::default();
    let site = SiteInfo {
        title: title.map_or(defaults.title.clone(), str::to_string),
        description: description.map(str::to_string).or(defaults.description.clone()),
        theme: Some(theme.unwrap_or_default().to_string()),
        ..defaults
    };

    store
        .init(&SiteDocument::new(site))
        .wrap_err("Failed to write site document")?;
    println!("Created: {}", store.path().display());

    let config_path = project.config_path();
    if !config_path.exists() {
        let toml = project
            .config()
            .to_toml()
            .wrap_err("Failed to render configuration")?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent).wrap_err("Failed to create directories")?;
        }
        fs::write(config_path, toml).wrap_err("Failed to write configuration")?;
        println!("Created: {}", config_path.display());
    }

    println!();
    println!("✓ Project initialized. Next: quire page new --title \"Hello\" --content \"...\"");

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use quire_core::Config;

    use super::*;

    fn project(root: &Path) -> Project {
        Project::with_config(root, root.join("quire.toml"), Config::default())
    }

    #[test]
    fn test_init_creates_document_and_config() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());

        run(&project, Some("Garden"), Some(Theme::Forest), None).unwrap();

        let doc = project.store().load().unwrap();
        assert_eq!(doc.site.title, "Garden");
        assert_eq!(doc.site.known_theme(), Some(Theme::Forest));
        assert!(doc.site.description.is_some());
        assert!(doc.pages.is_empty());

        let config = Config::load(project.config_path()).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_init_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());

        run(&project, None, None, None).unwrap();

        let site = project.store().load().unwrap().site;
        assert_eq!(site, SiteInfo::default());
    }

    #[test]
    fn test_init_refuses_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());

        run(&project, Some("First"), None, None).unwrap();
        assert!(run(&project, Some("Second"), None, None).is_err());

        let doc = project.store().load().unwrap();
        assert_eq!(doc.site.title, "First");
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let project = project(dir.path());
        fs::write(project.config_path(), "[feed]\nlimit = 3\n").unwrap();

        run(&project, None, None, None).unwrap();

        let text = fs::read_to_string(project.config_path()).unwrap();
        assert_eq!(text, "[feed]\nlimit = 3\n");
    }
}
