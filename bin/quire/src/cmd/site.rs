//! Site command - show or update site metadata

use color_eyre::eyre::{Result, WrapErr};
use quire_core::{SiteInfo, SiteUpdate, mutate::update_site_config};

use crate::Project;

/// Run the site command.
///
/// With no changes requested, prints the current metadata.
pub fn run(project: &Project, update: SiteUpdate) -> Result<SiteInfo> {
    let store = project.store();

    let unchanged = update.title.is_none() && update.theme.is_none() && update.description.is_none();
    let site = if unchanged {
        store.load().wrap_err("Failed to load site document")?.site
    } else {
        tracing::info!(?update, "Updating site configuration");
        store
            .update(|doc| Ok(update_site_config(doc, update).clone()))
            .wrap_err("Failed to update site configuration")?
    };

    println!("Title:       {}", site.title);
    println!(
        "Description: {}",
        site.description.as_deref().unwrap_or("-")
    );
    println!("Theme:       {}", site.theme.as_deref().unwrap_or("-"));
    if let Some(url) = &site.url {
        println!("URL:         {url}");
    }

    Ok(site)
}

#[cfg(test)]
mod tests {
    use quire_core::{Config, ContentStore, SiteDocument, Theme};

    use super::*;

    #[test]
    fn test_site_update_persists() {
        let dir = tempfile::tempdir().unwrap();
        ContentStore::in_project(dir.path())
            .save(&SiteDocument::default())
            .unwrap();
        let project = Project::with_config(dir.path(), "quire.toml", Config::default());

        let site = run(
            &project,
            SiteUpdate {
                title: Some("Renamed".into()),
                theme: Some(Theme::Midnight),
                description: None,
            },
        )
        .unwrap();
        assert_eq!(site.title, "Renamed");

        let shown = run(&project, SiteUpdate::default()).unwrap();
        assert_eq!(shown.title, "Renamed");
        assert_eq!(shown.theme.as_deref(), Some("midnight"));
        assert_eq!(shown.description, SiteInfo::default().description);
    }

    #[test]
    fn test_site_without_document_fails() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::with_config(dir.path(), "quire.toml", Config::default());

        assert!(run(&project, SiteUpdate::default()).is_err());
    }
}
