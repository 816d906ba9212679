//! Check command - validate configuration and content

use color_eyre::eyre::{Result, WrapErr, bail};
use quire_core::{ValidationReport, validate::validate_value};

use crate::Project;

/// Run the check command.
///
/// Validates the site document and prints every error and warning.
/// Errors fail the command; with `strict`, so do warnings.
pub fn run(project: &Project, strict: bool) -> Result<ValidationReport> {
    let store = project.store();
    tracing::info!(path = %store.path().display(), strict, "Checking content");

    println!("Checking {}...", store.path().display());
    let raw = store
        .load_raw()
        .wrap_err_with(|| format!("Failed to read {}", store.path().display()))?;
    println!("  ✓ Document parsed");

    let report = validate_value(&raw);

    // Print summary
    println!();
    println!("Summary:");
    println!("  Errors:   {}", report.errors.len());
    println!("  Warnings: {}", report.warnings.len());

    if report.has_errors() {
        println!();
        println!("Errors:");
        for err in &report.errors {
            println!("  ✗ {err}");
        }
    }

    if report.has_warnings() {
        println!();
        println!("Warnings:");
        for warn in &report.warnings {
            println!("  ⚠ {warn}");
        }
    }

    // Determine exit status
    if report.has_errors() {
        bail!("Validation failed with {} error(s)", report.errors.len());
    }

    if strict && report.has_warnings() {
        bail!(
            "Validation failed with {} warning(s) (strict mode)",
            report.warnings.len()
        );
    }

    println!();
    println!("✓ All checks passed");

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use quire_core::Config;

    use super::*;

    fn project_with(root: &Path, json: &str) -> Project {
        let project = Project::with_config(root, root.join("quire.toml"), Config::default());
        let path = project.store().path().to_path_buf();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, json).unwrap();
        project
    }

    #[test]
    fn test_check_valid_document() {
        let dir = tempfile::tempdir().unwrap();
        let project = project_with(
            dir.path(),
            r#"{ "site": { "title": "T", "description": "D" },
                 "pages": [{ "title": "A", "slug": "a", "content": "x" }] }"#,
        );

        let report = run(&project, true).unwrap();
        assert!(report.is_valid());
        assert!(!report.has_warnings());
    }

    #[test]
    fn test_check_reports_errors() {
        let dir = tempfile::tempdir().unwrap();
        let project = project_with(
            dir.path(),
            r#"{ "site": { "title": "T" },
                 "pages": [{ "title": "A", "slug": "Bad Slug", "content": "x" }] }"#,
        );

        let err = run(&project, false).unwrap_err();
        assert!(err.to_string().contains("1 error(s)"));
    }

    #[test]
    fn test_check_strict_fails_on_warnings() {
        let dir = tempfile::tempdir().unwrap();
        let project = project_with(
            dir.path(),
            r#"{ "site": { "title": "T" }, "pages": [] }"#,
        );

        let report = run(&project, false).unwrap();
        assert_eq!(report.warnings, ["site.description is missing"]);

        let err = run(&project, true).unwrap_err();
        assert!(err.to_string().contains("strict mode"));
    }

    #[test]
    fn test_check_reports_missing_structure() {
        let dir = tempfile::tempdir().unwrap();
        let project = project_with(dir.path(), r#"{ "pages": {} }"#);

        let err = run(&project, false).unwrap_err();
        assert!(err.to_string().contains("2 error(s)"));
    }

    #[test]
    fn test_check_missing_document() {
        let dir = tempfile::tempdir().unwrap();
        let project = Project::with_config(dir.path(), "quire.toml", Config::default());

        assert!(run(&project, false).is_err());
    }
}
