//! Build command - writes the feed and sitemap

use std::{path::Path, time::Instant};

use color_eyre::eyre::{Result, WrapErr};
use quire_generator::{BuildStats, Builder};

use crate::Project;

/// Run the build command.
///
/// Validates the site document and writes the derived artifacts to the
/// output directory. `output` and `base_url` override the configuration;
/// `drafts` includes draft pages.
pub fn run(
    project: &Project,
    output: Option<&Path>,
    base_url: Option<&str>,
    drafts: bool,
) -> Result<BuildStats> {
    let start = Instant::now();
    tracing::info!(?output, ?base_url, drafts, "Starting build");

    let mut config = project.config().clone();
    if drafts {
        config.build.drafts = true;
    }
    tracing::debug!(?config, "Loaded configuration");

    let mut builder = Builder::new(config, project.root());

    // Override output directory if specified
    if let Some(dir) = output {
        builder = builder.with_output_dir(project.root().join(dir));
    }

    // Override base URL if specified via CLI
    if let Some(url) = base_url {
        tracing::info!(base_url = url, "Overriding base URL from CLI");
        builder = builder.with_base_url(url);
    }

    let stats = builder.build().wrap_err("Build failed")?;

    let duration = start.elapsed();

    if !stats.warnings.is_empty() {
        println!();
        println!("  Warnings:");
        for warn in &stats.warnings {
            println!("  ⚠ {warn}");
        }
    }

    // Print build statistics
    println!();
    println!("  Build completed successfully!");
    println!();
    println!("  Pages:      {}", stats.pages);
    println!("  Drafts:     {}", stats.drafts);
    println!("  Feed items: {}", stats.feed_items);
    println!("  Sitemap:    {}", stats.sitemap_entries);
    println!();
    println!("  Duration:   {:.2}s", duration.as_secs_f64());
    println!("  Output:     {}", builder.output_dir().display());
    println!();

    tracing::info!(?stats, ?duration, "Build completed successfully");

    Ok(stats)
}
