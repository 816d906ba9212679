//! quire CLI
//!
//! Scaffold, validate and build JSON-driven static sites.
//!
//! This is the binary entry point. The library functionality is in `lib.rs`.

use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{Result, WrapErr, bail};
use quire::{Project, cmd};
use quire_core::{NewPage, PageSelector, PageUpdate, SiteUpdate, Theme};

/// Command-line interface for quire.
#[derive(Parser)]
#[command(
    name = "quire",
    version,
    about = "Scaffold, validate and build JSON-driven static sites"
)]
struct Cli {
    /// Project directory
    #[arg(short, long, default_value = ".", global = true)]
    root: PathBuf,

    /// Path to configuration file, relative to the project directory
    #[arg(short, long, default_value = "quire.toml", global = true)]
    config: PathBuf,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available CLI commands.
#[derive(clap::Subcommand)]
enum Commands {
    /// Create a new project with an empty site document
    Init {
        /// Site title
        #[arg(long)]
        title: Option<String>,
        /// Site theme
        #[arg(long)]
        theme: Option<Theme>,
        /// Site description
        #[arg(long)]
        description: Option<String>,
    },
    /// Validate the site document
    Check {
        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,
    },
    /// Write the RSS feed and sitemap
    Build {
        /// Output directory
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Override the base URL (e.g., https://example.com)
        #[arg(long)]
        base_url: Option<String>,
        /// Include draft pages
        #[arg(long)]
        drafts: bool,
    },
    /// Manage pages
    #[command(subcommand)]
    Page(PageCommand),
    /// Show or update site metadata
    Site {
        /// New site title
        #[arg(long)]
        title: Option<String>,
        /// New site theme
        #[arg(long)]
        theme: Option<Theme>,
        /// New site description
        #[arg(long)]
        description: Option<String>,
    },
}

/// Page subcommands.
#[derive(clap::Subcommand)]
enum PageCommand {
    /// Create a page
    New {
        #[command(flatten)]
        fields: PageFields,
    },
    /// Update fields of an existing page
    Edit {
        /// Slug of the page to edit
        #[arg(value_name = "SLUG")]
        target: String,
        #[command(flatten)]
        fields: PageFields,
    },
    /// Delete a page by slug or position
    Delete {
        /// Slug of the page to delete
        #[arg(required_unless_present = "index", conflicts_with = "index")]
        slug: Option<String>,
        /// Zero-based position of the page to delete
        #[arg(long)]
        index: Option<usize>,
    },
    /// List pages in document order
    List,
    /// Show one page
    Show {
        /// Page slug
        slug: String,
    },
}

/// Page fields shared by `page new` and `page edit`.
#[derive(clap::Args, Debug, Default)]
struct PageFields {
    /// Page title
    #[arg(long)]
    title: Option<String>,
    /// URL slug (derived from the title when omitted)
    #[arg(long)]
    slug: Option<String>,
    /// Markdown content
    #[arg(long, conflicts_with = "content_file")]
    content: Option<String>,
    /// Read markdown content from a file
    #[arg(long)]
    content_file: Option<PathBuf>,
    /// Short description
    #[arg(long)]
    description: Option<String>,
    /// Category
    #[arg(long)]
    category: Option<String>,
    /// Tag (repeatable)
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Publication date (YYYY-MM-DD)
    #[arg(long)]
    date: Option<String>,
    /// Reading time in minutes
    #[arg(long)]
    reading_time: Option<u32>,
    /// Mark as draft
    #[arg(long, overrides_with = "no_draft")]
    draft: bool,
    /// Clear the draft flag
    #[arg(long, overrides_with = "draft")]
    no_draft: bool,
    /// Mark as featured
    #[arg(long, overrides_with = "no_featured")]
    featured: bool,
    /// Clear the featured flag
    #[arg(long, overrides_with = "featured")]
    no_featured: bool,
    /// Author name
    #[arg(long)]
    author: Option<String>,
    /// Image URL
    #[arg(long)]
    image: Option<String>,
}

impl PageFields {
    fn content(&self) -> Result<Option<String>> {
        match &self.content_file {
            Some(path) => std::fs::read_to_string(path)
                .map(Some)
                .wrap_err_with(|| format!("Failed to read {}", path.display())),
            None => Ok(self.content.clone()),
        }
    }

    fn into_new_page(self) -> Result<NewPage> {
        let content = self.content()?.unwrap_or_default();
        Ok(NewPage {
            title: self.title.unwrap_or_default(),
            slug: self.slug,
            content,
            description: self.description,
            category: self.category,
            tags: self.tags,
            published_at: self.date,
            reading_time: self.reading_time,
            draft: self.draft,
            featured: self.featured,
            author: self.author,
            image: self.image,
        })
    }

    fn into_update(self) -> Result<PageUpdate> {
        let content = self.content()?;
        Ok(PageUpdate {
            title: self.title,
            slug: self.slug,
            content,
            description: self.description,
            category: self.category,
            tags: (!self.tags.is_empty()).then_some(self.tags),
            published_at: self.date,
            reading_time: self.reading_time,
            draft: toggle(self.draft, self.no_draft),
            featured: toggle(self.featured, self.no_featured),
            author: self.author,
            image: self.image,
        })
    }
}

/// `Some(true)` for `--flag`, `Some(false)` for `--no-flag`, else unchanged.
fn toggle(set: bool, clear: bool) -> Option<bool> {
    match (set, clear) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    quire::init_tracing(cli.verbose);

    let project = Project::open(&cli.root, &cli.config)?;

    match cli.command {
        Commands::Init {
            title,
            theme,
            description,
        } => {
            cmd::init::run(&project, title.as_deref(), theme, description.as_deref())?;
        }
        Commands::Check { strict } => {
            cmd::check::run(&project, strict)?;
        }
        Commands::Build {
            output,
            base_url,
            drafts,
        } => {
            cmd::build::run(&project, output.as_deref(), base_url.as_deref(), drafts)?;
        }
        Commands::Page(page) => match page {
            PageCommand::New { fields } => {
                cmd::page::new(&project, fields.into_new_page()?)?;
            }
            PageCommand::Edit { target, fields } => {
                cmd::page::edit(&project, &PageSelector::Slug(target), fields.into_update()?)?;
            }
            PageCommand::Delete { slug, index } => {
                let selector = match (slug, index) {
                    (Some(slug), _) => PageSelector::Slug(slug),
                    (None, Some(index)) => PageSelector::Index(index),
                    (None, None) => bail!("Give a page slug or --index"),
                };
                cmd::page::delete(&project, &selector)?;
            }
            PageCommand::List => {
                cmd::page::list(&project)?;
            }
            PageCommand::Show { slug } => {
                cmd::page::show(&project, &slug)?;
            }
        },
        Commands::Site {
            title,
            theme,
            description,
        } => {
            cmd::site::run(
                &project,
                SiteUpdate {
                    title,
                    theme,
                    description,
                },
            )?;
        }
    }

    Ok(())
}
