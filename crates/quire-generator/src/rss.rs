//! RSS feed generation.
//!
//! Serializes derived feed items into an RSS 2.0 channel.

use std::io::Write;

use quire_core::{FeedItem, SiteInfo, config::FeedConfig};
use rss::{Category, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use thiserror::Error;
use tracing::debug;

/// RSS generation errors.
#[derive(Debug, Error)]
pub enum RssError {
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for RSS operations.
pub type Result<T> = std::result::Result<T, RssError>;

/// RSS feed generator.
#[derive(Debug, Clone)]
pub struct RssGenerator {
    title: String,
    description: String,
    link: String,
    author: Option<String>,
    limit: usize,
}

impl RssGenerator {
    /// Create a generator for a site's channel.
    #[must_use]
    pub fn new(site: &SiteInfo, base_url: impl Into<String>, feed: &FeedConfig) -> Self {
        let description = site
            .description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(&site.title)
            .to_string();

        Self {
            title: site.title.clone(),
            description,
            link: base_url.into(),
            author: site.author.clone(),
            limit: feed.limit,
        }
    }

    /// Generate RSS feed XML. Items are expected newest first; only the
    /// first `limit` are kept.
    pub fn generate(&self, items: &[FeedItem]) -> String {
        let items: Vec<Item> = items
            .iter()
            .take(self.limit)
            .map(|item| self.to_rss_item(item))
            .collect();

        debug!(count = items.len(), limit = self.limit, "generating RSS feed");

        // Newest item date, so the same content always yields the same XML.
        let last_build_date = items.iter().find_map(|i| i.pub_date().map(str::to_string));

        let channel = ChannelBuilder::default()
            .title(&self.title)
            .link(&self.link)
            .description(&self.description)
            .last_build_date(last_build_date)
            .items(items)
            .build();

        channel.to_string()
    }

    fn to_rss_item(&self, item: &FeedItem) -> Item {
        let guid = GuidBuilder::default()
            .value(&item.link)
            .permalink(true)
            .build();

        let mut builder = ItemBuilder::default();
        builder.title(Some(item.title.clone()));
        builder.link(Some(item.link.clone()));
        builder.guid(Some(guid));

        if let Some(date) = item.pub_date {
            builder.pub_date(Some(date.to_rfc2822()));
        }

        if !item.description.is_empty() {
            builder.description(Some(item.description.clone()));
        }

        if let Some(author) = &self.author {
            builder.author(Some(author.clone()));
        }

        let categories: Vec<_> = item
            .categories
            .iter()
            .map(|name| Category {
                name: name.clone(),
                domain: None,
            })
            .collect();

        if !categories.is_empty() {
            builder.categories(categories);
        }

        builder.build()
    }

    /// Write RSS feed to a writer.
    pub fn write_to<W: Write>(&self, items: &[FeedItem], writer: &mut W) -> Result<()> {
        writer.write_all(self.generate(items).as_bytes())?;
        Ok(())
    }
}
