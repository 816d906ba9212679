//! quire generator library
//!
//! Writes the artifacts derived from a quire site document.
//!
//! # Modules
//!
//! - [`rss`] - RSS feed generation
//! - [`sitemap`] - XML sitemap generation
//! - [`build`] - Build orchestration

pub mod build;
pub mod rss;
pub mod sitemap;

pub use build::{BuildError, BuildStats, Builder};
pub use rss::RssGenerator;
pub use sitemap::SitemapGenerator;
