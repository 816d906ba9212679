//! quire core library
//!
//! Content model, storage, validation, derivation and mutation for quire
//! sites.

pub mod config;
pub mod derive;
pub mod document;
pub mod error;
pub mod mutate;
pub mod store;
pub mod validate;

pub use config::Config;
pub use derive::{FeedItem, SitemapEntry};
pub use document::{Page, SiteDocument, SiteInfo, Theme};
pub use error::{CoreError, Result};
pub use mutate::{NewPage, PageSelector, PageUpdate, SiteUpdate};
pub use store::ContentStore;
pub use validate::ValidationReport;
