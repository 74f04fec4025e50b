pub mod batch;
pub mod core;
pub mod error;
pub mod extractor;
mod facebook;
mod fetch;
mod tiktok;
mod youtube;

pub use batch::{DEFAULT_CONCURRENCY, RefreshReport, refresh_stats};
pub use core::{
    Platform, ScrapeRequest, ScrapeResult, Scraper, ScraperConfig, fetch_social_stats,
};
pub use error::{Result, ScrapeError};
pub use extractor::{MetadataExtractor, YtDlpExtractor};
