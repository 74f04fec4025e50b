use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
pub use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};
use tracing::{debug, warn};

use crate::error::ScrapeError;
use crate::extractor::{MetadataExtractor, YtDlpExtractor};
use crate::fetch::get_http_client;
use crate::{facebook, tiktok, youtube};

/// Supported platforms
#[derive(
    EnumIter, EnumString, Display, Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash,
)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
#[serde(rename_all = "UPPERCASE")]
pub enum Platform {
    Youtube,
    Tiktok,
    Facebook,
    /// Anything without a working strategy chain. Fast-fails in the
    /// dispatcher before any network I/O.
    Other,
}

impl Platform {
    /// Parse a caller-supplied platform tag. Unknown tags map to
    /// [`Platform::Other`] rather than an error, so a new platform enum
    /// value upstream degrades to "unsupported" instead of breaking the
    /// batch job.
    pub fn from_tag(tag: &str) -> Self {
        tag.parse().unwrap_or(Platform::Other)
    }

    pub fn is_scrapable(&self) -> bool {
        !matches!(self, Platform::Other)
    }
}

/// One scrape target
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapeRequest {
    pub url: String,
    pub platform: Platform,
}

impl ScrapeRequest {
    pub fn new(url: impl Into<String>, platform: Platform) -> Self {
        Self {
            url: url.into(),
            platform,
        }
    }
}

/// Outcome of one scrape attempt.
///
/// `views == None` uniformly means "unknown" to the caller; `error` carries
/// the reason when one is known. Both fields `None` is tolerated and still
/// means "unknown".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapeResult {
    pub views: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ScrapeResult {
    pub fn views(views: u64) -> Self {
        Self {
            views: Some(views),
            error: None,
        }
    }

    pub fn error(error: impl ToString) -> Self {
        Self {
            views: None,
            error: Some(error.to_string()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.views.is_some()
    }
}

/// Process-level configuration, passed in explicitly so tests can inject
/// fakes without touching the environment.
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// Session cookie attached to Facebook desktop fetches when present.
    pub facebook_cookie: Option<String>,
    /// Path to the external extractor binary.
    pub ytdlp_path: PathBuf,
    /// Wall-clock limit for one external extractor invocation.
    pub extractor_timeout: Duration,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            facebook_cookie: None,
            ytdlp_path: PathBuf::from("yt-dlp"),
            extractor_timeout: Duration::from_secs(30),
        }
    }
}

impl ScraperConfig {
    /// Read configuration from the environment: `FACEBOOK_COOKIE` and
    /// `YTDLP_PATH` (falls back to `yt-dlp` on PATH).
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Ok(cookie) = std::env::var("FACEBOOK_COOKIE")
            && !cookie.is_empty()
        {
            config.facebook_cookie = Some(cookie);
        }
        if let Ok(path) = std::env::var("YTDLP_PATH")
            && !path.is_empty()
        {
            config.ytdlp_path = PathBuf::from(path);
        }
        config
    }

    pub fn with_facebook_cookie(mut self, cookie: impl Into<String>) -> Self {
        self.facebook_cookie = Some(cookie.into());
        self
    }

    pub fn with_ytdlp_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.ytdlp_path = path.into();
        self
    }

    pub fn with_extractor_timeout(mut self, timeout: Duration) -> Self {
        self.extractor_timeout = timeout;
        self
    }
}

/// Platform dispatcher.
///
/// Routes a `(url, platform)` pair to the matching strategy chain and owns
/// the success/failure contract: [`Scraper::fetch_social_stats`] never
/// returns an error and never panics, so a batch caller can fan out over
/// many posts without one bad target aborting the rest.
pub struct Scraper {
    client: reqwest::Client,
    config: ScraperConfig,
    extractor: Arc<dyn MetadataExtractor>,
}

impl Scraper {
    pub fn new(config: ScraperConfig) -> Self {
        let extractor = Arc::new(YtDlpExtractor::new(
            config.ytdlp_path.clone(),
            config.extractor_timeout,
        ));
        Self {
            client: get_http_client(),
            config,
            extractor,
        }
    }

    /// Replace the external extractor capability. Used by the Facebook chain
    /// tests to avoid spawning real processes.
    pub fn with_extractor(mut self, extractor: Arc<dyn MetadataExtractor>) -> Self {
        self.extractor = extractor;
        self
    }

    /// Fetch the view count for one post.
    ///
    /// Every failure path inside a platform chain is caught here and
    /// converted to an error string; unsupported platforms fast-fail before
    /// any network call.
    pub async fn fetch_social_stats(&self, url: &str, platform: Platform) -> ScrapeResult {
        let outcome = match platform {
            Platform::Youtube => youtube::fetch_stats(&self.client, url).await,
            Platform::Tiktok => tiktok::fetch_stats(&self.client, url).await,
            Platform::Facebook => {
                facebook::fetch_stats(
                    &self.client,
                    url,
                    self.config.facebook_cookie.as_deref(),
                    self.extractor.as_ref(),
                )
                .await
            }
            Platform::Other => Err(ScrapeError::UnsupportedPlatform),
        };

        match outcome {
            Ok(views) => {
                debug!(url, %platform, views, "scrape succeeded");
                ScrapeResult::views(views)
            }
            Err(e) => {
                warn!(url, %platform, error = %e, "scrape failed");
                ScrapeResult::error(e)
            }
        }
    }
}

/// Fetch stats for one URL with environment-sourced configuration.
pub async fn fetch_social_stats(url: &str, platform_tag: &str) -> ScrapeResult {
    let scraper = Scraper::new(ScraperConfig::from_env());
    scraper
        .fetch_social_stats(url, Platform::from_tag(platform_tag))
        .await
}
