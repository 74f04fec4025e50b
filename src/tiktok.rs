use regex::Regex;
use reqwest::header::{HeaderMap, HeaderValue};
use tracing::debug;

use crate::error::{Result, ScrapeError};
use crate::fetch::download_text_with_headers;

const TIKTOK_ORIGIN: &str = "https://www.tiktok.com/";

/// Fetch the view count for a TikTok video page.
///
/// TikTok rejects scrapes without a plausible referer, so the request
/// carries the platform's own origin. The embedded state blob exposes the
/// count as `"playCount":N`; there is no further fallback for this platform.
pub async fn fetch_stats(client: &reqwest::Client, url: &str) -> Result<u64> {
    let mut headers = HeaderMap::new();
    headers.insert("Referer", HeaderValue::from_static(TIKTOK_ORIGIN));

    let html = download_text_with_headers(client, url, headers).await?;

    match play_count(&html) {
        Some(views) => {
            debug!(views, "tiktok playCount matched");
            Ok(views)
        }
        None => Err(ScrapeError::ParseFailure),
    }
}

fn play_count(html: &str) -> Option<u64> {
    let re = Regex::new(r#""playCount":\s*(\d+)"#).unwrap();
    re.captures(html)?.get(1)?.as_str().parse().ok()
}
