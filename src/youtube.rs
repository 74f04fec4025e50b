use regex::Regex;
use tracing::debug;

use crate::error::{Result, ScrapeError};
use crate::fetch::download_text;

/// Parsing strategies in priority order: machine-structured fields first,
/// free text last (free text is fragile to phrasing and locale changes).
const STRATEGIES: &[(&str, fn(&str) -> Option<u64>)] = &[
    ("interaction_count_meta", interaction_count_meta),
    ("embedded_view_count", embedded_view_count),
    ("visible_views_text", visible_views_text),
];

/// Fetch the view count for a YouTube watch page.
pub async fn fetch_stats(client: &reqwest::Client, url: &str) -> Result<u64> {
    let html = download_text(client, url).await?;

    for (name, strategy) in STRATEGIES {
        if let Some(views) = strategy(&html) {
            debug!(strategy = name, views, "youtube strategy matched");
            return Ok(views);
        }
    }

    Err(ScrapeError::ParseFailure)
}

/// Strategy 1: dedicated semantic field in page metadata
fn interaction_count_meta(html: &str) -> Option<u64> {
    let re = Regex::new(r#"<meta itemprop="interactionCount" content="(\d+)""#).unwrap();
    re.captures(html)?.get(1)?.as_str().parse().ok()
}

/// Strategy 2: viewCount inside the embedded player response JSON
fn embedded_view_count(html: &str) -> Option<u64> {
    let re = Regex::new(r#""viewCount":"(\d+)""#).unwrap();
    re.captures(html)?.get(1)?.as_str().parse().ok()
}

/// Strategy 3: human-readable "1,234,567 views" text
fn visible_views_text(html: &str) -> Option<u64> {
    let re = Regex::new(r"(\d{1,3}(?:,\d{3})*)\s+views").unwrap();
    let raw = re.captures(html)?.get(1)?.as_str().replace(',', "");
    raw.parse().ok()
}
