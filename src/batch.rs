use futures_util::{StreamExt, stream};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::{ScrapeRequest, ScrapeResult, Scraper};

/// Default cap on in-flight scrapes. The platforms rate-limit aggressively
/// and each Facebook item may hold a subprocess, so the fan-out stays small.
pub const DEFAULT_CONCURRENCY: usize = 8;

/// Aggregate outcome of one batch refresh, mirroring the
/// "Updated: N, Failed: M" summary the stats job reports.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RefreshReport {
    pub updated: usize,
    pub failed: usize,
    /// Unsupported platforms, skipped without a network call.
    pub skipped: usize,
    pub results: Vec<(ScrapeRequest, ScrapeResult)>,
}

impl RefreshReport {
    pub fn summary(&self) -> String {
        format!(
            "Scraping complete. Updated: {}, Failed: {}",
            self.updated, self.failed
        )
    }
}

/// Refresh view counts for a batch of posts with bounded concurrency.
///
/// One slow or failing target never aborts the rest: the dispatcher's
/// containment contract turns every failure into a per-item error, and this
/// layer only counts them. Result order matches completion order, not input
/// order; callers needing input order should key off the returned request.
pub async fn refresh_stats(
    scraper: &Scraper,
    requests: Vec<ScrapeRequest>,
    concurrency: usize,
) -> RefreshReport {
    let concurrency = concurrency.max(1);

    let (scrapable, skipped): (Vec<_>, Vec<_>) = requests
        .into_iter()
        .partition(|r| r.platform.is_scrapable());

    let mut report = RefreshReport {
        updated: 0,
        failed: 0,
        skipped: skipped.len(),
        results: Vec::new(),
    };

    let mut outcomes = stream::iter(scrapable)
        .map(|request| async move {
            let result = scraper
                .fetch_social_stats(&request.url, request.platform)
                .await;
            (request, result)
        })
        .buffer_unordered(concurrency);

    while let Some((request, result)) = outcomes.next().await {
        if result.is_success() {
            report.updated += 1;
        } else {
            warn!(
                url = %request.url,
                platform = %request.platform,
                error = result.error.as_deref().unwrap_or("unknown"),
                "failed to refresh stats"
            );
            report.failed += 1;
        }
        report.results.push((request, result));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Platform, ScraperConfig};
    use crate::extractor::MetadataExtractor;
    use async_trait::async_trait;
    use httpmock::prelude::*;
    use std::sync::Arc;

    struct NoopExtractor;

    #[async_trait]
    impl MetadataExtractor for NoopExtractor {
        async fn extract_views(&self, _url: &str) -> Option<u64> {
            None
        }
    }

    fn test_scraper() -> Scraper {
        Scraper::new(ScraperConfig::default()).with_extractor(Arc::new(NoopExtractor))
    }

    #[tokio::test]
    async fn counts_updated_failed_and_skipped() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/good");
            then.status(200)
                .body(r#"<meta itemprop="interactionCount" content="10">"#);
        });
        server.mock(|when, then| {
            when.method(GET).path("/bad");
            then.status(500).body("oops");
        });

        let requests = vec![
            ScrapeRequest::new(server.url("/good"), Platform::Youtube),
            ScrapeRequest::new(server.url("/bad"), Platform::Youtube),
            ScrapeRequest::new(server.url("/ig"), Platform::Other),
        ];

        let scraper = test_scraper();
        let report = refresh_stats(&scraper, requests, DEFAULT_CONCURRENCY).await;

        assert_eq!(report.updated, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.results.len(), 2);
        assert_eq!(
            report.summary(),
            "Scraping complete. Updated: 1, Failed: 1"
        );
    }

    #[tokio::test]
    async fn one_failure_does_not_stop_the_batch() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/ok");
            then.status(200)
                .body(r#"<meta itemprop="interactionCount" content="5">"#);
        });

        // Two dead targets around a healthy one.
        let requests = vec![
            ScrapeRequest::new("http://127.0.0.1:1/a", Platform::Youtube),
            ScrapeRequest::new(server.url("/ok"), Platform::Youtube),
            ScrapeRequest::new("http://127.0.0.1:1/b", Platform::Tiktok),
        ];

        let scraper = test_scraper();
        let report = refresh_stats(&scraper, requests, 2).await;

        assert_eq!(report.updated, 1);
        assert_eq!(report.failed, 2);
        let ok = report
            .results
            .iter()
            .find(|(_, r)| r.is_success())
            .expect("one success");
        assert_eq!(ok.1.views, Some(5));
    }

    #[tokio::test]
    async fn zero_concurrency_is_clamped() {
        let scraper = test_scraper();
        let report = refresh_stats(
            &scraper,
            vec![ScrapeRequest::new("http://127.0.0.1:1/x", Platform::Youtube)],
            0,
        )
        .await;
        assert_eq!(report.failed, 1);
    }
}
