use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::Command;
use tracing::warn;

/// Capability interface over the out-of-process media-metadata tool.
///
/// The adapter is one fallback strategy among several, so its contract is
/// total absorption: every failure mode resolves to `None`, never an error.
#[async_trait]
pub trait MetadataExtractor: Send + Sync {
    async fn extract_views(&self, url: &str) -> Option<u64>;
}

/// yt-dlp adapter. Spawns one process per call with a bounded wall-clock
/// timeout; no retry, no output caching.
pub struct YtDlpExtractor {
    path: PathBuf,
    timeout: Duration,
}

impl YtDlpExtractor {
    pub fn new(path: PathBuf, timeout: Duration) -> Self {
        Self { path, timeout }
    }

    async fn run(&self, url: &str) -> Option<Vec<u8>> {
        let child = Command::new(&self.path)
            .arg("--dump-json")
            .arg(url)
            .arg("--no-warnings")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = match tokio::time::timeout(self.timeout, child).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                warn!(path = %self.path.display(), error = %e, "extractor spawn failed");
                return None;
            }
            Err(_) => {
                warn!(url, timeout = ?self.timeout, "extractor timed out");
                return None;
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(url, status = ?output.status.code(), %stderr, "extractor exited non-zero");
            return None;
        }

        Some(output.stdout)
    }
}

#[async_trait]
impl MetadataExtractor for YtDlpExtractor {
    async fn extract_views(&self, url: &str) -> Option<u64> {
        let stdout = self.run(url).await?;

        let data: Value = match serde_json::from_slice(&stdout) {
            Ok(data) => data,
            Err(e) => {
                warn!(url, error = %e, "extractor emitted non-JSON output");
                return None;
            }
        };

        data.get("view_count").and_then(Value::as_u64)
    }
}
