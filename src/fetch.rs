use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use std::time::Duration;

use crate::error::{Result, ScrapeError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Initialize HTTP client with default configuration
pub fn get_http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(DEFAULT_TIMEOUT)
        .build()
        .expect("Failed to create HTTP client")
}

/// Get default headers for requests
fn get_default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(USER_AGENT, HeaderValue::from_static(DEFAULT_USER_AGENT));
    headers
}

/// Create custom headers layered over the defaults
fn create_custom_headers(additional_headers: Option<HeaderMap>) -> HeaderMap {
    let mut headers = get_default_headers();

    if let Some(custom) = additional_headers {
        headers.extend(custom);
    }

    headers
}

/// Execute GET request with error handling
async fn execute_request(
    client: &reqwest::Client,
    url: &str,
    headers: Option<HeaderMap>,
) -> Result<reqwest::Response> {
    let request_headers = create_custom_headers(headers);
    let request = client.get(url).headers(request_headers);

    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ScrapeError::RequestTimeout(url.to_string())
        } else {
            ScrapeError::Network(e)
        }
    })?;

    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(ScrapeError::HttpStatus(status.as_u16()))
    }
}

/// Download text content from URL
pub async fn download_text(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = execute_request(client, url, None).await?;
    response.text().await.map_err(ScrapeError::from)
}

/// Download text content from URL with custom headers
pub async fn download_text_with_headers(
    client: &reqwest::Client,
    url: &str,
    headers: HeaderMap,
) -> Result<String> {
    let response = execute_request(client, url, Some(headers)).await?;
    response.text().await.map_err(ScrapeError::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    #[tokio::test]
    async fn download_text_returns_body() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET).path("/page");
            then.status(200).body("hello");
        });

        let client = get_http_client();
        let body = download_text(&client, &server.url("/page")).await.unwrap();
        mock.assert();
        assert_eq!(body, "hello");
    }

    #[tokio::test]
    async fn non_success_status_maps_to_http_error() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/blocked");
            then.status(403).body("login required");
        });

        let client = get_http_client();
        let err = download_text(&client, &server.url("/blocked"))
            .await
            .unwrap_err();
        assert!(matches!(err, ScrapeError::HttpStatus(403)));
    }

    #[tokio::test]
    async fn custom_headers_are_sent() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/ref")
                .header("Referer", "https://www.tiktok.com/");
            then.status(200).body("ok");
        });

        let mut headers = HeaderMap::new();
        headers.insert(
            "Referer",
            HeaderValue::from_static("https://www.tiktok.com/"),
        );

        let client = get_http_client();
        let body = download_text_with_headers(&client, &server.url("/ref"), headers)
            .await
            .unwrap();
        mock.assert();
        assert_eq!(body, "ok");
    }
}
