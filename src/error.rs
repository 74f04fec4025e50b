use thiserror::Error;

/// Failure taxonomy for one scrape attempt.
///
/// Every variant is non-fatal: the dispatcher converts it into the `error`
/// string of a [`crate::ScrapeResult`] and nothing crosses its boundary as a
/// language-level error. Display strings are part of the contract -- the
/// batch caller logs them verbatim.
#[derive(Error, Debug)]
pub enum ScrapeError {
    #[error("Platform not supported for scraping")]
    UnsupportedPlatform,

    #[error("HTTP {0}")]
    HttpStatus(u16),

    #[error("Could not parse views")]
    ParseFailure,

    /// Facebook only: the external extractor and the desktop fetch-and-parse
    /// path both came up empty.
    #[error("Could not parse views (FB Desktop + external extractor failed)")]
    CompositeFailure,

    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timeout for URL: {0}")]
    RequestTimeout(String),

    #[error("Invalid header value: {0}")]
    Header(#[from] reqwest::header::InvalidHeaderValue),
}

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_strings_match_contract() {
        assert_eq!(
            ScrapeError::UnsupportedPlatform.to_string(),
            "Platform not supported for scraping"
        );
        assert_eq!(ScrapeError::HttpStatus(403).to_string(), "HTTP 403");
        assert_eq!(ScrapeError::ParseFailure.to_string(), "Could not parse views");
        assert_eq!(
            ScrapeError::CompositeFailure.to_string(),
            "Could not parse views (FB Desktop + external extractor failed)"
        );
    }
}
