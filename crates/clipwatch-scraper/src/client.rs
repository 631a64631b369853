//! Shared HTTP client for the platform sources.

use std::time::Duration;

use reqwest::Client;

use clipwatch_core::AppConfig;

use crate::error::ScrapeError;
use crate::rate_limit::retry_with_backoff;

/// HTTP client shared by every platform source.
///
/// Handles rate limiting (429), not-found (404), and other non-2xx responses
/// as typed errors. Transient errors (429, network failures) are
/// automatically retried with exponential backoff up to `max_retries`
/// additional attempts.
pub struct SourceClient {
    client: Client,
    /// Maximum number of retry attempts after the first failure.
    max_retries: u32,
    /// Base delay in seconds for exponential backoff: `backoff_base_secs * 2^attempt`.
    backoff_base_secs: u64,
}

impl SourceClient {
    /// Creates a `SourceClient` with configured timeout, `User-Agent`, and
    /// retry policy. Set `max_retries` to `0` to disable retries.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed (e.g., invalid TLS config).
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_retries: u32,
        backoff_base_secs: u64,
    ) -> Result<Self, ScrapeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            max_retries,
            backoff_base_secs,
        })
    }

    /// Creates a `SourceClient` from the application config's scraper knobs.
    ///
    /// # Errors
    ///
    /// Returns [`ScrapeError::Http`] if the underlying client cannot be built.
    pub fn from_config(config: &AppConfig) -> Result<Self, ScrapeError> {
        Self::new(
            config.scraper_request_timeout_secs,
            &config.scraper_user_agent,
            config.scraper_max_retries,
            config.scraper_retry_backoff_base_secs,
        )
    }

    /// GET `url` with the given extra headers and return the response body,
    /// retrying transient failures.
    ///
    /// # Errors
    ///
    /// - [`ScrapeError::RateLimited`] — HTTP 429 after all retries exhausted.
    /// - [`ScrapeError::NotFound`] — HTTP 404 (not retried).
    /// - [`ScrapeError::UnexpectedStatus`] — any other non-2xx status.
    /// - [`ScrapeError::Http`] — network or TLS failure after all retries.
    pub async fn get_text(
        &self,
        url: &str,
        headers: &[(&str, &str)],
    ) -> Result<String, ScrapeError> {
        retry_with_backoff(self.max_retries, self.backoff_base_secs, || async {
            let mut request = self.client.get(url).header(
                reqwest::header::ACCEPT,
                "application/json,application/xml;q=0.9,*/*;q=0.8",
            );
            for (name, value) in headers {
                request = request.header(*name, *value);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                let retry_after_secs = response
                    .headers()
                    .get(reqwest::header::RETRY_AFTER)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(60);
                return Err(ScrapeError::RateLimited {
                    domain: domain_of(url),
                    retry_after_secs,
                });
            }

            if status == reqwest::StatusCode::NOT_FOUND {
                return Err(ScrapeError::NotFound {
                    url: url.to_owned(),
                });
            }

            if !status.is_success() {
                return Err(ScrapeError::UnexpectedStatus {
                    status: status.as_u16(),
                    url: url.to_owned(),
                });
            }

            Ok(response.text().await?)
        })
        .await
    }
}

/// Host component of `url`, falling back to the raw string for log context.
fn domain_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_else(|| url.to_owned())
}

#[cfg(test)]
mod tests {
    use super::domain_of;

    #[test]
    fn domain_of_extracts_host() {
        assert_eq!(
            domain_of("https://www.youtube.com/feeds/videos.xml?search_query=x"),
            "www.youtube.com"
        );
    }

    #[test]
    fn domain_of_falls_back_to_raw_input() {
        assert_eq!(domain_of("not a url"), "not a url");
    }
}
