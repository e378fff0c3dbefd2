//! HTTP client for the institutional calendar feeds.
//!
//! One feed exists per cohort and semester at `{base}/{cohort}_{n}.ics`.
//! Bodies are decoded to UTF-8 using the charset from the `Content-Type`
//! header, falling back to UTF-8 when none is declared.

use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Per-request timeout for feed downloads.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Semester numbers probed for every cohort.
pub const SEMESTERS: std::ops::RangeInclusive<u8> = 1..=7;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Fetch cancelled")]
    Cancelled,
}

/// Downloads calendar feeds.
#[derive(Debug, Clone)]
pub struct FeedFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl FeedFetcher {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn feed_url(&self, cohort: &str, semester: u8) -> String {
        format!("{}/{cohort}_{semester}.ics", self.base_url)
    }

    /// Download one feed.
    ///
    /// Returns `Ok(None)` for a non-2xx response, which is logged and
    /// skipped. Network failures and timeouts are errors.
    pub async fn fetch(
        &self,
        cohort: &str,
        semester: u8,
        cancel: &CancellationToken,
    ) -> Result<Option<String>, FetchError> {
        let url = self.feed_url(cohort, semester);

        let download = async {
            let response = self.client.get(&url).send().await?;
            let status = response.status();
            if !status.is_success() {
                tracing::warn!(url = %url, status = status.as_u16(), "Feed request returned non-success status");
                return Ok(None);
            }
            let body = response.text().await?;
            tracing::debug!(url = %url, bytes = body.len(), "Feed downloaded");
            Ok(Some(body))
        };

        tokio::select! {
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = download => result,
        }
    }
}
