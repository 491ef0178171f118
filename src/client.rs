//! HTTP client for the channel telemetry API.
//!
//! Two read-only GET endpoints, both JSON:
//! - `/channels/{id}/feeds/last.json` — single feed entry (latest reading)
//! - `/channels/{id}/feeds.json`      — envelope with a `feeds` array
//!
//! Non-success statuses map to [`DashError::Fetch`], bodies that fail to
//! decode map to [`DashError::Parse`]. No retry, no backoff: a failed fetch
//! surfaces once and the next poll tick is unaffected.

use crate::error::DashError;
use crate::models::{FeedEntry, FeedResponse, Reading, TimeRange};

// ---

pub const DEFAULT_BASE_URL: &str = "https://api.thingspeak.com";

#[derive(Debug, Clone)]
pub struct TelemetryClient {
    // ---
    http: reqwest::Client,
    base_url: String,
}

impl Default for TelemetryClient {
    fn default() -> Self {
        Self::new()
    }
}

impl TelemetryClient {
    // ---
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against an alternate host (integration tests, self-hosted
    /// API-compatible servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        // ---
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    /// Fetch the latest reading for the configured channel.
    ///
    /// Parsed on the current-reading path (zero fallback), see
    /// [`FeedEntry::to_current`].
    pub async fn fetch_latest(&self, config: &crate::Config) -> Result<Reading, DashError> {
        // ---
        tracing::debug!("Fetching latest reading for channel {}", config.channel_id);

        let body = self.get_body(&self.latest_url(config)).await?;
        let entry: FeedEntry = serde_json::from_str(&body).map_err(DashError::Parse)?;

        Ok(entry.to_current())
    }

    /// Fetch the historical feed for the configured channel and time range.
    ///
    /// The result count comes from the fixed [`TimeRange`] mapping. Entries
    /// are parsed on the historical path (null fallback), preserving gaps.
    pub async fn fetch_history(
        &self,
        config: &crate::Config,
        range: TimeRange,
    ) -> Result<Vec<Reading>, DashError> {
        // ---
        tracing::debug!(
            "Fetching {} history entries for channel {}",
            range.result_count(),
            config.channel_id
        );

        let body = self.get_body(&self.history_url(config, range)).await?;
        let response: FeedResponse = serde_json::from_str(&body).map_err(DashError::Parse)?;

        let readings: Vec<Reading> = response.feeds.iter().map(FeedEntry::to_sample).collect();

        tracing::debug!("History fetch returned {} entries", readings.len());
        Ok(readings)
    }

    // ---

    fn latest_url(&self, config: &crate::Config) -> String {
        format!(
            "{}/channels/{}/feeds/last.json?api_key={}",
            self.base_url, config.channel_id, config.api_key
        )
    }

    fn history_url(&self, config: &crate::Config, range: TimeRange) -> String {
        format!(
            "{}/channels/{}/feeds.json?api_key={}&results={}",
            self.base_url,
            config.channel_id,
            config.api_key,
            range.result_count()
        )
    }

    async fn get_body(&self, url: &str) -> Result<String, DashError> {
        // ---
        let response = self.http.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::debug!("GET {} -> {}", url, status);
            return Err(DashError::Fetch {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

// ---

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn config() -> crate::Config {
        crate::Config {
            channel_id: "123456".into(),
            api_key: "SECRET".into(),
        }
    }

    #[test]
    fn latest_url_shape() {
        // ---
        let client = TelemetryClient::new();
        assert_eq!(
            client.latest_url(&config()),
            "https://api.thingspeak.com/channels/123456/feeds/last.json?api_key=SECRET"
        );
    }

    #[test]
    fn history_url_carries_result_count() {
        // ---
        let client = TelemetryClient::with_base_url("http://localhost:9000/");
        assert_eq!(
            client.history_url(&config(), TimeRange::D7),
            "http://localhost:9000/channels/123456/feeds.json?api_key=SECRET&results=500"
        );
    }
}
