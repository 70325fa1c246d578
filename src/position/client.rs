use std::future::Future;
use std::time::Duration;

use super::error::FetchError;
use super::sample::PositionSample;

/// Public feed for the International Space Station.
pub const DEFAULT_POSITION_URL: &str = "https://api.wheretheiss.at/v1/satellites/25544/";

/// Source of the current position of the tracked object.
///
/// A single attempt per call; the refresh loop calls again on its next tick.
pub trait PositionClient: Send + Sync {
    fn fetch_current_position(
        &self,
    ) -> impl Future<Output = Result<PositionSample, FetchError>> + Send;
}

/// Fetches samples over HTTP with a reusable `reqwest::Client`.
pub struct HttpPositionClient {
    http: reqwest::Client,
    url: String,
}

impl HttpPositionClient {
    /// Without a `timeout` the request waits as long as the network layer allows.
    pub fn new(url: String, timeout: Option<Duration>) -> Result<Self, FetchError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self { http, url })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl PositionClient for HttpPositionClient {
    async fn fetch_current_position(&self) -> Result<PositionSample, FetchError> {
        let bytes = self
            .http
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .bytes()
            .await?;

        let sample: PositionSample = serde_json::from_slice(&bytes)?;

        log::debug!(
            "Fetched position of {}: {:.3}, {:.3}",
            sample.id,
            sample.latitude,
            sample.longitude
        );

        Ok(sample)
    }
}
