//! Hyperliquid info-endpoint client with rate limiting.

use funding_core::{VenueCode, VenueError, VenueResult};
use governor::{clock::DefaultClock, state::InMemoryState, Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Default Hyperliquid API base URL.
pub const HYPERLIQUID_API_URL: &str = "https://api.hyperliquid.xyz";

pub struct HyperliquidClient {
    http: Client,
    base_url: String,
    rate_limiter: Arc<RateLimiter<governor::state::NotKeyed, InMemoryState, DefaultClock>>,
}

impl HyperliquidClient {
    /// Creates a new client. 1200 requests per minute = 20 per second.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let quota = Quota::per_second(nonzero!(20u32));
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Every Hyperliquid read goes through `POST /info` with a typed body.
    pub(crate) async fn info<T: DeserializeOwned>(
        &self,
        body: &serde_json::Value,
    ) -> VenueResult<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}/info", self.base_url);
        tracing::debug!("POST {} {}", url, body);

        let response = self.http.post(&url).json(body).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VenueError::api(
                VenueCode::Hyperliquid,
                format!("http {status}: {text}"),
            ));
        }

        Ok(response.json::<T>().await?)
    }
}
