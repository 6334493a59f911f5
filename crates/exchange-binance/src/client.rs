//! Binance USDⓈ-M futures REST client with rate limiting.

use funding_core::{VenueCode, VenueError, VenueResult};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use std::sync::Arc;

/// Default Binance futures API base URL.
pub const BINANCE_FUTURES_URL: &str = "https://fapi.binance.com";

pub struct BinanceClient {
    http: Client,
    base_url: String,
    rate_limiter: Arc<
        RateLimiter<
            governor::state::NotKeyed,
            governor::state::InMemoryState,
            governor::clock::DefaultClock,
        >,
    >,
}

impl BinanceClient {
    /// Creates a new client. 10 requests per second keeps well inside the
    /// 2400-weight-per-minute budget of the public futures endpoints.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let quota = Quota::per_second(nonzero!(10u32));
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Waits for the rate limiter and issues a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> VenueResult<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VenueError::api(
                VenueCode::Binance,
                format!("http {status}: {text}"),
            ));
        }

        Ok(response.json::<T>().await?)
    }
}
