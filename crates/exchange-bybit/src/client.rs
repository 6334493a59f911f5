//! Bybit v5 REST client with rate limiting.

use funding_core::{VenueCode, VenueError, VenueResult};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::models::BybitResponse;

/// Default Bybit API base URL.
pub const BYBIT_API_URL: &str = "https://api.bybit.com";

pub struct BybitClient {
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

impl BybitClient {
    /// Creates a new client. Public market endpoints allow 10 req/s per IP.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let quota = Quota::per_second(nonzero!(10u32));
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Waits for the rate limiter, issues a GET, and unwraps the v5 response
    /// envelope. A non-zero `retCode` is a venue API error even on HTTP 200.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> VenueResult<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VenueError::api(
                VenueCode::Bybit,
                format!("http {status}: {text}"),
            ));
        }

        let envelope = response.json::<BybitResponse<T>>().await?;
        if envelope.ret_code != 0 {
            return Err(VenueError::api(
                VenueCode::Bybit,
                format!("retCode {}: {}", envelope.ret_code, envelope.ret_msg),
            ));
        }

        envelope.result.ok_or_else(|| {
            VenueError::api(VenueCode::Bybit, "success response with empty result")
        })
    }
}
