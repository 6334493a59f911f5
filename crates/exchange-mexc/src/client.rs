//! MEXC contract REST client with rate limiting.

use funding_core::{VenueCode, VenueError, VenueResult};
use governor::{Quota, RateLimiter};
use nonzero_ext::nonzero;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use crate::models::MexcResponse;

/// Default MEXC contract API base URL.
pub const MEXC_CONTRACT_URL: &str = "https://contract.mexc.com";

pub struct MexcClient {
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

impl MexcClient {
    /// Creates a new client. Public contract endpoints allow 20 req / 2 s;
    /// 5 per second leaves headroom for the paged history walks.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        let quota = Quota::per_second(nonzero!(5u32));
        Self {
            http: Client::new(),
            base_url: base_url.into(),
            rate_limiter: Arc::new(RateLimiter::direct(quota)),
        }
    }

    /// Waits for the rate limiter, issues a GET, and unwraps the
    /// `{success, code, data}` envelope. `success = false` is a venue API
    /// error even on HTTP 200.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> VenueResult<T> {
        self.rate_limiter.until_ready().await;

        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(VenueError::api(
                VenueCode::Mexc,
                format!("http {status}: {text}"),
            ));
        }

        let envelope = response.json::<MexcResponse<T>>().await?;
        if !envelope.success {
            return Err(VenueError::api(
                VenueCode::Mexc,
                format!("code {}", envelope.code),
            ));
        }

        envelope
            .data
            .ok_or_else(|| VenueError::api(VenueCode::Mexc, "success response with empty data"))
    }
}
