//! Hyperliquid venue adapter.
//!
//! The whole universe is perpetual and funding settles hourly, so there is
//! no interval discovery. History pages forward from `startTime`; a missing
//! start is treated as the beginning of 2000, long before the venue existed.

use async_trait::async_trait;
use chrono::Utc;
use funding_core::{FundingObservation, SymbolPair, VenueAdapter, VenueCode, VenueResult};
use std::time::Duration;

use crate::client::HyperliquidClient;
use crate::models::{FundingHistoryEntry, Meta};

const MAX_PARALLELISM: usize = 1;
const HISTORY_BATCH_SIZE: usize = 30;
/// Observed per-response cap of the fundingHistory endpoint.
const PAGE_CAP: usize = 500;
const PAGE_DELAY: Duration = Duration::from_millis(700);
/// 2000-01-01T00:00:00Z, the backfill start when none is given.
const DEFAULT_START_MS: i64 = 946_684_800_000;

pub struct HyperliquidAdapter {
    client: HyperliquidClient,
}

impl HyperliquidAdapter {
    #[must_use]
    pub fn new(client: HyperliquidClient) -> Self {
        Self { client }
    }

    async fn funding_history(
        &self,
        coin: &str,
        start_time: i64,
    ) -> VenueResult<Vec<FundingHistoryEntry>> {
        let body = serde_json::json!({
            "type": "fundingHistory",
            "coin": coin,
            "startTime": start_time,
        });
        self.client.info(&body).await
    }
}

#[async_trait]
impl VenueAdapter for HyperliquidAdapter {
    fn venue(&self) -> VenueCode {
        VenueCode::Hyperliquid
    }

    fn max_parallelism(&self) -> usize {
        MAX_PARALLELISM
    }

    fn history_batch_size(&self) -> usize {
        HISTORY_BATCH_SIZE
    }

    async fn list_active_perpetuals(&self) -> VenueResult<Vec<SymbolPair>> {
        let body = serde_json::json!({"type": "meta"});
        let meta: Meta = self.client.info(&body).await?;

        Ok(meta
            .universe
            .iter()
            .filter(|asset| asset.is_active())
            .map(|asset| SymbolPair {
                exchange: None,
                funding: Some(asset.into()),
            })
            .collect())
    }

    async fn list_history(
        &self,
        symbol: &str,
        start_time: Option<i64>,
    ) -> VenueResult<Vec<FundingObservation>> {
        let mut cursor = start_time.unwrap_or(DEFAULT_START_MS);
        let mut observations = Vec::new();

        loop {
            let page = self.funding_history(symbol, cursor).await?;
            if page.is_empty() {
                break;
            }

            let page_len = page.len();
            let last_time = page[page_len - 1].time;

            for entry in &page {
                match entry.to_observation() {
                    Ok(obs) => observations.push(obs),
                    Err(e) => {
                        tracing::warn!("{}: unparseable funding rate: {}", symbol, e);
                    }
                }
            }

            if page_len < PAGE_CAP || last_time < cursor {
                break;
            }
            cursor = last_time + 1;
            tokio::time::sleep(PAGE_DELAY).await;
        }

        Ok(observations)
    }

    async fn latest(&self, symbol: &str) -> VenueResult<Option<FundingObservation>> {
        // A two-day lookback always contains at least one hourly settlement.
        let start = Utc::now().timestamp_millis() - 48 * 3_600_000;
        let page = self.funding_history(symbol, start).await?;

        match page.last() {
            Some(entry) => Ok(Some(entry.to_observation().map_err(|e| {
                funding_core::VenueError::api(VenueCode::Hyperliquid, e.to_string())
            })?)),
            None => Ok(None),
        }
    }

    async fn pacing_delay(&self, batch_rows: usize) {
        tokio::time::sleep(Duration::from_millis(batch_rows as u64 / 10)).await;
    }
}
