//! Bybit venue adapter.
//!
//! History pages backward: Bybit serves its funding history newest-first by
//! `endTime`, so the adapter walks toward the past until it crosses the
//! requested start, then hands back an ascending slice.

use async_trait::async_trait;
use chrono::Utc;
use funding_core::{FundingObservation, SymbolPair, VenueAdapter, VenueCode, VenueResult};
use std::time::Duration;

use crate::client::BybitClient;
use crate::models::{FundingHistoryResult, Instrument, InstrumentsResult};

const MAX_PARALLELISM: usize = 10;
const HISTORY_BATCH_SIZE: usize = 50;
const PAGE_LIMIT: usize = 200;
const CATALOG_PAGE_LIMIT: usize = 1000;

pub struct BybitAdapter {
    client: BybitClient,
}

impl BybitAdapter {
    #[must_use]
    pub fn new(client: BybitClient) -> Self {
        Self { client }
    }

    async fn instruments(&self) -> VenueResult<Vec<Instrument>> {
        let mut instruments = Vec::new();
        let mut cursor: Option<String> = None;

        loop {
            let mut path = format!(
                "/v5/market/instruments-info?category=linear&limit={CATALOG_PAGE_LIMIT}"
            );
            if let Some(ref c) = cursor {
                path.push_str(&format!("&cursor={c}"));
            }

            let page: InstrumentsResult = self.client.get(&path).await?;
            instruments.extend(page.list);

            match page.next_page_cursor {
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        Ok(instruments)
    }

    async fn funding_history_page(
        &self,
        symbol: &str,
        end_time: Option<i64>,
    ) -> VenueResult<FundingHistoryResult> {
        let mut path = format!(
            "/v5/market/funding/history?category=linear&symbol={symbol}&limit={PAGE_LIMIT}"
        );
        if let Some(end) = end_time {
            path.push_str(&format!("&endTime={end}"));
        }
        self.client.get(&path).await
    }

    fn catalog(&self, instruments: &[Instrument], trading_only: bool) -> Vec<SymbolPair> {
        instruments
            .iter()
            .filter(|i| i.is_linear_perpetual())
            .filter(|i| !trading_only || i.is_trading())
            .map(|i| SymbolPair {
                exchange: None,
                funding: Some(i.into()),
            })
            .collect()
    }
}

#[async_trait]
impl VenueAdapter for BybitAdapter {
    fn venue(&self) -> VenueCode {
        VenueCode::Bybit
    }

    fn max_parallelism(&self) -> usize {
        MAX_PARALLELISM
    }

    fn history_batch_size(&self) -> usize {
        HISTORY_BATCH_SIZE
    }

    async fn list_active_perpetuals(&self) -> VenueResult<Vec<SymbolPair>> {
        let instruments = self.instruments().await?;
        Ok(self.catalog(&instruments, false))
    }

    async fn list_online_symbols(&self) -> VenueResult<Vec<SymbolPair>> {
        let instruments = self.instruments().await?;
        Ok(self.catalog(&instruments, true))
    }

    async fn list_history(
        &self,
        symbol: &str,
        start_time: Option<i64>,
    ) -> VenueResult<Vec<FundingObservation>> {
        let floor = start_time.unwrap_or(0);
        let mut entries = Vec::new();
        let mut end_time: Option<i64> = None;

        loop {
            let page = self.funding_history_page(symbol, end_time).await?;
            if page.list.is_empty() {
                break;
            }

            let page_len = page.list.len();
            let earliest = page
                .list
                .iter()
                .map(crate::models::FundingHistoryEntry::timestamp_ms)
                .min()
                .unwrap_or(0);
            entries.extend(page.list);

            if earliest <= floor || page_len < PAGE_LIMIT {
                break;
            }
            end_time = Some(earliest - 1);
        }

        let mut observations: Vec<FundingObservation> = entries
            .iter()
            .filter_map(|entry| match entry.to_observation() {
                Ok(obs) => Some(obs),
                Err(e) => {
                    tracing::warn!("{}: unparseable funding rate: {}", symbol, e);
                    None
                }
            })
            .filter(|obs| obs.funding_time >= floor)
            .collect();

        observations.sort_by_key(|obs| obs.funding_time);
        Ok(observations)
    }

    async fn latest(&self, symbol: &str) -> VenueResult<Option<FundingObservation>> {
        let now = Utc::now().timestamp_millis();
        let page = self.funding_history_page(symbol, Some(now)).await?;

        let newest = page
            .list
            .iter()
            .max_by_key(|entry| entry.timestamp_ms());
        match newest {
            Some(entry) => Ok(Some(entry.to_observation().map_err(|e| {
                funding_core::VenueError::api(VenueCode::Bybit, e.to_string())
            })?)),
            None => Ok(None),
        }
    }

    async fn pacing_delay(&self, batch_rows: usize) {
        tokio::time::sleep(Duration::from_millis(batch_rows as u64 / 10)).await;
    }
}
