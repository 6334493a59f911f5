//! Binance venue adapter.
//!
//! Symbol discovery unions two sources: the funding-info endpoint (which
//! carries explicit funding intervals) and the exchange-info catalog
//! restricted to trading perpetuals. Symbols known only to exchange-info get
//! their interval inferred from the spacing of their two most recent funding
//! events.

use async_trait::async_trait;
use funding_core::{
    FundingObservation, FundingSymbolInfo, SymbolPair, VenueAdapter, VenueCode, VenueResult,
};
use std::collections::HashMap;
use std::time::Duration;

use crate::client::BinanceClient;
use crate::models::{ExchangeInfo, FundingInfoEntry, FundingRateEntry};

const MAX_PARALLELISM: usize = 1;
const HISTORY_BATCH_SIZE: usize = 10;
const PAGE_LIMIT: usize = 1000;
const PAGE_DELAY: Duration = Duration::from_millis(400);

pub struct BinanceAdapter {
    client: BinanceClient,
}

impl BinanceAdapter {
    #[must_use]
    pub fn new(client: BinanceClient) -> Self {
        Self { client }
    }

    async fn funding_rates(
        &self,
        symbol: &str,
        start_time: Option<i64>,
        limit: usize,
    ) -> VenueResult<Vec<FundingRateEntry>> {
        let mut path = format!("/fapi/v1/fundingRate?symbol={symbol}&limit={limit}");
        if let Some(start) = start_time {
            path.push_str(&format!("&startTime={start}"));
        }
        self.client.get(&path).await
    }

    /// Infers the funding interval for a symbol absent from funding-info by
    /// asking for its two most recent funding events. Only deltas of a whole
    /// 1..=24 hours are accepted; anything else disqualifies the symbol.
    async fn infer_funding_info(&self, symbol: &str) -> VenueResult<Option<FundingSymbolInfo>> {
        let recent = self.funding_rates(symbol, None, 2).await?;
        let Some(interval) = infer_interval_hours(&recent) else {
            tracing::debug!("{}: funding interval not inferrable, skipping", symbol);
            return Ok(None);
        };

        Ok(Some(FundingSymbolInfo {
            symbol_name: symbol.to_string(),
            interval_hours: Some(interval),
            launch_time: None,
        }))
    }
}

/// Delta in whole hours between the two most recent funding events, accepted
/// only inside 1..=24.
fn infer_interval_hours(recent: &[FundingRateEntry]) -> Option<i32> {
    if recent.len() < 2 {
        return None;
    }
    let delta_ms = (recent[1].funding_time - recent[0].funding_time).abs();
    let hours = delta_ms / 3_600_000;
    if (1..=24).contains(&hours) {
        i32::try_from(hours).ok()
    } else {
        None
    }
}

#[async_trait]
impl VenueAdapter for BinanceAdapter {
    fn venue(&self) -> VenueCode {
        VenueCode::Binance
    }

    fn max_parallelism(&self) -> usize {
        MAX_PARALLELISM
    }

    fn history_batch_size(&self) -> usize {
        HISTORY_BATCH_SIZE
    }

    async fn list_active_perpetuals(&self) -> VenueResult<Vec<SymbolPair>> {
        let funding_info: Vec<FundingInfoEntry> = self.client.get("/fapi/v1/fundingInfo").await?;
        let exchange_info: ExchangeInfo = self.client.get("/fapi/v1/exchangeInfo").await?;

        let mut funding_by_symbol: HashMap<String, &FundingInfoEntry> = funding_info
            .iter()
            .map(|entry| (entry.symbol.clone(), entry))
            .collect();

        let mut pairs = Vec::new();

        for symbol in exchange_info
            .symbols
            .iter()
            .filter(|s| s.is_active_perpetual())
        {
            let funding = match funding_by_symbol.remove(&symbol.symbol) {
                Some(entry) => Some(FundingSymbolInfo::from(entry)),
                None => self.infer_funding_info(&symbol.symbol).await?,
            };
            let Some(funding) = funding else {
                continue;
            };
            pairs.push(SymbolPair {
                exchange: Some(symbol.into()),
                funding: Some(funding),
            });
        }

        // Funding-info symbols missing from the trading catalog still belong
        // to the union.
        for entry in funding_by_symbol.into_values() {
            pairs.push(SymbolPair {
                exchange: None,
                funding: Some(entry.into()),
            });
        }

        Ok(pairs)
    }

    async fn list_history(
        &self,
        symbol: &str,
        start_time: Option<i64>,
    ) -> VenueResult<Vec<FundingObservation>> {
        let mut observations = Vec::new();
        let mut cursor = start_time;

        loop {
            let page = self.funding_rates(symbol, cursor, PAGE_LIMIT).await?;
            if page.is_empty() {
                break;
            }

            let page_len = page.len();
            let last_time = page[page_len - 1].funding_time;

            for entry in &page {
                match entry.to_observation() {
                    Ok(obs) => observations.push(obs),
                    Err(e) => {
                        tracing::warn!("{}: unparseable funding rate: {}", symbol, e);
                    }
                }
            }

            if page_len < PAGE_LIMIT {
                break;
            }
            cursor = Some(last_time + 1);
            tokio::time::sleep(PAGE_DELAY).await;
        }

        Ok(observations)
    }

    async fn latest(&self, symbol: &str) -> VenueResult<Option<FundingObservation>> {
        let mut recent = self.funding_rates(symbol, None, 1).await?;
        match recent.pop() {
            Some(entry) => Ok(Some(entry.to_observation().map_err(|e| {
                funding_core::VenueError::api(VenueCode::Binance, e.to_string())
            })?)),
            None => Ok(None),
        }
    }

    async fn pacing_delay(&self, batch_rows: usize) {
        tokio::time::sleep(Duration::from_millis(batch_rows as u64 / 10)).await;
    }
}
