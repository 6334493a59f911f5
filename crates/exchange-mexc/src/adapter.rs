//! MEXC venue adapter.
//!
//! History is page-number based and newest-first; a walk stops once the
//! current page reaches the reported total. The funding interval only exists
//! on the observations themselves (`collectCycle`), never in the catalog.

use async_trait::async_trait;
use funding_core::{FundingObservation, SymbolPair, VenueAdapter, VenueCode, VenueResult};
use std::time::Duration;

use crate::client::MexcClient;
use crate::models::{ContractDetail, FundingHistoryPage};

const HISTORY_PARALLELISM: usize = 3;
const ONLINE_PARALLELISM: usize = 2;
const HISTORY_BATCH_SIZE: usize = 30;
const PAGE_SIZE: usize = 1000;
const PAGE_DELAY: Duration = Duration::from_millis(500);

pub struct MexcAdapter {
    client: MexcClient,
}

impl MexcAdapter {
    #[must_use]
    pub fn new(client: MexcClient) -> Self {
        Self { client }
    }

    async fn funding_history_page(
        &self,
        symbol: &str,
        page_num: i32,
        page_size: usize,
    ) -> VenueResult<FundingHistoryPage> {
        let path = format!(
            "/api/v1/contract/funding_rate/history?symbol={symbol}&page_num={page_num}&page_size={page_size}"
        );
        self.client.get(&path).await
    }
}

#[async_trait]
impl VenueAdapter for MexcAdapter {
    fn venue(&self) -> VenueCode {
        VenueCode::Mexc
    }

    fn max_parallelism(&self) -> usize {
        HISTORY_PARALLELISM
    }

    fn online_parallelism(&self) -> usize {
        ONLINE_PARALLELISM
    }

    fn history_batch_size(&self) -> usize {
        HISTORY_BATCH_SIZE
    }

    async fn list_active_perpetuals(&self) -> VenueResult<Vec<SymbolPair>> {
        let details: Vec<ContractDetail> = self.client.get("/api/v1/contract/detail").await?;

        Ok(details
            .iter()
            .filter(|detail| detail.is_enabled())
            .map(|detail| SymbolPair {
                exchange: None,
                funding: Some(detail.into()),
            })
            .collect())
    }

    async fn list_history(
        &self,
        symbol: &str,
        start_time: Option<i64>,
    ) -> VenueResult<Vec<FundingObservation>> {
        let floor = start_time.unwrap_or(0);
        let mut observations: Vec<FundingObservation> = Vec::new();
        let mut page_num = 1;

        loop {
            let page = self
                .funding_history_page(symbol, page_num, PAGE_SIZE)
                .await?;
            observations.extend(page.result_list.iter().map(FundingObservation::from));

            if page.current_page >= page.total_page {
                break;
            }
            // Pages walk toward the past; once a page's oldest entry is
            // before the floor, everything further back is too.
            if observations
                .last()
                .is_some_and(|obs| obs.funding_time < floor)
            {
                break;
            }
            page_num += 1;
            tokio::time::sleep(PAGE_DELAY).await;
        }

        observations.retain(|obs| obs.funding_time >= floor);
        observations.sort_by_key(|obs| obs.funding_time);
        Ok(observations)
    }

    async fn latest(&self, symbol: &str) -> VenueResult<Option<FundingObservation>> {
        let page = self.funding_history_page(symbol, 1, 1).await?;
        Ok(page.result_list.first().map(FundingObservation::from))
    }

    async fn pacing_delay(&self, batch_rows: usize) {
        tokio::time::sleep(Duration::from_millis(batch_rows as u64 / 10)).await;
    }
}
