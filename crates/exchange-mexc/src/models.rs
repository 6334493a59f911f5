//! Wire types for the MEXC contract endpoints the adapter touches.

use funding_core::{FundingObservation, FundingSymbolInfo};
use rust_decimal::Decimal;
use serde::Deserialize;

/// The `{success, code, data}` envelope shared by every contract endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct MexcResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub code: i32,
    pub data: Option<T>,
}

/// One entry of `GET /api/v1/contract/detail`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractDetail {
    pub symbol: String,
    /// 0 = enabled.
    #[serde(default)]
    pub state: i32,
}

impl ContractDetail {
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state == 0
    }
}

impl From<&ContractDetail> for FundingSymbolInfo {
    fn from(detail: &ContractDetail) -> Self {
        FundingSymbolInfo {
            symbol_name: detail.symbol.clone(),
            // MEXC reports the cadence per observation, not per symbol.
            interval_hours: None,
            launch_time: None,
        }
    }
}

/// `GET /api/v1/contract/funding_rate/history` page. `resultList` arrives
/// newest-first.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingHistoryPage {
    pub current_page: i32,
    pub total_page: i32,
    pub result_list: Vec<FundingHistoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingHistoryEntry {
    pub symbol: String,
    pub funding_rate: Decimal,
    pub settle_time: i64,
    /// Funding cadence in hours, reported on the observation itself.
    pub collect_cycle: i32,
}

impl From<&FundingHistoryEntry> for FundingObservation {
    fn from(entry: &FundingHistoryEntry) -> Self {
        FundingObservation {
            rate: entry.funding_rate,
            funding_time: entry.settle_time,
            interval_hours: Some(entry.collect_cycle),
        }
    }
}
