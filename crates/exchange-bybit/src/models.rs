//! Wire types for the Bybit v5 market endpoints the adapter touches.

use funding_core::{FundingObservation, FundingSymbolInfo};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// The v5 response envelope shared by every endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BybitResponse<T> {
    pub ret_code: i32,
    pub ret_msg: String,
    pub result: Option<T>,
}

/// `GET /v5/market/instruments-info?category=linear` result.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentsResult {
    pub list: Vec<Instrument>,
    #[serde(default)]
    pub next_page_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instrument {
    pub symbol: String,
    pub contract_type: String,
    pub status: String,
    /// Funding cadence in minutes.
    pub funding_interval: i32,
    /// Listing time, epoch ms as a string.
    #[serde(default)]
    pub launch_time: Option<String>,
}

impl Instrument {
    #[must_use]
    pub fn is_linear_perpetual(&self) -> bool {
        self.contract_type == "LinearPerpetual"
    }

    #[must_use]
    pub fn is_trading(&self) -> bool {
        self.status == "Trading"
    }
}

impl From<&Instrument> for FundingSymbolInfo {
    fn from(instrument: &Instrument) -> Self {
        FundingSymbolInfo {
            symbol_name: instrument.symbol.clone(),
            interval_hours: Some(instrument.funding_interval / 60),
            launch_time: instrument
                .launch_time
                .as_deref()
                .and_then(|t| t.parse::<i64>().ok()),
        }
    }
}

/// `GET /v5/market/funding/history` result. Entries arrive newest-first.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingHistoryResult {
    pub list: Vec<FundingHistoryEntry>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingHistoryEntry {
    pub symbol: String,
    pub funding_rate: String,
    /// Epoch ms as a string.
    pub funding_rate_timestamp: String,
}

impl FundingHistoryEntry {
    #[must_use]
    pub fn timestamp_ms(&self) -> i64 {
        self.funding_rate_timestamp.parse().unwrap_or(0)
    }

    /// Converts to the engine's observation type.
    ///
    /// # Errors
    /// Fails if the rate string is not a decimal number.
    pub fn to_observation(&self) -> Result<FundingObservation, rust_decimal::Error> {
        Ok(FundingObservation {
            rate: Decimal::from_str(&self.funding_rate)?,
            funding_time: self.timestamp_ms(),
            interval_hours: None,
        })
    }
}
