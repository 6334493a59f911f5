//! Wire types for the Binance futures endpoints the adapter touches.

use funding_core::{ExchangeSymbolInfo, FundingObservation, FundingSymbolInfo};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// One entry of `GET /fapi/v1/fundingInfo`. Binance only lists symbols here
/// whose funding cadence differs from the 8 h default or that carry rate
/// caps, so the exchange-info catalog is the authoritative symbol universe.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingInfoEntry {
    pub symbol: String,
    pub funding_interval_hours: i32,
}

impl From<&FundingInfoEntry> for FundingSymbolInfo {
    fn from(entry: &FundingInfoEntry) -> Self {
        FundingSymbolInfo {
            symbol_name: entry.symbol.clone(),
            interval_hours: Some(entry.funding_interval_hours),
            launch_time: None,
        }
    }
}

/// `GET /fapi/v1/exchangeInfo` payload, trimmed to what symbol discovery
/// needs.
#[derive(Debug, Clone, Deserialize)]
pub struct ExchangeInfo {
    pub symbols: Vec<ExchangeSymbol>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExchangeSymbol {
    pub symbol: String,
    pub status: String,
    pub contract_type: String,
    /// Listing time, epoch ms.
    pub onboard_date: Option<i64>,
}

impl ExchangeSymbol {
    #[must_use]
    pub fn is_active_perpetual(&self) -> bool {
        self.status == "TRADING" && self.contract_type == "PERPETUAL"
    }
}

impl From<&ExchangeSymbol> for ExchangeSymbolInfo {
    fn from(symbol: &ExchangeSymbol) -> Self {
        ExchangeSymbolInfo {
            symbol_name: symbol.symbol.clone(),
            listing_date: symbol.onboard_date,
        }
    }
}

/// One entry of `GET /fapi/v1/fundingRate`. Rates arrive as strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingRateEntry {
    pub symbol: String,
    pub funding_rate: String,
    pub funding_time: i64,
}

impl FundingRateEntry {
    /// Converts to the engine's observation type.
    ///
    /// # Errors
    /// Fails if the rate string is not a decimal number.
    pub fn to_observation(&self) -> Result<FundingObservation, rust_decimal::Error> {
        Ok(FundingObservation {
            rate: Decimal::from_str(&self.funding_rate)?,
            funding_time: self.funding_time,
            interval_hours: None,
        })
    }
}
