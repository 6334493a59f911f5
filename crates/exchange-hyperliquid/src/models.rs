//! Wire types for the Hyperliquid info endpoint.

use funding_core::{FundingObservation, FundingSymbolInfo};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;

/// `{"type": "meta"}` response: the perpetual universe.
#[derive(Debug, Clone, Deserialize)]
pub struct Meta {
    pub universe: Vec<AssetMeta>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetMeta {
    pub name: String,
    #[serde(default)]
    pub is_delisted: Option<bool>,
}

impl AssetMeta {
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.is_delisted.unwrap_or(false)
    }
}

impl From<&AssetMeta> for FundingSymbolInfo {
    fn from(asset: &AssetMeta) -> Self {
        FundingSymbolInfo {
            symbol_name: asset.name.clone(),
            // Hyperliquid settles funding hourly for every perpetual.
            interval_hours: Some(1),
            launch_time: None,
        }
    }
}

/// One entry of a `{"type": "fundingHistory"}` response, ascending by time.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingHistoryEntry {
    pub coin: String,
    pub funding_rate: String,
    pub time: i64,
}

impl FundingHistoryEntry {
    /// Converts to the engine's observation type.
    ///
    /// # Errors
    /// Fails if the rate string is not a decimal number.
    pub fn to_observation(&self) -> Result<FundingObservation, rust_decimal::Error> {
        Ok(FundingObservation {
            rate: Decimal::from_str(&self.funding_rate)?,
            funding_time: self.time,
            interval_hours: None,
        })
    }
}
