//! Transient values exchanged between venue adapters and the sync pipelines.

use rust_decimal::Decimal;

/// One funding event as published by a venue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingObservation {
    pub rate: Decimal,
    /// Funding settlement time, epoch milliseconds. Zero means the venue
    /// returned a malformed record; row construction rejects it.
    pub funding_time: i64,
    /// Populated only by venues that report the cadence on the observation
    /// itself (MEXC). Everywhere else the symbol catalog carries it.
    pub interval_hours: Option<i32>,
}

/// Funding-side view of a catalog symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundingSymbolInfo {
    pub symbol_name: String,
    pub interval_hours: Option<i32>,
    /// Epoch ms of the symbol's first funding availability, if the venue
    /// exposes it.
    pub launch_time: Option<i64>,
}

/// Exchange-side view of a catalog symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeSymbolInfo {
    pub symbol_name: String,
    pub listing_date: Option<i64>,
}

/// A catalog entry: either side may be absent depending on which venue
/// endpoint produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolPair {
    pub exchange: Option<ExchangeSymbolInfo>,
    pub funding: Option<FundingSymbolInfo>,
}

impl SymbolPair {
    /// Raw symbol identity; funding-side wins, exchange-side is the fallback.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.funding
            .as_ref()
            .map(|f| f.symbol_name.as_str())
            .or_else(|| self.exchange.as_ref().map(|e| e.symbol_name.as_str()))
    }

    /// Earliest point a full backfill should start from: the funding launch
    /// time, falling back to the exchange listing date.
    #[must_use]
    pub fn backfill_start(&self) -> Option<i64> {
        self.funding
            .as_ref()
            .and_then(|f| f.launch_time)
            .or_else(|| self.exchange.as_ref().and_then(|e| e.listing_date))
    }

    /// Funding interval in hours, if the catalog knows it.
    #[must_use]
    pub fn interval_hours(&self) -> Option<i32> {
        self.funding.as_ref().and_then(|f| f.interval_hours)
    }
}
