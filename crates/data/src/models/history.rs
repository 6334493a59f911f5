//! Funding history data model.
//!
//! One row per funding event per symbol per venue, append-only. The engine
//! treats `(symbol, venue_id, ts_rate)` as the identity of an event.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A persisted funding observation.
///
/// `symbol` is the normalized form; `name` preserves the venue's raw
/// spelling. Timestamps are epoch milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct FundingHistoryRecord {
    pub id: Uuid,
    pub venue_id: Uuid,
    pub symbol: String,
    pub name: String,
    pub interval_hours: i32,
    pub rate: Decimal,
    pub open_interest: Decimal,
    pub ts_rate: i64,
    pub fetched_at: i64,
}

impl FundingHistoryRecord {
    /// Funding cadence in milliseconds.
    #[must_use]
    pub fn interval_ms(&self) -> i64 {
        i64::from(self.interval_hours) * 3_600_000
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample() -> FundingHistoryRecord {
        FundingHistoryRecord {
            id: Uuid::new_v4(),
            venue_id: Uuid::new_v4(),
            symbol: "BTCUSDT".to_string(),
            name: "BTC_USDT".to_string(),
            interval_hours: 8,
            rate: dec!(0.0001),
            open_interest: Decimal::ZERO,
            ts_rate: 1_700_000_000_000,
            fetched_at: 1_700_000_100_000,
        }
    }

    #[test]
    fn test_interval_ms() {
        assert_eq!(sample().interval_ms(), 8 * 3_600_000);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let record = sample();
        let json = serde_json::to_string(&record).expect("serialization failed");
        let back: FundingHistoryRecord = serde_json::from_str(&json).expect("deserialization failed");
        assert_eq!(back.symbol, record.symbol);
        assert_eq!(back.rate, record.rate);
        assert_eq!(back.ts_rate, record.ts_rate);
    }
}
