//! Latest-funding snapshot model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The most recent funding observation for a `(symbol, venue)` pair.
///
/// Unlike history rows these are updated in place; `id` stays stable across
/// updates so downstream references keep working.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct OnlineFundingRecord {
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
