//! Funding history repository.
//!
//! Append-only storage with a chunked multi-row insert path sized for
//! cold-start backfills.

use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::filter::RateFilter;
use crate::models::FundingHistoryRecord;

/// Rows per INSERT statement in `bulk_insert`.
const BULK_CHUNK: usize = 10_000;

/// Storage operations on the funding history table.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// For each unique symbol of a venue, the row with maximum `ts_rate`.
    async fn latest_symbol_rates(&self, venue_id: Uuid) -> Result<Vec<FundingHistoryRecord>>;

    /// Query-surface variant: latest row per symbol (or per symbol × venue
    /// when `group_by_venue` is set), paged.
    async fn latest_rates_page(
        &self,
        filter: &RateFilter,
        group_by_venue: bool,
        page: i64,
        size: i64,
    ) -> Result<Vec<FundingHistoryRecord>>;

    async fn get_by_filter(
        &self,
        filter: &RateFilter,
        page: i64,
        size: i64,
    ) -> Result<Vec<FundingHistoryRecord>>;

    async fn unique_symbols_count(&self, filter: &RateFilter) -> Result<i64>;

    async fn count_by_filter(&self, filter: &RateFilter) -> Result<i64>;

    /// Inserts rows in chunks of at most 10 000, ignoring rows whose
    /// `(symbol, venue_id, ts_rate)` already exists. No separate save step.
    /// Returns the number of rows actually written.
    async fn bulk_insert(&self, rows: Vec<FundingHistoryRecord>) -> Result<u64>;
}

/// Postgres-backed history repository.
#[derive(Debug, Clone)]
pub struct PgHistoryRepository {
    pool: PgPool,
}

impl PgHistoryRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HistoryStore for PgHistoryRepository {
    async fn latest_symbol_rates(&self, venue_id: Uuid) -> Result<Vec<FundingHistoryRecord>> {
        let records = sqlx::query_as::<_, FundingHistoryRecord>(
            r"
            SELECT DISTINCT ON (symbol)
                id, venue_id, symbol, name, interval_hours, rate,
                open_interest, ts_rate, fetched_at
            FROM funding_history
            WHERE venue_id = $1
            ORDER BY symbol, ts_rate DESC
            ",
        )
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn latest_rates_page(
        &self,
        filter: &RateFilter,
        group_by_venue: bool,
        page: i64,
        size: i64,
    ) -> Result<Vec<FundingHistoryRecord>> {
        let query = if group_by_venue {
            r"
            SELECT DISTINCT ON (symbol, venue_id)
                id, venue_id, symbol, name, interval_hours, rate,
                open_interest, ts_rate, fetched_at
            FROM funding_history
            WHERE ($1::uuid IS NULL OR venue_id = $1)
              AND ($2::text IS NULL OR symbol = $2)
            ORDER BY symbol, venue_id, ts_rate DESC
            LIMIT $3 OFFSET $4
            "
        } else {
            r"
            SELECT DISTINCT ON (symbol)
                id, venue_id, symbol, name, interval_hours, rate,
                open_interest, ts_rate, fetched_at
            FROM funding_history
            WHERE ($1::uuid IS NULL OR venue_id = $1)
              AND ($2::text IS NULL OR symbol = $2)
            ORDER BY symbol, ts_rate DESC
            LIMIT $3 OFFSET $4
            "
        };

        let records = sqlx::query_as::<_, FundingHistoryRecord>(query)
            .bind(filter.venue_id)
            .bind(filter.symbol.as_deref())
            .bind(size)
            .bind(page * size)
            .fetch_all(&self.pool)
            .await?;

        Ok(records)
    }

    async fn get_by_filter(
        &self,
        filter: &RateFilter,
        page: i64,
        size: i64,
    ) -> Result<Vec<FundingHistoryRecord>> {
        let records = sqlx::query_as::<_, FundingHistoryRecord>(
            r"
            SELECT id, venue_id, symbol, name, interval_hours, rate,
                   open_interest, ts_rate, fetched_at
            FROM funding_history
            WHERE ($1::uuid IS NULL OR venue_id = $1)
              AND ($2::text IS NULL OR symbol = $2)
              AND ($3::int8 IS NULL OR ts_rate >= $3)
              AND ($4::int8 IS NULL OR ts_rate <= $4)
            ORDER BY ts_rate DESC
            LIMIT $5 OFFSET $6
            ",
        )
        .bind(filter.venue_id)
        .bind(filter.symbol.as_deref())
        .bind(filter.from)
        .bind(filter.to)
        .bind(size)
        .bind(page * size)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn unique_symbols_count(&self, filter: &RateFilter) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(DISTINCT symbol)
            FROM funding_history
            WHERE ($1::uuid IS NULL OR venue_id = $1)
            ",
        )
        .bind(filter.venue_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_by_filter(&self, filter: &RateFilter) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*)
            FROM funding_history
            WHERE ($1::uuid IS NULL OR venue_id = $1)
              AND ($2::text IS NULL OR symbol = $2)
              AND ($3::int8 IS NULL OR ts_rate >= $3)
              AND ($4::int8 IS NULL OR ts_rate <= $4)
            ",
        )
        .bind(filter.venue_id)
        .bind(filter.symbol.as_deref())
        .bind(filter.from)
        .bind(filter.to)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn bulk_insert(&self, rows: Vec<FundingHistoryRecord>) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }

        let mut written = 0u64;

        for chunk in rows.chunks(BULK_CHUNK) {
            let mut ids: Vec<Uuid> = Vec::with_capacity(chunk.len());
            let mut venue_ids: Vec<Uuid> = Vec::with_capacity(chunk.len());
            let mut symbols: Vec<String> = Vec::with_capacity(chunk.len());
            let mut names: Vec<String> = Vec::with_capacity(chunk.len());
            let mut intervals: Vec<i32> = Vec::with_capacity(chunk.len());
            let mut rates: Vec<Decimal> = Vec::with_capacity(chunk.len());
            let mut open_interests: Vec<Decimal> = Vec::with_capacity(chunk.len());
            let mut ts_rates: Vec<i64> = Vec::with_capacity(chunk.len());
            let mut fetched_ats: Vec<i64> = Vec::with_capacity(chunk.len());

            for row in chunk {
                ids.push(row.id);
                venue_ids.push(row.venue_id);
                symbols.push(row.symbol.clone());
                names.push(row.name.clone());
                intervals.push(row.interval_hours);
                rates.push(row.rate);
                open_interests.push(row.open_interest);
                ts_rates.push(row.ts_rate);
                fetched_ats.push(row.fetched_at);
            }

            let result = sqlx::query(
                r"
                INSERT INTO funding_history
                    (id, venue_id, symbol, name, interval_hours, rate,
                     open_interest, ts_rate, fetched_at)
                SELECT * FROM UNNEST(
                    $1::uuid[], $2::uuid[], $3::text[], $4::text[], $5::int4[],
                    $6::numeric[], $7::numeric[], $8::int8[], $9::int8[])
                ON CONFLICT (symbol, venue_id, ts_rate) DO NOTHING
                ",
            )
            .bind(&ids)
            .bind(&venue_ids)
            .bind(&symbols)
            .bind(&names)
            .bind(&intervals)
            .bind(&rates)
            .bind(&open_interests)
            .bind(&ts_rates)
            .bind(&fetched_ats)
            .execute(&self.pool)
            .await?;

            written += result.rows_affected();
        }

        Ok(written)
    }
}
