//! Online funding repository.
//!
//! Holds the latest observation per `(symbol, venue)`. Snapshot commits are
//! transactional: all updates, then all creates, one commit.

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::filter::RateFilter;
use crate::models::OnlineFundingRecord;

/// Storage operations on the online funding table.
#[async_trait]
pub trait OnlineStore: Send + Sync {
    async fn get_by_venue(&self, venue_id: Uuid) -> Result<Vec<OnlineFundingRecord>>;

    async fn get_by_filter(
        &self,
        filter: &RateFilter,
        page: i64,
        size: i64,
    ) -> Result<Vec<OnlineFundingRecord>>;

    /// Latest rate per symbol across venues, paged, newest first.
    async fn latest_symbol_rates(&self, page: i64, size: i64) -> Result<Vec<OnlineFundingRecord>>;

    async fn unique_symbols_count(&self) -> Result<i64>;

    async fn count_by_filter(&self, filter: &RateFilter) -> Result<i64>;

    /// Applies one online job's result atomically: updates first, creates
    /// second, a single commit. Updates address rows by `id` and leave the
    /// `id` unchanged.
    async fn save_snapshot(
        &self,
        creates: Vec<OnlineFundingRecord>,
        updates: Vec<OnlineFundingRecord>,
    ) -> Result<()>;
}

/// Postgres-backed online repository.
#[derive(Debug, Clone)]
pub struct PgOnlineRepository {
    pool: PgPool,
}

impl PgOnlineRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OnlineStore for PgOnlineRepository {
    async fn get_by_venue(&self, venue_id: Uuid) -> Result<Vec<OnlineFundingRecord>> {
        let records = sqlx::query_as::<_, OnlineFundingRecord>(
            r"
            SELECT id, venue_id, symbol, name, interval_hours, rate,
                   open_interest, ts_rate, fetched_at
            FROM funding_online
            WHERE venue_id = $1
            ",
        )
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn get_by_filter(
        &self,
        filter: &RateFilter,
        page: i64,
        size: i64,
    ) -> Result<Vec<OnlineFundingRecord>> {
        let records = sqlx::query_as::<_, OnlineFundingRecord>(
            r"
            SELECT id, venue_id, symbol, name, interval_hours, rate,
                   open_interest, ts_rate, fetched_at
            FROM funding_online
            WHERE ($1::uuid IS NULL OR venue_id = $1)
              AND ($2::text IS NULL OR symbol = $2)
            ORDER BY ts_rate DESC
            LIMIT $3 OFFSET $4
            ",
        )
        .bind(filter.venue_id)
        .bind(filter.symbol.as_deref())
        .bind(size)
        .bind(page * size)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn latest_symbol_rates(&self, page: i64, size: i64) -> Result<Vec<OnlineFundingRecord>> {
        let records = sqlx::query_as::<_, OnlineFundingRecord>(
            r"
            SELECT DISTINCT ON (symbol)
                id, venue_id, symbol, name, interval_hours, rate,
                open_interest, ts_rate, fetched_at
            FROM funding_online
            ORDER BY symbol, ts_rate DESC
            LIMIT $1 OFFSET $2
            ",
        )
        .bind(size)
        .bind(page * size)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn unique_symbols_count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(DISTINCT symbol)
            FROM funding_online
            ",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn count_by_filter(&self, filter: &RateFilter) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as(
            r"
            SELECT COUNT(*)
            FROM funding_online
            WHERE ($1::uuid IS NULL OR venue_id = $1)
              AND ($2::text IS NULL OR symbol = $2)
            ",
        )
        .bind(filter.venue_id)
        .bind(filter.symbol.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    async fn save_snapshot(
        &self,
        creates: Vec<OnlineFundingRecord>,
        updates: Vec<OnlineFundingRecord>,
    ) -> Result<()> {
        if creates.is_empty() && updates.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await?;

        for record in &updates {
            sqlx::query(
                r"
                UPDATE funding_online
                SET name = $2, interval_hours = $3, rate = $4,
                    open_interest = $5, ts_rate = $6, fetched_at = $7
                WHERE id = $1
                ",
            )
            .bind(record.id)
            .bind(&record.name)
            .bind(record.interval_hours)
            .bind(record.rate)
            .bind(record.open_interest)
            .bind(record.ts_rate)
            .bind(record.fetched_at)
            .execute(&mut *tx)
            .await?;
        }

        for record in &creates {
            sqlx::query(
                r"
                INSERT INTO funding_online
                    (id, venue_id, symbol, name, interval_hours, rate,
                     open_interest, ts_rate, fetched_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
                ",
            )
            .bind(record.id)
            .bind(record.venue_id)
            .bind(&record.symbol)
            .bind(&record.name)
            .bind(record.interval_hours)
            .bind(record.rate)
            .bind(record.open_interest)
            .bind(record.ts_rate)
            .bind(record.fetched_at)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }
}
