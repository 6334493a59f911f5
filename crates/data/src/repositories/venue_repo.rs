//! Venue repository.

use anyhow::Result;
use async_trait::async_trait;
use funding_core::VenueCode;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::VenueRecord;

/// Storage operations on the venue table.
#[async_trait]
pub trait VenueStore: Send + Sync {
    async fn get_by_code(&self, code: VenueCode) -> Result<Option<VenueRecord>>;

    async fn list(&self) -> Result<Vec<VenueRecord>>;

    /// Inserts any venue codes that are not present yet. Existing rows are
    /// left untouched so their ids stay stable.
    async fn seed(&self) -> Result<()>;
}

/// Postgres-backed venue repository.
#[derive(Debug, Clone)]
pub struct PgVenueRepository {
    pool: PgPool,
}

impl PgVenueRepository {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VenueStore for PgVenueRepository {
    async fn get_by_code(&self, code: VenueCode) -> Result<Option<VenueRecord>> {
        let record = sqlx::query_as::<_, VenueRecord>(
            r"
            SELECT id, code
            FROM venues
            WHERE code = $1
            ",
        )
        .bind(code.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    async fn list(&self) -> Result<Vec<VenueRecord>> {
        let records = sqlx::query_as::<_, VenueRecord>(
            r"
            SELECT id, code
            FROM venues
            ORDER BY code
            ",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn seed(&self) -> Result<()> {
        for code in VenueCode::ALL {
            sqlx::query(
                r"
                INSERT INTO venues (id, code)
                VALUES ($1, $2)
                ON CONFLICT (code) DO NOTHING
                ",
            )
            .bind(Uuid::new_v4())
            .bind(code.as_str())
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }
}
