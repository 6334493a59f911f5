use anyhow::Result;
use funding_core::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Opens the shared connection pool.
///
/// The pool is the throughput ceiling for every pipeline, so it is created
/// once at startup and cloned into each repository.
///
/// # Errors
/// Returns an error if the database connection cannot be established.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await?;
    Ok(pool)
}
