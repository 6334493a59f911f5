//! Database repositories for the funding-rate store.
//!
//! Each repository provides typed access to a specific table. The store
//! traits are the seam the sync pipelines program against; the `Pg*` types
//! are the Postgres implementations.

pub mod history_repo;
pub mod online_repo;
pub mod venue_repo;

pub use history_repo::{HistoryStore, PgHistoryRepository};
pub use online_repo::{OnlineStore, PgOnlineRepository};
pub use venue_repo::{PgVenueRepository, VenueStore};

use sqlx::PgPool;
use std::sync::Arc;

/// All repositories over a single shared pool.
#[derive(Clone)]
pub struct Repositories {
    pub venues: Arc<PgVenueRepository>,
    pub history: Arc<PgHistoryRepository>,
    pub online: Arc<PgOnlineRepository>,
}

impl Repositories {
    /// Creates a new set of repositories from a database pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            venues: Arc::new(PgVenueRepository::new(pool.clone())),
            history: Arc::new(PgHistoryRepository::new(pool.clone())),
            online: Arc::new(PgOnlineRepository::new(pool)),
        }
    }
}
