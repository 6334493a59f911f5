use crate::error::VenueError;
use crate::types::{FundingObservation, SymbolPair};
use crate::venue::VenueCode;
use async_trait::async_trait;

pub type VenueResult<T> = Result<T, VenueError>;

/// Capability set a venue must provide for the sync pipelines to drive it.
///
/// One implementation per venue. Implementations are pure views over the
/// venue's REST surface: they paginate, convert units, and sort, but they do
/// not retry and they do not touch storage.
#[async_trait]
pub trait VenueAdapter: Send + Sync {
    fn venue(&self) -> VenueCode;

    /// Upper bound on concurrent per-symbol requests during history jobs.
    fn max_parallelism(&self) -> usize;

    /// Upper bound for online jobs. Most venues share the history bound.
    fn online_parallelism(&self) -> usize {
        self.max_parallelism()
    }

    /// Number of symbols the history pipeline processes between bulk inserts.
    fn history_batch_size(&self) -> usize;

    /// Active linear perpetual symbols with whatever funding-interval
    /// metadata the venue exposes at catalog level.
    async fn list_active_perpetuals(&self) -> VenueResult<Vec<SymbolPair>>;

    /// Symbol set for the online snapshot. Venues that distinguish a
    /// trading-only status override this.
    async fn list_online_symbols(&self) -> VenueResult<Vec<SymbolPair>> {
        self.list_active_perpetuals().await
    }

    /// Historical funding observations for `symbol`, ascending by funding
    /// time, restricted to `funding_time >= start_time` when a start is
    /// given. Pagination direction and inter-page delays are venue-specific
    /// and handled inside the adapter.
    async fn list_history(
        &self,
        symbol: &str,
        start_time: Option<i64>,
    ) -> VenueResult<Vec<FundingObservation>>;

    /// Most recent funding observation for `symbol`, if any.
    async fn latest(&self, symbol: &str) -> VenueResult<Option<FundingObservation>>;

    /// Inter-batch pacing for the history pipeline. Venues that need coarse
    /// rate-limit relief override this with a delay derived from the row
    /// count of the just-finished batch.
    async fn pacing_delay(&self, batch_rows: usize) {
        let _ = batch_rows;
    }
}
