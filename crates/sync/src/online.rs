//! Online pipeline: one latest-funding row per (symbol, venue).
//!
//! The job loads the venue's existing rows keyed by raw name, snapshots the
//! latest observation for every online symbol, and commits the result in a
//! single transaction: updates (ids preserved) then creates. A venue or
//! storage failure yields an empty result; the next tick tries again.

use chrono::Utc;
use funding_core::{SymbolPair, VenueAdapter};
use funding_data::{OnlineFundingRecord, OnlineStore, VenueStore};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::SyncError;
use crate::kernel::retry;
use crate::report::SyncReport;
use crate::row::{build_online_row, build_online_update};

pub struct OnlinePipeline {
    adapter: Arc<dyn VenueAdapter>,
    venues: Arc<dyn VenueStore>,
    online: Arc<dyn OnlineStore>,
    semaphore: Arc<Semaphore>,
}

enum SnapshotOutcome {
    Create(OnlineFundingRecord),
    Update(OnlineFundingRecord),
    Skip,
    Failed,
    Cancelled,
}

impl OnlinePipeline {
    #[must_use]
    pub fn new(
        adapter: Arc<dyn VenueAdapter>,
        venues: Arc<dyn VenueStore>,
        online: Arc<dyn OnlineStore>,
    ) -> Self {
        let semaphore = Arc::new(Semaphore::new(adapter.online_parallelism().max(1)));
        Self {
            adapter,
            venues,
            online,
            semaphore,
        }
    }

    /// Runs one online snapshot for this pipeline's venue.
    ///
    /// # Errors
    /// Only cancellation escapes; venue and storage failures are logged and
    /// collapse to an empty report.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<SyncReport, SyncError> {
        match self.run_inner(cancel).await {
            Ok(report) => Ok(report),
            Err(SyncError::Cancelled) => Err(SyncError::Cancelled),
            Err(e) => {
                tracing::error!("{}: online sync failed: {}", self.adapter.venue(), e);
                Ok(SyncReport::default())
            }
        }
    }

    async fn run_inner(&self, cancel: &CancellationToken) -> Result<SyncReport, SyncError> {
        let venue_code = self.adapter.venue();
        let fetched_at = Utc::now().timestamp_millis();

        let Some(venue) = self
            .venues
            .get_by_code(venue_code)
            .await
            .map_err(SyncError::Database)?
        else {
            tracing::warn!("{}: venue not seeded, skipping online sync", venue_code);
            return Ok(SyncReport::default());
        };

        let mut existing_by_name: HashMap<String, OnlineFundingRecord> = self
            .online
            .get_by_venue(venue.id)
            .await
            .map_err(SyncError::Database)?
            .into_iter()
            .map(|row| (row.name.clone(), row))
            .collect();

        let symbols = retry(&format!("{venue_code} catalog"), cancel, || {
            self.adapter.list_online_symbols()
        })
        .await?;

        tracing::info!("{}: online sync of {} symbols", venue_code, symbols.len());

        // Symbols of rows this run does not touch still occupy their
        // (symbol, venue) slot; creates must not collide with them.
        let mut taken_symbols: HashSet<String> = HashSet::new();

        let mut handles = Vec::with_capacity(symbols.len());
        for pair in symbols {
            let existing = pair
                .name()
                .and_then(|name| existing_by_name.remove(name));
            handles.push(tokio::spawn(snapshot_symbol(
                self.adapter.clone(),
                self.semaphore.clone(),
                pair,
                existing,
                venue.id,
                fetched_at,
                cancel.clone(),
            )));
        }

        taken_symbols.extend(existing_by_name.into_values().map(|row| row.symbol));

        let mut report = SyncReport::default();
        let mut creates = Vec::new();
        let mut updates = Vec::new();
        let mut cancelled = false;

        for handle in handles {
            match handle.await {
                Ok(SnapshotOutcome::Create(row)) => creates.push(row),
                Ok(SnapshotOutcome::Update(row)) => {
                    taken_symbols.insert(row.symbol.clone());
                    updates.push(row);
                }
                Ok(SnapshotOutcome::Skip) => report.skipped += 1,
                Ok(SnapshotOutcome::Failed) => report.failed += 1,
                Ok(SnapshotOutcome::Cancelled) => cancelled = true,
                Err(e) => {
                    tracing::error!("{}: symbol task panicked: {}", venue_code, e);
                    report.failed += 1;
                }
            }
        }
        if cancelled {
            return Err(SyncError::Cancelled);
        }

        // Two raw names can normalize to the same symbol; the first variant
        // wins, later ones are dropped before they can violate the
        // (symbol, venue) uniqueness.
        creates.retain(|row| {
            if taken_symbols.insert(row.symbol.clone()) {
                true
            } else {
                tracing::warn!(
                    "{}: dropping duplicate symbol variant {} ({})",
                    venue_code,
                    row.name,
                    row.symbol
                );
                report.skipped += 1;
                false
            }
        });

        report.created = creates.len();
        report.updated = updates.len();

        self.online
            .save_snapshot(creates, updates)
            .await
            .map_err(SyncError::Database)?;

        tracing::info!(
            "{}: online sync done, {} created, {} updated, {} skipped, {} failed",
            venue_code,
            report.created,
            report.updated,
            report.skipped,
            report.failed
        );
        Ok(report)
    }
}

async fn snapshot_symbol(
    adapter: Arc<dyn VenueAdapter>,
    semaphore: Arc<Semaphore>,
    pair: SymbolPair,
    existing: Option<OnlineFundingRecord>,
    venue_id: Uuid,
    fetched_at: i64,
    cancel: CancellationToken,
) -> SnapshotOutcome {
    let Ok(_permit) = semaphore.acquire_owned().await else {
        return SnapshotOutcome::Cancelled;
    };
    if cancel.is_cancelled() {
        return SnapshotOutcome::Cancelled;
    }

    let Some(info) = pair.funding.clone() else {
        tracing::warn!("catalog entry without funding info: {:?}", pair.name());
        return SnapshotOutcome::Failed;
    };

    let observation = match retry(&info.symbol_name, &cancel, || {
        adapter.latest(&info.symbol_name)
    })
    .await
    {
        Ok(Some(obs)) => obs,
        Ok(None) => {
            tracing::warn!("{}: expected a funding observation, got none", info.symbol_name);
            return SnapshotOutcome::Skip;
        }
        Err(SyncError::Cancelled) => return SnapshotOutcome::Cancelled,
        Err(e) => {
            tracing::warn!("{}: online fetch failed: {}", info.symbol_name, e);
            return SnapshotOutcome::Failed;
        }
    };

    let built = match existing {
        Some(prev) => {
            build_online_update(&prev, &info, &observation, fetched_at).map(SnapshotOutcome::Update)
        }
        None => {
            build_online_row(venue_id, &info, &observation, fetched_at).map(SnapshotOutcome::Create)
        }
    };

    match built {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::warn!("{}: dropping snapshot: {}", info.symbol_name, e);
            SnapshotOutcome::Failed
        }
    }
}
