//! History pipeline: cold-start backfill and incremental catch-up.
//!
//! One pipeline serves both modes. Symbols with no local rows get a full
//! backfill from their launch (or listing) time; symbols with known history
//! get exactly one of skip / append-one / gap-fill, decided from the last
//! row's funding time and cadence. A venue with no rows at all is simply the
//! all-symbols-new case.

use chrono::Utc;
use funding_core::{FundingSymbolInfo, SymbolPair, VenueAdapter};
use funding_data::{FundingHistoryRecord, HistoryStore, VenueStore};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::error::SyncError;
use crate::kernel::retry;
use crate::plan::{decide, SyncAction};
use crate::report::SyncReport;
use crate::row::build_history_row;

pub struct HistoryPipeline {
    adapter: Arc<dyn VenueAdapter>,
    venues: Arc<dyn VenueStore>,
    history: Arc<dyn HistoryStore>,
    semaphore: Arc<Semaphore>,
}

enum SymbolOutcome {
    Rows(Vec<FundingHistoryRecord>),
    Skip,
    Failed,
    Cancelled,
}

impl HistoryPipeline {
    #[must_use]
    pub fn new(
        adapter: Arc<dyn VenueAdapter>,
        venues: Arc<dyn VenueStore>,
        history: Arc<dyn HistoryStore>,
    ) -> Self {
        let semaphore = Arc::new(Semaphore::new(adapter.max_parallelism().max(1)));
        Self {
            adapter,
            venues,
            history,
            semaphore,
        }
    }

    /// Runs one history sync for this pipeline's venue.
    ///
    /// Per-symbol failures are logged and counted, never fatal; a storage
    /// failure or a failed catalog fetch aborts the job so the scheduler
    /// retries it on the next tick.
    ///
    /// # Errors
    /// Returns a database error, a venue error from the catalog call, or
    /// `Cancelled`.
    pub async fn run(&self, cancel: &CancellationToken) -> Result<SyncReport, SyncError> {
        let venue_code = self.adapter.venue();
        let fetched_at = Utc::now().timestamp_millis();

        let Some(venue) = self
            .venues
            .get_by_code(venue_code)
            .await
            .map_err(SyncError::Database)?
        else {
            tracing::warn!("{}: venue not seeded, skipping history sync", venue_code);
            return Ok(SyncReport::default());
        };

        let known = self
            .history
            .latest_symbol_rates(venue.id)
            .await
            .map_err(SyncError::Database)?;
        let cold_start = known.is_empty();
        let mut last_by_name: HashMap<String, FundingHistoryRecord> = known
            .into_iter()
            .map(|row| (row.name.to_lowercase(), row))
            .collect();

        let symbols = retry(&format!("{venue_code} catalog"), cancel, || {
            self.adapter.list_active_perpetuals()
        })
        .await?;

        tracing::info!(
            "{}: history sync of {} symbols ({})",
            venue_code,
            symbols.len(),
            if cold_start { "cold start" } else { "incremental" }
        );

        let mut report = SyncReport::default();
        let batch_size = self.adapter.history_batch_size().max(1);

        for batch in symbols.chunks(batch_size) {
            if cancel.is_cancelled() {
                return Err(SyncError::Cancelled);
            }

            let mut handles = Vec::with_capacity(batch.len());
            for pair in batch {
                let last = pair
                    .name()
                    .and_then(|name| last_by_name.remove(&name.to_lowercase()));
                handles.push(tokio::spawn(sync_symbol(
                    self.adapter.clone(),
                    self.semaphore.clone(),
                    pair.clone(),
                    last,
                    venue.id,
                    fetched_at,
                    cancel.clone(),
                )));
            }

            let mut rows: Vec<FundingHistoryRecord> = Vec::new();
            let mut cancelled = false;
            for handle in handles {
                match handle.await {
                    Ok(SymbolOutcome::Rows(mut symbol_rows)) => rows.append(&mut symbol_rows),
                    Ok(SymbolOutcome::Skip) => report.skipped += 1,
                    Ok(SymbolOutcome::Failed) => report.failed += 1,
                    Ok(SymbolOutcome::Cancelled) => cancelled = true,
                    Err(e) => {
                        tracing::error!("{}: symbol task panicked: {}", venue_code, e);
                        report.failed += 1;
                    }
                }
            }
            if cancelled {
                return Err(SyncError::Cancelled);
            }

            dedup_batch(&mut rows);
            let batch_rows = rows.len();
            report.inserted += self
                .history
                .bulk_insert(rows)
                .await
                .map_err(SyncError::Database)?;

            self.adapter.pacing_delay(batch_rows).await;
        }

        tracing::info!(
            "{}: history sync done, {} inserted, {} skipped, {} failed",
            venue_code,
            report.inserted,
            report.skipped,
            report.failed
        );
        Ok(report)
    }
}

async fn sync_symbol(
    adapter: Arc<dyn VenueAdapter>,
    semaphore: Arc<Semaphore>,
    pair: SymbolPair,
    last: Option<FundingHistoryRecord>,
    venue_id: Uuid,
    fetched_at: i64,
    cancel: CancellationToken,
) -> SymbolOutcome {
    let Ok(_permit) = semaphore.acquire_owned().await else {
        return SymbolOutcome::Cancelled;
    };
    if cancel.is_cancelled() {
        return SymbolOutcome::Cancelled;
    }

    let Some(info) = pair.funding.clone() else {
        tracing::warn!("catalog entry without funding info: {:?}", pair.name());
        return SymbolOutcome::Failed;
    };

    let result = match last {
        None => backfill_symbol(&*adapter, &pair, &info, venue_id, fetched_at, &cancel).await,
        Some(last) => {
            catch_up_symbol(&*adapter, &info, &last, venue_id, fetched_at, &cancel).await
        }
    };

    match result {
        Ok(outcome) => outcome,
        Err(SyncError::Cancelled) => SymbolOutcome::Cancelled,
        Err(e) => {
            tracing::warn!("{}: history sync failed: {}", info.symbol_name, e);
            SymbolOutcome::Failed
        }
    }
}

/// Full backfill for a symbol with no local rows, from its launch time
/// (falling back to the listing date, then the adapter's own default).
async fn backfill_symbol(
    adapter: &dyn VenueAdapter,
    pair: &SymbolPair,
    info: &FundingSymbolInfo,
    venue_id: Uuid,
    fetched_at: i64,
    cancel: &CancellationToken,
) -> Result<SymbolOutcome, SyncError> {
    let start = pair.backfill_start();
    let observations = retry(&info.symbol_name, cancel, || {
        adapter.list_history(&info.symbol_name, start)
    })
    .await?;

    if observations.is_empty() {
        tracing::warn!("{}: no funding history returned", info.symbol_name);
        return Ok(SymbolOutcome::Skip);
    }

    Ok(SymbolOutcome::Rows(build_rows(
        venue_id,
        info,
        &observations,
        fetched_at,
    )))
}

/// One of skip / gap-fill / append-one for a symbol with known history.
async fn catch_up_symbol(
    adapter: &dyn VenueAdapter,
    info: &FundingSymbolInfo,
    last: &FundingHistoryRecord,
    venue_id: Uuid,
    fetched_at: i64,
    cancel: &CancellationToken,
) -> Result<SymbolOutcome, SyncError> {
    match decide(last.ts_rate, last.interval_ms(), fetched_at) {
        SyncAction::SkipFresh => Ok(SymbolOutcome::Skip),
        SyncAction::FillGap => {
            let observations = retry(&info.symbol_name, cancel, || {
                adapter.list_history(&info.symbol_name, Some(last.ts_rate + 1))
            })
            .await?;

            if observations.is_empty() {
                return Ok(SymbolOutcome::Skip);
            }
            Ok(SymbolOutcome::Rows(build_rows(
                venue_id,
                info,
                &observations,
                fetched_at,
            )))
        }
        SyncAction::AppendOne => {
            let observation = retry(&info.symbol_name, cancel, || {
                adapter.latest(&info.symbol_name)
            })
            .await?;

            match observation {
                Some(obs) if obs.funding_time > last.ts_rate => Ok(SymbolOutcome::Rows(vec![
                    build_history_row(venue_id, info, &obs, fetched_at)?,
                ])),
                Some(_) => Ok(SymbolOutcome::Skip),
                None => {
                    tracing::warn!("{}: expected a funding observation, got none", info.symbol_name);
                    Ok(SymbolOutcome::Skip)
                }
            }
        }
    }
}

fn build_rows(
    venue_id: Uuid,
    info: &FundingSymbolInfo,
    observations: &[funding_core::FundingObservation],
    fetched_at: i64,
) -> Vec<FundingHistoryRecord> {
    let mut rows = Vec::with_capacity(observations.len());
    for obs in observations {
        match build_history_row(venue_id, info, obs, fetched_at) {
            Ok(row) => rows.push(row),
            Err(e) => {
                tracing::warn!("{}: dropping row: {}", info.symbol_name, e);
            }
        }
    }
    rows
}

/// Drops in-batch duplicates of `(symbol, ts_rate)`; the venue is fixed
/// within a batch, so the pair identifies a funding event.
fn dedup_batch(rows: &mut Vec<FundingHistoryRecord>) {
    let mut seen: HashSet<(String, i64)> = HashSet::with_capacity(rows.len());
    rows.retain(|row| seen.insert((row.symbol.clone(), row.ts_rate)));
}
