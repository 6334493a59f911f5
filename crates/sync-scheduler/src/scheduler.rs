//! Cron host for the per-venue sync jobs.
//!
//! Eight jobs in total: one history and one online job per venue. Each job
//! carries its own try-lock guard so a tick firing while the previous run is
//! still in flight is suppressed rather than stacked.

use anyhow::{Context, Result};
use funding_core::{SchedulerConfig, VenueAdapter, VenueCode};
use funding_data::Repositories;
use funding_sync::{HistoryPipeline, OnlinePipeline, SyncReport};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

/// Which of the two per-venue pipelines to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineKind {
    History,
    Online,
}

pub struct SyncScheduler {
    config: SchedulerConfig,
    repos: Repositories,
    adapters: Vec<Arc<dyn VenueAdapter>>,
}

impl SyncScheduler {
    #[must_use]
    pub fn new(
        config: SchedulerConfig,
        repos: Repositories,
        adapters: Vec<Arc<dyn VenueAdapter>>,
    ) -> Self {
        Self {
            config,
            repos,
            adapters,
        }
    }

    /// Starts all jobs and parks until `cancel` fires.
    ///
    /// # Errors
    /// Returns an error if the scheduler fails to start or a cron
    /// expression does not parse.
    pub async fn start(self, cancel: CancellationToken) -> Result<()> {
        if !self.config.enabled {
            info!("Sync scheduler is disabled");
            return Ok(());
        }

        let scheduler = JobScheduler::new().await?;

        for adapter in &self.adapters {
            let venue = adapter.venue();

            let history = Arc::new(HistoryPipeline::new(
                adapter.clone(),
                self.repos.venues.clone(),
                self.repos.history.clone(),
            ));
            scheduler
                .add(history_job(
                    &self.config.history_cron,
                    venue,
                    history,
                    cancel.clone(),
                )?)
                .await?;

            let online = Arc::new(OnlinePipeline::new(
                adapter.clone(),
                self.repos.venues.clone(),
                self.repos.online.clone(),
            ));
            scheduler
                .add(online_job(
                    &self.config.online_cron,
                    venue,
                    online,
                    cancel.clone(),
                )?)
                .await?;
        }

        scheduler.start().await?;
        info!(
            "Sync scheduler started: {} jobs (history '{}', online '{}')",
            self.adapters.len() * 2,
            self.config.history_cron,
            self.config.online_cron
        );

        cancel.cancelled().await;
        info!("Sync scheduler shutting down");
        Ok(())
    }

    /// Runs one pipeline once for one venue (manual execution).
    ///
    /// # Errors
    /// Returns an error if no adapter is registered for the venue or the
    /// run itself fails.
    pub async fn run_once(&self, venue: VenueCode, kind: PipelineKind) -> Result<SyncReport> {
        let adapter = self
            .adapters
            .iter()
            .find(|a| a.venue() == venue)
            .cloned()
            .with_context(|| format!("no adapter registered for {venue}"))?;

        let cancel = CancellationToken::new();
        let report = match kind {
            PipelineKind::History => {
                HistoryPipeline::new(
                    adapter,
                    self.repos.venues.clone(),
                    self.repos.history.clone(),
                )
                .run(&cancel)
                .await?
            }
            PipelineKind::Online => {
                OnlinePipeline::new(adapter, self.repos.venues.clone(), self.repos.online.clone())
                    .run(&cancel)
                    .await?
            }
        };

        Ok(report)
    }
}

fn history_job(
    cron: &str,
    venue: VenueCode,
    pipeline: Arc<HistoryPipeline>,
    cancel: CancellationToken,
) -> Result<Job> {
    let guard = Arc::new(Mutex::new(()));

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let pipeline = pipeline.clone();
        let guard = guard.clone();
        let cancel = cancel.clone();
        Box::pin(async move {
            let Ok(_running) = guard.try_lock() else {
                debug!("{}: history job still running, tick suppressed", venue);
                return;
            };
            match pipeline.run(&cancel).await {
                Ok(report) if report.inserted > 0 => {
                    info!("{}: history job inserted {} rows", venue, report.inserted);
                }
                Ok(_) => {}
                Err(e) => error!("{}: history job failed: {}", venue, e),
            }
        })
    })?;

    Ok(job)
}

fn online_job(
    cron: &str,
    venue: VenueCode,
    pipeline: Arc<OnlinePipeline>,
    cancel: CancellationToken,
) -> Result<Job> {
    let guard = Arc::new(Mutex::new(()));

    let job = Job::new_async(cron, move |_uuid, _lock| {
        let pipeline = pipeline.clone();
        let guard = guard.clone();
        let cancel = cancel.clone();
        Box::pin(async move {
            let Ok(_running) = guard.try_lock() else {
                debug!("{}: online job still running, tick suppressed", venue);
                return;
            };
            match pipeline.run(&cancel).await {
                Ok(report) => {
                    debug!(
                        "{}: online job {} created, {} updated",
                        venue, report.created, report.updated
                    );
                }
                Err(e) => error!("{}: online job failed: {}", venue, e),
            }
        })
    })?;

    Ok(job)
}
