//! End-to-end pipeline scenarios against a scripted venue adapter and
//! in-memory stores.

use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use funding_core::{
    FundingObservation, FundingSymbolInfo, SymbolPair, VenueAdapter, VenueCode, VenueError,
    VenueResult,
};
use funding_data::{
    FundingHistoryRecord, HistoryStore, OnlineFundingRecord, OnlineStore, RateFilter, VenueRecord,
    VenueStore,
};
use funding_sync::{HistoryPipeline, OnlinePipeline, SyncError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const HOUR: i64 = 3_600_000;

// ---------------------------------------------------------------- adapter

struct MockAdapter {
    venue: VenueCode,
    symbols: Vec<SymbolPair>,
    /// Full ascending history per raw symbol name.
    history: HashMap<String, Vec<FundingObservation>>,
    /// Latest observation per raw symbol name.
    latest: HashMap<String, FundingObservation>,
    /// Transient failures to inject before `latest` succeeds.
    latest_failures: AtomicU32,
}

impl MockAdapter {
    fn new(venue: VenueCode) -> Self {
        Self {
            venue,
            symbols: Vec::new(),
            history: HashMap::new(),
            latest: HashMap::new(),
            latest_failures: AtomicU32::new(0),
        }
    }

    fn with_symbol(mut self, name: &str, interval_hours: Option<i32>) -> Self {
        self.symbols.push(SymbolPair {
            exchange: None,
            funding: Some(FundingSymbolInfo {
                symbol_name: name.to_string(),
                interval_hours,
                launch_time: None,
            }),
        });
        self
    }

    fn with_history(mut self, name: &str, observations: Vec<FundingObservation>) -> Self {
        if let Some(last) = observations.last() {
            self.latest.insert(name.to_string(), last.clone());
        }
        self.history.insert(name.to_string(), observations);
        self
    }

    fn failing_latest_attempts(self, failures: u32) -> Self {
        self.latest_failures.store(failures, Ordering::SeqCst);
        self
    }
}

#[async_trait]
impl VenueAdapter for MockAdapter {
    fn venue(&self) -> VenueCode {
        self.venue
    }

    fn max_parallelism(&self) -> usize {
        4
    }

    fn history_batch_size(&self) -> usize {
        10
    }

    async fn list_active_perpetuals(&self) -> VenueResult<Vec<SymbolPair>> {
        Ok(self.symbols.clone())
    }

    async fn list_history(
        &self,
        symbol: &str,
        start_time: Option<i64>,
    ) -> VenueResult<Vec<FundingObservation>> {
        let floor = start_time.unwrap_or(i64::MIN);
        Ok(self
            .history
            .get(symbol)
            .map(|observations| {
                observations
                    .iter()
                    .filter(|obs| obs.funding_time >= floor)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn latest(&self, symbol: &str) -> VenueResult<Option<FundingObservation>> {
        let remaining = self.latest_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.latest_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(VenueError::api(self.venue, "injected transient failure"));
        }
        Ok(self.latest.get(symbol).cloned())
    }
}

// ----------------------------------------------------------------- stores

struct InMemoryVenues {
    venues: Vec<VenueRecord>,
}

impl InMemoryVenues {
    fn seeded(code: VenueCode) -> (Arc<Self>, Uuid) {
        let id = Uuid::new_v4();
        let store = Arc::new(Self {
            venues: vec![VenueRecord {
                id,
                code: code.as_str().to_string(),
            }],
        });
        (store, id)
    }

    fn empty() -> Arc<Self> {
        Arc::new(Self { venues: Vec::new() })
    }
}

#[async_trait]
impl VenueStore for InMemoryVenues {
    async fn get_by_code(&self, code: VenueCode) -> Result<Option<VenueRecord>> {
        Ok(self
            .venues
            .iter()
            .find(|v| v.code == code.as_str())
            .cloned())
    }

    async fn list(&self) -> Result<Vec<VenueRecord>> {
        Ok(self.venues.clone())
    }

    async fn seed(&self) -> Result<()> {
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryHistory {
    rows: Mutex<Vec<FundingHistoryRecord>>,
    fail_inserts: bool,
}

impl InMemoryHistory {
    fn with_rows(rows: Vec<FundingHistoryRecord>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            fail_inserts: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(Vec::new()),
            fail_inserts: true,
        })
    }

    fn snapshot(&self) -> Vec<FundingHistoryRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl HistoryStore for InMemoryHistory {
    async fn latest_symbol_rates(&self, venue_id: Uuid) -> Result<Vec<FundingHistoryRecord>> {
        let rows = self.rows.lock().unwrap();
        let mut latest: HashMap<String, FundingHistoryRecord> = HashMap::new();
        for row in rows.iter().filter(|r| r.venue_id == venue_id) {
            match latest.get(&row.symbol) {
                Some(existing) if existing.ts_rate >= row.ts_rate => {}
                _ => {
                    latest.insert(row.symbol.clone(), row.clone());
                }
            }
        }
        Ok(latest.into_values().collect())
    }

    async fn latest_rates_page(
        &self,
        _filter: &RateFilter,
        _group_by_venue: bool,
        _page: i64,
        _size: i64,
    ) -> Result<Vec<FundingHistoryRecord>> {
        Ok(Vec::new())
    }

    async fn get_by_filter(
        &self,
        filter: &RateFilter,
        _page: i64,
        _size: i64,
    ) -> Result<Vec<FundingHistoryRecord>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| filter.venue_id.map_or(true, |v| r.venue_id == v))
            .filter(|r| filter.symbol.as_deref().map_or(true, |s| r.symbol == s))
            .cloned()
            .collect())
    }

    async fn unique_symbols_count(&self, _filter: &RateFilter) -> Result<i64> {
        let rows = self.rows.lock().unwrap();
        let symbols: std::collections::HashSet<_> = rows.iter().map(|r| &r.symbol).collect();
        Ok(symbols.len() as i64)
    }

    async fn count_by_filter(&self, _filter: &RateFilter) -> Result<i64> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn bulk_insert(&self, new_rows: Vec<FundingHistoryRecord>) -> Result<u64> {
        if self.fail_inserts {
            anyhow::bail!("injected bulk insert failure");
        }
        let mut rows = self.rows.lock().unwrap();
        let mut written = 0u64;
        for row in new_rows {
            let duplicate = rows.iter().any(|r| {
                r.symbol == row.symbol && r.venue_id == row.venue_id && r.ts_rate == row.ts_rate
            });
            if !duplicate {
                rows.push(row);
                written += 1;
            }
        }
        Ok(written)
    }
}

#[derive(Default)]
struct InMemoryOnline {
    rows: Mutex<Vec<OnlineFundingRecord>>,
    commits: AtomicU32,
}

impl InMemoryOnline {
    fn with_rows(rows: Vec<OnlineFundingRecord>) -> Arc<Self> {
        Arc::new(Self {
            rows: Mutex::new(rows),
            commits: AtomicU32::new(0),
        })
    }

    fn snapshot(&self) -> Vec<OnlineFundingRecord> {
        self.rows.lock().unwrap().clone()
    }
}

#[async_trait]
impl OnlineStore for InMemoryOnline {
    async fn get_by_venue(&self, venue_id: Uuid) -> Result<Vec<OnlineFundingRecord>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|r| r.venue_id == venue_id)
            .cloned()
            .collect())
    }

    async fn get_by_filter(
        &self,
        _filter: &RateFilter,
        _page: i64,
        _size: i64,
    ) -> Result<Vec<OnlineFundingRecord>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn latest_symbol_rates(&self, _page: i64, _size: i64) -> Result<Vec<OnlineFundingRecord>> {
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn unique_symbols_count(&self) -> Result<i64> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn count_by_filter(&self, _filter: &RateFilter) -> Result<i64> {
        Ok(self.rows.lock().unwrap().len() as i64)
    }

    async fn save_snapshot(
        &self,
        creates: Vec<OnlineFundingRecord>,
        updates: Vec<OnlineFundingRecord>,
    ) -> Result<()> {
        let mut rows = self.rows.lock().unwrap();
        for update in updates {
            let Some(slot) = rows.iter_mut().find(|r| r.id == update.id) else {
                anyhow::bail!("update for unknown id {}", update.id);
            };
            *slot = update;
        }
        for create in creates {
            let conflict = rows.iter().any(|r| {
                r.venue_id == create.venue_id
                    && (r.symbol == create.symbol || r.name == create.name)
            });
            if conflict {
                anyhow::bail!("unique constraint violated for {}", create.symbol);
            }
            rows.push(create);
        }
        self.commits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

// ---------------------------------------------------------------- helpers

fn observation(rate: Decimal, funding_time: i64, interval: Option<i32>) -> FundingObservation {
    FundingObservation {
        rate,
        funding_time,
        interval_hours: interval,
    }
}

fn history_row(
    venue_id: Uuid,
    symbol: &str,
    name: &str,
    interval_hours: i32,
    ts_rate: i64,
) -> FundingHistoryRecord {
    FundingHistoryRecord {
        id: Uuid::new_v4(),
        venue_id,
        symbol: symbol.to_string(),
        name: name.to_string(),
        interval_hours,
        rate: dec!(0.0001),
        open_interest: Decimal::ZERO,
        ts_rate,
        fetched_at: ts_rate,
    }
}

fn online_row(
    venue_id: Uuid,
    symbol: &str,
    name: &str,
    interval_hours: i32,
    ts_rate: i64,
) -> OnlineFundingRecord {
    OnlineFundingRecord {
        id: Uuid::new_v4(),
        venue_id,
        symbol: symbol.to_string(),
        name: name.to_string(),
        interval_hours,
        rate: dec!(0.0001),
        open_interest: Decimal::ZERO,
        ts_rate,
        fetched_at: ts_rate,
    }
}

// -------------------------------------------------------------- scenarios

#[tokio::test]
async fn cold_start_backfills_every_observation() {
    let t0 = Utc::now().timestamp_millis() - 20 * HOUR;
    let adapter = MockAdapter::new(VenueCode::Binance)
        .with_symbol("BTCUSDT", Some(8))
        .with_history(
            "BTCUSDT",
            vec![
                observation(dec!(0.0001), t0, None),
                observation(dec!(0.0002), t0 + 8 * HOUR, None),
                observation(dec!(-0.0001), t0 + 16 * HOUR, None),
            ],
        );

    let (venues, _) = InMemoryVenues::seeded(VenueCode::Binance);
    let history = InMemoryHistory::with_rows(Vec::new());
    let pipeline = HistoryPipeline::new(Arc::new(adapter), venues, history.clone());

    let job_start = Utc::now().timestamp_millis();
    let report = pipeline.run(&CancellationToken::new()).await.unwrap();
    let job_end = Utc::now().timestamp_millis();

    assert_eq!(report.inserted, 3);
    assert_eq!(report.failed, 0);

    let rows = history.snapshot();
    assert_eq!(rows.len(), 3);
    for row in &rows {
        assert_eq!(row.symbol, "BTCUSDT");
        assert_eq!(row.name, "BTCUSDT");
        assert_eq!(row.interval_hours, 8);
        assert_eq!(row.symbol, funding_core::normalize_symbol(&row.name));
        assert!(row.fetched_at >= job_start && row.fetched_at <= job_end);
    }
}

#[tokio::test]
async fn fresh_symbol_is_skipped_without_fetching() {
    let now = Utc::now().timestamp_millis();
    let (venues, venue_id) = InMemoryVenues::seeded(VenueCode::Bybit);

    // Last row half an hour old against a four-hour cadence.
    let history = InMemoryHistory::with_rows(vec![history_row(
        venue_id,
        "ETHUSDT",
        "ETHUSDT",
        4,
        now - HOUR / 2,
    )]);

    let adapter = MockAdapter::new(VenueCode::Bybit).with_symbol("ETHUSDT", Some(4));
    let pipeline = HistoryPipeline::new(Arc::new(adapter), venues, history.clone());

    let report = pipeline.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(report.inserted, 0);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(history.snapshot().len(), 1);
}

#[tokio::test]
async fn gap_fill_ingests_only_the_missed_observations() {
    let now = Utc::now().timestamp_millis();
    let last_ts = now - 20 * HOUR;
    let (venues, venue_id) = InMemoryVenues::seeded(VenueCode::Mexc);

    let history = InMemoryHistory::with_rows(vec![history_row(
        venue_id,
        "BTCUSDT",
        "BTC_USDT",
        8,
        last_ts,
    )]);

    // MEXC reports the interval on the observation, not in the catalog.
    let adapter = MockAdapter::new(VenueCode::Mexc)
        .with_symbol("BTC_USDT", None)
        .with_history(
            "BTC_USDT",
            vec![
                observation(dec!(0.0001), last_ts, Some(8)),
                observation(dec!(0.0002), last_ts + 8 * HOUR, Some(8)),
                observation(dec!(0.0003), last_ts + 16 * HOUR, Some(8)),
            ],
        );

    let pipeline = HistoryPipeline::new(Arc::new(adapter), venues, history.clone());
    let report = pipeline.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(report.inserted, 2);
    assert_eq!(report.failed, 0);

    let rows = history.snapshot();
    assert_eq!(rows.len(), 3);
    let new_rows: Vec<_> = rows.iter().filter(|r| r.ts_rate > last_ts).collect();
    assert_eq!(new_rows.len(), 2);
    for row in new_rows {
        assert_eq!(row.symbol, "BTCUSDT");
        assert_eq!(row.name, "BTC_USDT");
        assert_eq!(row.interval_hours, 8);
    }
}

#[tokio::test]
async fn incremental_right_after_cold_start_inserts_nothing() {
    let now = Utc::now().timestamp_millis();
    let adapter = Arc::new(
        MockAdapter::new(VenueCode::Hyperliquid)
            .with_symbol("BTC", Some(1))
            .with_history(
                "BTC",
                vec![
                    observation(dec!(0.0001), now - 90 * 60 * 1000, None),
                    observation(dec!(0.0002), now - 30 * 60 * 1000, None),
                ],
            ),
    );

    let (venues, _) = InMemoryVenues::seeded(VenueCode::Hyperliquid);
    let history = InMemoryHistory::with_rows(Vec::new());

    let pipeline = HistoryPipeline::new(adapter.clone(), venues.clone(), history.clone());
    let first = pipeline.run(&CancellationToken::new()).await.unwrap();
    assert_eq!(first.inserted, 2);

    // Fresh pipeline instance, same stores: the latest row is half an hour
    // old against an hourly cadence, so nothing is due.
    let pipeline = HistoryPipeline::new(adapter, venues, history.clone());
    let second = pipeline.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(second.inserted, 0);
    assert_eq!(second.skipped, 1);
    assert_eq!(history.snapshot().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn append_one_survives_two_transient_failures() {
    let now = Utc::now().timestamp_millis();
    let last_ts = now - 9 * HOUR;
    let (venues, venue_id) = InMemoryVenues::seeded(VenueCode::Bybit);

    let history = InMemoryHistory::with_rows(vec![history_row(
        venue_id,
        "ETHUSDT",
        "ETHUSDT",
        8,
        last_ts,
    )]);

    let adapter = MockAdapter::new(VenueCode::Bybit)
        .with_symbol("ETHUSDT", Some(8))
        .with_history(
            "ETHUSDT",
            vec![observation(dec!(0.00012), last_ts + 8 * HOUR, None)],
        )
        .failing_latest_attempts(2);

    let pipeline = HistoryPipeline::new(Arc::new(adapter), venues, history.clone());
    let report = pipeline.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(report.inserted, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(history.snapshot().len(), 2);
}

#[tokio::test(start_paused = true)]
async fn append_one_gives_up_after_three_failures() {
    let now = Utc::now().timestamp_millis();
    let last_ts = now - 9 * HOUR;
    let (venues, venue_id) = InMemoryVenues::seeded(VenueCode::Bybit);

    let history = InMemoryHistory::with_rows(vec![history_row(
        venue_id,
        "ETHUSDT",
        "ETHUSDT",
        8,
        last_ts,
    )]);

    let adapter = MockAdapter::new(VenueCode::Bybit)
        .with_symbol("ETHUSDT", Some(8))
        .failing_latest_attempts(3);

    let pipeline = HistoryPipeline::new(Arc::new(adapter), venues, history.clone());
    let report = pipeline.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(report.inserted, 0);
    assert_eq!(report.failed, 1);
    assert_eq!(history.snapshot().len(), 1);
}

#[tokio::test]
async fn bulk_insert_failure_aborts_the_job() {
    let t0 = Utc::now().timestamp_millis() - 10 * HOUR;
    let adapter = MockAdapter::new(VenueCode::Binance)
        .with_symbol("BTCUSDT", Some(8))
        .with_history("BTCUSDT", vec![observation(dec!(0.0001), t0, None)]);

    let (venues, _) = InMemoryVenues::seeded(VenueCode::Binance);
    let history = InMemoryHistory::failing();
    let pipeline = HistoryPipeline::new(Arc::new(adapter), venues, history);

    let result = pipeline.run(&CancellationToken::new()).await;
    assert!(matches!(result, Err(SyncError::Database(_))));
}

#[tokio::test]
async fn unseeded_venue_short_circuits_with_empty_report() {
    let adapter = MockAdapter::new(VenueCode::Binance).with_symbol("BTCUSDT", Some(8));
    let history = InMemoryHistory::with_rows(Vec::new());
    let pipeline = HistoryPipeline::new(Arc::new(adapter), InMemoryVenues::empty(), history);

    let report = pipeline.run(&CancellationToken::new()).await.unwrap();
    assert_eq!(report, funding_sync::SyncReport::default());
}

#[tokio::test]
async fn cancelled_history_job_surfaces_cancellation() {
    let adapter = MockAdapter::new(VenueCode::Binance).with_symbol("BTCUSDT", Some(8));
    let (venues, _) = InMemoryVenues::seeded(VenueCode::Binance);
    let history = InMemoryHistory::with_rows(Vec::new());
    let pipeline = HistoryPipeline::new(Arc::new(adapter), venues, history);

    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = pipeline.run(&cancel).await;
    assert!(matches!(result, Err(SyncError::Cancelled)));
}

#[tokio::test]
async fn online_snapshot_creates_and_updates_in_one_commit() {
    let now = Utc::now().timestamp_millis();
    let (venues, venue_id) = InMemoryVenues::seeded(VenueCode::Hyperliquid);

    let existing_btc = online_row(venue_id, "BTC", "BTC", 1, now - 2 * HOUR);
    let existing_eth = online_row(venue_id, "ETH", "ETH", 1, now - 2 * HOUR);
    let btc_id = existing_btc.id;
    let eth_id = existing_eth.id;

    let online = InMemoryOnline::with_rows(vec![existing_btc, existing_eth]);

    let adapter = MockAdapter::new(VenueCode::Hyperliquid)
        .with_symbol("BTC", Some(1))
        .with_symbol("ETH", Some(1))
        .with_symbol("SOL", Some(1))
        .with_history("BTC", vec![observation(dec!(0.0002), now - HOUR, None)])
        .with_history("ETH", vec![observation(dec!(-0.0001), now - HOUR, None)])
        .with_history("SOL", vec![observation(dec!(0.0003), now - HOUR, None)]);

    let pipeline = OnlinePipeline::new(Arc::new(adapter), venues, online.clone());
    let report = pipeline.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(report.created, 1);
    assert_eq!(report.updated, 2);
    assert_eq!(online.commits.load(Ordering::SeqCst), 1);

    let rows = online.snapshot();
    assert_eq!(rows.len(), 3);

    let btc = rows.iter().find(|r| r.symbol == "BTC").unwrap();
    assert_eq!(btc.id, btc_id);
    assert_eq!(btc.rate, dec!(0.0002));

    let eth = rows.iter().find(|r| r.symbol == "ETH").unwrap();
    assert_eq!(eth.id, eth_id);

    let sol = rows.iter().find(|r| r.symbol == "SOL").unwrap();
    assert_ne!(sol.id, btc_id);
    assert_ne!(sol.id, eth_id);
}

#[tokio::test]
async fn online_job_is_idempotent_for_ids_and_rates() {
    let now = Utc::now().timestamp_millis();
    let (venues, _) = InMemoryVenues::seeded(VenueCode::Bybit);
    let online = InMemoryOnline::with_rows(Vec::new());

    let adapter = Arc::new(
        MockAdapter::new(VenueCode::Bybit)
            .with_symbol("BTCUSDT", Some(8))
            .with_history("BTCUSDT", vec![observation(dec!(0.0001), now - HOUR, None)]),
    );

    let pipeline = OnlinePipeline::new(adapter.clone(), venues.clone(), online.clone());
    pipeline.run(&CancellationToken::new()).await.unwrap();
    let after_first = online.snapshot();

    let pipeline = OnlinePipeline::new(adapter, venues, online.clone());
    let second = pipeline.run(&CancellationToken::new()).await.unwrap();
    let after_second = online.snapshot();

    assert_eq!(second.created, 0);
    assert_eq!(second.updated, 1);
    assert_eq!(after_first.len(), 1);
    assert_eq!(after_second.len(), 1);
    assert_eq!(after_first[0].id, after_second[0].id);
    assert_eq!(after_first[0].rate, after_second[0].rate);
    assert_eq!(after_first[0].ts_rate, after_second[0].ts_rate);
}

#[tokio::test]
async fn online_drops_second_variant_of_the_same_symbol() {
    let now = Utc::now().timestamp_millis();
    let (venues, _) = InMemoryVenues::seeded(VenueCode::Mexc);
    let online = InMemoryOnline::with_rows(Vec::new());

    // Both raw names normalize to BTCUSDT.
    let adapter = MockAdapter::new(VenueCode::Mexc)
        .with_symbol("BTC_USDT", Some(8))
        .with_symbol("BTCUSDT", Some(8))
        .with_history("BTC_USDT", vec![observation(dec!(0.0001), now - HOUR, None)])
        .with_history("BTCUSDT", vec![observation(dec!(0.0002), now - HOUR, None)]);

    let pipeline = OnlinePipeline::new(Arc::new(adapter), venues, online.clone());
    let report = pipeline.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(report.created, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(online.snapshot().len(), 1);
}

#[tokio::test]
async fn online_rejects_zero_funding_time() {
    let (venues, _) = InMemoryVenues::seeded(VenueCode::Binance);
    let online = InMemoryOnline::with_rows(Vec::new());

    let adapter = MockAdapter::new(VenueCode::Binance)
        .with_symbol("BTCUSDT", Some(8))
        .with_history("BTCUSDT", vec![observation(dec!(0.0001), 0, None)]);

    let pipeline = OnlinePipeline::new(Arc::new(adapter), venues, online.clone());
    let report = pipeline.run(&CancellationToken::new()).await.unwrap();

    assert_eq!(report.created, 0);
    assert_eq!(report.failed, 1);
    assert!(online.snapshot().is_empty());
}
