//! Pipeline orchestration against an in-memory store and a stub provider.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::Mutex;

use stockdesk_core::data::{CompanyEntry, DataError, FetchPeriod, MarketDataProvider, RawBar};
use stockdesk_core::metrics::derive_raw;
use stockdesk_core::pipeline::FixedClock;
use stockdesk_core::{CacheStore, Pipeline, PipelineError, SeriesSource};

// ── Helpers ──────────────────────────────────────────────────────────

const SYMBOL: &str = "TCS.NS";

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

fn raw_bars(n: usize, base: f64) -> Vec<RawBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..n)
        .map(|i| {
            let close = base + (i as f64 * 0.4).sin() * 3.0;
            RawBar {
                date: start + chrono::Duration::days(i as i64),
                open: Some(close - 0.5),
                high: Some(close + 1.0),
                low: Some(close - 1.5),
                close: Some(close),
                volume: Some(10_000 + i as u64),
            }
        })
        .collect()
}

#[derive(Clone, Default)]
struct StubState {
    bars: Arc<Mutex<Vec<RawBar>>>,
    calls: Arc<AtomicUsize>,
    fail: Arc<Mutex<bool>>,
}

impl StubState {
    fn set_bars(&self, bars: Vec<RawBar>) {
        *self.bars.lock() = bars;
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

struct StubProvider {
    state: StubState,
}

impl MarketDataProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn fetch_bars(&self, _symbol: &str, _period: FetchPeriod) -> Result<Vec<RawBar>, DataError> {
        self.state.calls.fetch_add(1, Ordering::SeqCst);
        if *self.state.fail.lock() {
            return Err(DataError::Transient("connection reset".into()));
        }
        Ok(self.state.bars.lock().clone())
    }
}

fn pipeline_with(bars: Vec<RawBar>) -> (Pipeline, StubState, Arc<CacheStore>) {
    let state = StubState::default();
    state.set_bars(bars);
    let store = Arc::new(CacheStore::open_in_memory().unwrap());
    let pipeline = Pipeline::new(
        Arc::clone(&store),
        Box::new(StubProvider {
            state: state.clone(),
        }),
        FetchPeriod::OneYear,
    )
    .with_clock(FixedClock(today()));
    (pipeline, state, store)
}

// ── get_series ───────────────────────────────────────────────────────

#[test]
fn cache_miss_fetches_derives_and_persists() {
    let (pipeline, state, store) = pipeline_with(raw_bars(40, 100.0));

    let result = pipeline.get_series(SYMBOL).unwrap();
    assert_eq!(result.source, SeriesSource::Fetched);
    assert_eq!(result.rows.len(), 40);
    assert_eq!(result.summary.total_days, 40);
    assert_eq!(state.calls(), 1);
    assert_eq!(store.get_all_rows(SYMBOL).unwrap(), result.rows);
}

#[test]
fn populated_cache_is_read_only_and_stable() {
    let (pipeline, state, _store) = pipeline_with(raw_bars(40, 100.0));

    let first = pipeline.get_series(SYMBOL).unwrap();
    // Changing the upstream must not affect cached reads.
    state.set_bars(raw_bars(10, 500.0));
    let second = pipeline.get_series(SYMBOL).unwrap();
    let third = pipeline.get_series(SYMBOL).unwrap();

    assert_eq!(state.calls(), 1);
    assert_eq!(second.source, SeriesSource::Cache);
    assert_eq!(first.rows, second.rows);
    assert_eq!(second, third);
}

#[test]
fn empty_cache_and_empty_fetch_is_no_data_without_writes() {
    let (pipeline, _state, store) = pipeline_with(Vec::new());

    let err = pipeline.get_series("NOPE.NS").unwrap_err();
    assert!(matches!(err, PipelineError::NoData { ref symbol } if symbol == "NOPE.NS"));
    assert_eq!(err.to_string(), "No data found for symbol: NOPE.NS");
    assert_eq!(store.row_count("NOPE.NS").unwrap(), 0);
}

#[test]
fn fetch_failure_surfaces_as_no_data() {
    let (pipeline, state, store) = pipeline_with(raw_bars(5, 100.0));
    *state.fail.lock() = true;

    let err = pipeline.get_series(SYMBOL).unwrap_err();
    assert!(err.is_no_data());
    assert_eq!(store.row_count(SYMBOL).unwrap(), 0);
}

#[test]
fn all_invalid_rows_is_no_data() {
    let mut bars = raw_bars(3, 100.0);
    for bar in &mut bars {
        bar.close = None;
    }
    let (pipeline, _state, _store) = pipeline_with(bars);
    assert!(pipeline.get_series(SYMBOL).unwrap_err().is_no_data());
}

/// Provider that populates the store itself mid-fetch, standing in for a
/// second request that won the race.
struct RacingProvider {
    store: Arc<CacheStore>,
    bars: Vec<RawBar>,
}

impl MarketDataProvider for RacingProvider {
    fn name(&self) -> &str {
        "racing"
    }

    fn fetch_bars(&self, symbol: &str, _period: FetchPeriod) -> Result<Vec<RawBar>, DataError> {
        let rows = derive_raw(symbol, self.bars.clone());
        self.store.append_rows(&rows).unwrap();
        Ok(self.bars.clone())
    }
}

#[test]
fn concurrent_populate_is_tolerated() {
    let store = Arc::new(CacheStore::open_in_memory().unwrap());
    let bars = raw_bars(20, 100.0);
    let pipeline = Pipeline::new(
        Arc::clone(&store),
        Box::new(RacingProvider {
            store: Arc::clone(&store),
            bars,
        }),
        FetchPeriod::OneYear,
    )
    .with_clock(FixedClock(today()));

    let result = pipeline.get_series(SYMBOL).unwrap();
    assert_eq!(result.source, SeriesSource::Cache);
    assert_eq!(result.rows.len(), 20);
    assert_eq!(store.row_count(SYMBOL).unwrap(), 20);
}

// ── refresh ──────────────────────────────────────────────────────────

#[test]
fn refresh_then_get_series_is_identical() {
    let (pipeline, state, _store) = pipeline_with(raw_bars(30, 100.0));
    pipeline.get_series(SYMBOL).unwrap();

    // Fewer, different rows upstream: nothing stale may survive the refresh.
    state.set_bars(raw_bars(12, 250.0));
    let refreshed = pipeline.refresh(SYMBOL).unwrap();
    let served = pipeline.get_series(SYMBOL).unwrap();

    assert_eq!(refreshed.source, SeriesSource::Fetched);
    assert_eq!(served.source, SeriesSource::Cache);
    assert_eq!(refreshed.rows, served.rows);
    assert_eq!(served.rows.len(), 12);
    assert_eq!(refreshed.summary, served.summary);
}

#[test]
fn refresh_always_fetches() {
    let (pipeline, state, _store) = pipeline_with(raw_bars(10, 100.0));
    pipeline.get_series(SYMBOL).unwrap();
    pipeline.refresh(SYMBOL).unwrap();
    pipeline.refresh(SYMBOL).unwrap();
    assert_eq!(state.calls(), 3);
}

#[test]
fn empty_refresh_keeps_existing_cache() {
    let (pipeline, state, store) = pipeline_with(raw_bars(10, 100.0));
    let before = pipeline.get_series(SYMBOL).unwrap();

    state.set_bars(Vec::new());
    assert!(pipeline.refresh(SYMBOL).unwrap_err().is_no_data());
    assert_eq!(store.get_all_rows(SYMBOL).unwrap(), before.rows);
}

#[test]
fn cleared_cache_self_heals_on_next_read() {
    let (pipeline, state, store) = pipeline_with(raw_bars(10, 100.0));
    pipeline.get_series(SYMBOL).unwrap();

    // A crash between clear and append leaves nothing behind.
    store.clear_rows(SYMBOL).unwrap();
    let healed = pipeline.get_series(SYMBOL).unwrap();
    assert_eq!(healed.source, SeriesSource::Fetched);
    assert_eq!(healed.rows.len(), 10);
    assert_eq!(state.calls(), 2);
}

#[test]
fn refresh_over_rows_the_clear_left_behind_is_a_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cache.db");
    let store = Arc::new(CacheStore::open(&path).unwrap());
    let state = StubState::default();
    state.set_bars(raw_bars(10, 100.0));
    let pipeline = Pipeline::new(
        Arc::clone(&store),
        Box::new(StubProvider {
            state: state.clone(),
        }),
        FetchPeriod::OneYear,
    )
    .with_clock(FixedClock(today()));
    let cached = pipeline.get_series(SYMBOL).unwrap();

    // Another writer pins the cached rows so the clear cannot remove them.
    let other = rusqlite::Connection::open(&path).unwrap();
    other
        .execute_batch(
            "CREATE TRIGGER pin_rows BEFORE DELETE ON metric_rows \
             BEGIN SELECT RAISE(IGNORE); END;",
        )
        .unwrap();

    let err = pipeline.refresh(SYMBOL).unwrap_err();
    assert!(
        matches!(err, PipelineError::DuplicateRow { ref symbol, .. } if symbol == SYMBOL),
        "got {err:?}"
    );
    assert_eq!(state.calls(), 2);
    assert_eq!(store.get_all_rows(SYMBOL).unwrap(), cached.rows);
}

#[test]
fn overflowing_bars_are_dropped_and_the_rest_cached() {
    let mut bars = raw_bars(10, 100.0);
    bars[3].open = Some(1e-300);
    bars[3].high = Some(1e300);
    bars[3].close = Some(1e300);
    let (pipeline, state, store) = pipeline_with(bars);

    let first = pipeline.get_series(SYMBOL).unwrap();
    assert_eq!(first.source, SeriesSource::Fetched);
    assert_eq!(first.rows.len(), 9);
    assert!(first.rows.iter().all(|r| r.daily_return.is_finite()
        && r.volatility_score.is_finite()));
    assert_eq!(store.row_count(SYMBOL).unwrap(), 9);

    let second = pipeline.get_series(SYMBOL).unwrap();
    assert_eq!(second.source, SeriesSource::Cache);
    assert_eq!(state.calls(), 1);
}

#[test]
fn rows_with_overflowing_volatility_are_not_cached() {
    // A finite return of 1e300 still overflows the squared deviations.
    let mut bars = raw_bars(30, 100.0);
    bars[3].open = Some(1e-150);
    bars[3].high = Some(1e150);
    bars[3].close = Some(1e150);
    let (pipeline, state, store) = pipeline_with(bars);

    let first = pipeline.get_series(SYMBOL).unwrap();
    // Rows 3..=22 have the outlier inside their 20-row volatility window.
    assert_eq!(first.rows.len(), 10);
    assert!(first.rows.iter().all(|r| r.is_finite()));
    assert_eq!(store.row_count(SYMBOL).unwrap(), 10);

    assert_eq!(pipeline.get_series(SYMBOL).unwrap().source, SeriesSource::Cache);
    assert_eq!(state.calls(), 1);
}

// ── recent rows, summary, directory ──────────────────────────────────

#[test]
fn get_recent_returns_newest_ascending() {
    let (pipeline, _state, _store) = pipeline_with(raw_bars(50, 100.0));

    // First call populates via the fetch path.
    let recent = pipeline.get_recent(SYMBOL, 30).unwrap();
    assert_eq!(recent.len(), 30);
    assert!(recent.windows(2).all(|w| w[0].date < w[1].date));
    assert_eq!(recent[29].date, NaiveDate::from_ymd_opt(2024, 2, 19).unwrap());

    // Second call is served by the store and agrees.
    assert_eq!(pipeline.get_recent(SYMBOL, 30).unwrap(), recent);
    assert_eq!(pipeline.get_recent(SYMBOL, 500).unwrap().len(), 50);
}

#[test]
fn summary_uses_injected_clock() {
    let (pipeline, _state, _store) = pipeline_with(raw_bars(10, 100.0));
    let summary = pipeline.summary(SYMBOL).unwrap();
    let rows = pipeline.get_series(SYMBOL).unwrap().rows;

    assert_eq!(pipeline.today(), today());
    assert_eq!(summary.total_days, 10);
    assert_eq!(summary.current_price, rows[9].close);
    assert_eq!(summary.volatility_score, rows[9].volatility_score);
}

#[test]
fn seed_and_list_directory() {
    let (pipeline, _state, _store) = pipeline_with(Vec::new());
    let entries = vec![
        CompanyEntry::new("TCS.NS", "Tata Consultancy Services"),
        CompanyEntry::new("INFY.NS", "Infosys"),
    ];
    assert_eq!(pipeline.seed_directory(&entries).unwrap(), 2);
    // Seeding again is an upsert, not a duplicate.
    pipeline.seed_directory(&entries).unwrap();

    let companies = pipeline.list_companies().unwrap();
    assert_eq!(companies.len(), 2);
    assert_eq!(companies[0].symbol, "TCS.NS");
    assert_eq!(companies[1].name, "Infosys");
}

// ── wiring from config ───────────────────────────────────────────────

#[test]
fn from_config_with_csv_dir_serves_files() {
    use stockdesk_core::AppConfig;

    let dir = tempfile::tempdir().unwrap();
    let csv_dir = dir.path().join("csv");
    std::fs::create_dir_all(&csv_dir).unwrap();
    std::fs::write(
        csv_dir.join("ITC.NS.csv"),
        "date,open,high,low,close,volume\n\
         2024-01-02,440.0,446.0,438.5,445.0,1200000\n\
         2024-01-03,445.0,447.0,441.0,442.5,1100000\n",
    )
    .unwrap();

    let config = AppConfig {
        database_path: dir.path().join("cache").join("stock_data.db"),
        ..AppConfig::default()
    };
    let pipeline = Pipeline::from_config(&config, Some(&csv_dir))
        .unwrap()
        .with_clock(FixedClock(today()));

    assert_eq!(pipeline.provider_name(), "csv_import");
    let result = pipeline.get_series("ITC.NS").unwrap();
    assert_eq!(result.rows.len(), 2);
    assert_eq!(result.summary.current_price, 442.5);
    assert!(config.database_path.exists());
}
