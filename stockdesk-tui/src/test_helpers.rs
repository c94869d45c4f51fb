//! Test helpers: a canned provider and an in-memory pipeline around it.

use std::sync::Arc;

use chrono::NaiveDate;

use stockdesk_core::data::{CompanyEntry, DataError, FetchPeriod, MarketDataProvider, RawBar};
use stockdesk_core::metrics::{derive_raw, summarize};
use stockdesk_core::pipeline::FixedClock;
use stockdesk_core::{CacheStore, Company, Pipeline, SeriesResult, SeriesSource};

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 28).unwrap()
}

pub fn raw_bars(n: usize) -> Vec<RawBar> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..n)
        .map(|i| {
            let close = 100.0 + (i as f64 * 0.3).sin() * 4.0;
            RawBar {
                date: start + chrono::Duration::days(i as i64),
                open: Some(close - 0.8),
                high: Some(close + 1.2),
                low: Some(close - 1.6),
                close: Some(close),
                volume: Some(50_000 + i as u64 * 10),
            }
        })
        .collect()
}

/// Serves the same bars for every symbol.
pub struct CannedProvider {
    pub bars: Vec<RawBar>,
}

impl MarketDataProvider for CannedProvider {
    fn name(&self) -> &str {
        "canned"
    }

    fn fetch_bars(&self, _symbol: &str, _period: FetchPeriod) -> Result<Vec<RawBar>, DataError> {
        Ok(self.bars.clone())
    }
}

/// In-memory pipeline with two seeded companies and `bars` canned bars.
pub fn stub_pipeline(bars: usize) -> Pipeline {
    let store = Arc::new(CacheStore::open_in_memory().unwrap());
    let pipeline = Pipeline::new(
        store,
        Box::new(CannedProvider {
            bars: raw_bars(bars),
        }),
        FetchPeriod::OneYear,
    )
    .with_clock(FixedClock(today()));
    pipeline
        .seed_directory(&[
            CompanyEntry::new("TEST.NS", "Test Industries"),
            CompanyEntry::new("DEMO.NS", "Demo Holdings"),
        ])
        .unwrap();
    pipeline
}

pub fn company(symbol: &str) -> Company {
    Company {
        symbol: symbol.to_string(),
        name: format!("Company {symbol}"),
        last_updated: chrono::Utc::now(),
    }
}

pub fn series_result(n: usize) -> SeriesResult {
    let rows = derive_raw("TEST.NS", raw_bars(n));
    let summary = summarize(&rows, today());
    SeriesResult {
        rows,
        summary,
        source: SeriesSource::Cache,
    }
}
