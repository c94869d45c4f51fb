//! Pipeline orchestrator: cache hit, or fetch → derive → persist.
//!
//! The pipeline owns no process-wide state. It is built from an explicit
//! store, provider and clock, and every call runs to completion on the
//! calling thread.
//!
//! Two callers may miss the cache for the same symbol at once and both try
//! to populate it. The second writer's append fails with a duplicate row;
//! `get_series` treats that as "already populated" and serves the stored
//! rows. `refresh` does not: a duplicate after its own clear is a real
//! fault and is returned to the caller.
//!
//! `refresh` clears then appends in two separate store calls. If the process
//! dies in between, the symbol's cache is simply empty and the next
//! `get_series` re-fetches it.

use std::path::Path;
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::AppConfig;
use crate::data::{
    CompanyEntry, CsvProvider, DataError, FetchPeriod, MarketDataProvider, RawBar, YahooProvider,
};
use crate::domain::{Company, MetricRow, Summary};
use crate::metrics::{derive_raw, summarize};
use crate::store::{CacheStore, StoreError};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Neither the cache nor the provider has rows for this symbol.
    #[error("No data found for symbol: {symbol}")]
    NoData { symbol: String },

    #[error("row already cached for {symbol} on {date}")]
    DuplicateRow { symbol: String, date: NaiveDate },

    #[error(transparent)]
    Store(StoreError),

    #[error("cannot build market-data provider: {0}")]
    Provider(#[from] DataError),
}

impl From<StoreError> for PipelineError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateRow { symbol, date } => PipelineError::DuplicateRow { symbol, date },
            other => PipelineError::Store(other),
        }
    }
}

impl PipelineError {
    pub fn is_no_data(&self) -> bool {
        matches!(self, PipelineError::NoData { .. })
    }
}

/// Supplies the evaluation date for the summary's 365-day window.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date of the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// Where a series was served from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesSource {
    Cache,
    Fetched,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesResult {
    /// Ascending by date.
    pub rows: Vec<MetricRow>,
    pub summary: Summary,
    pub source: SeriesSource,
}

pub struct Pipeline {
    store: Arc<CacheStore>,
    provider: Box<dyn MarketDataProvider>,
    period: FetchPeriod,
    clock: Box<dyn Clock>,
}

impl Pipeline {
    pub fn new(
        store: Arc<CacheStore>,
        provider: Box<dyn MarketDataProvider>,
        period: FetchPeriod,
    ) -> Self {
        Self {
            store,
            provider,
            period,
            clock: Box::new(SystemClock),
        }
    }

    /// Open the configured cache and pick a provider: CSV files from
    /// `csv_dir` when given, otherwise Yahoo Finance.
    pub fn from_config(config: &AppConfig, csv_dir: Option<&Path>) -> Result<Self, PipelineError> {
        let store = Arc::new(CacheStore::open(&config.database_path)?);
        let provider: Box<dyn MarketDataProvider> = match csv_dir {
            Some(dir) => Box::new(CsvProvider::new(dir)),
            None => Box::new(YahooProvider::new(
                config.fetch.yahoo_settings(),
                config.fetch.circuit_breaker(),
            )?),
        };
        tracing::debug!(
            database = %config.database_path.display(),
            provider = provider.name(),
            period = %config.fetch.period,
            "pipeline ready"
        );
        Ok(Self::new(store, provider, config.fetch.period))
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn store(&self) -> &Arc<CacheStore> {
        &self.store
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    pub fn period(&self) -> FetchPeriod {
        self.period
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Cached series for `symbol`, populating the cache on a miss.
    pub fn get_series(&self, symbol: &str) -> Result<SeriesResult, PipelineError> {
        let cached = self.store.get_all_rows(symbol)?;
        if !cached.is_empty() {
            tracing::debug!(symbol, rows = cached.len(), "cache hit");
            return Ok(self.result(cached, SeriesSource::Cache));
        }

        let rows = self.fetch_and_derive(symbol)?;
        match self.store.append_rows(&rows) {
            Ok(written) => {
                tracing::info!(symbol, written, "cached freshly fetched series");
                Ok(self.result(rows, SeriesSource::Fetched))
            }
            Err(StoreError::DuplicateRow { date, .. }) => {
                tracing::info!(symbol, %date, "series populated concurrently, serving stored rows");
                let stored = self.store.get_all_rows(symbol)?;
                if stored.is_empty() {
                    Ok(self.result(rows, SeriesSource::Fetched))
                } else {
                    Ok(self.result(stored, SeriesSource::Cache))
                }
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Re-fetch `symbol` and replace its cached rows.
    ///
    /// An empty fetch reports [`PipelineError::NoData`] and leaves the cache
    /// as it was.
    pub fn refresh(&self, symbol: &str) -> Result<SeriesResult, PipelineError> {
        let rows = self.fetch_and_derive(symbol)?;
        let cleared = self.store.clear_rows(symbol)?;
        let written = self.store.append_rows(&rows)?;
        tracing::info!(symbol, cleared, written, "refreshed series");
        Ok(self.result(rows, SeriesSource::Fetched))
    }

    /// The newest `limit` rows, ascending by date.
    pub fn get_recent(&self, symbol: &str, limit: usize) -> Result<Vec<MetricRow>, PipelineError> {
        if self.store.row_count(symbol)? > 0 {
            return Ok(self.store.get_recent_rows(symbol, limit)?);
        }
        let mut rows = self.get_series(symbol)?.rows;
        let skip = rows.len().saturating_sub(limit);
        Ok(rows.split_off(skip))
    }

    pub fn summary(&self, symbol: &str) -> Result<Summary, PipelineError> {
        Ok(self.get_series(symbol)?.summary)
    }

    pub fn list_companies(&self) -> Result<Vec<Company>, PipelineError> {
        Ok(self.store.list_companies()?)
    }

    /// Upsert every entry into the company directory.
    pub fn seed_directory(&self, companies: &[CompanyEntry]) -> Result<usize, PipelineError> {
        for entry in companies {
            self.store.upsert_company(&entry.symbol, &entry.name)?;
        }
        tracing::info!(count = companies.len(), "seeded company directory");
        Ok(companies.len())
    }

    fn result(&self, rows: Vec<MetricRow>, source: SeriesSource) -> SeriesResult {
        let summary = summarize(&rows, self.clock.today());
        SeriesResult {
            rows,
            summary,
            source,
        }
    }

    fn fetch_and_derive(&self, symbol: &str) -> Result<Vec<MetricRow>, PipelineError> {
        let mut rows = derive_raw(symbol, self.fetch(symbol));
        let derived = rows.len();
        rows.retain(MetricRow::is_finite);
        if rows.len() < derived {
            tracing::warn!(
                symbol,
                dropped = derived - rows.len(),
                "dropped rows with non-finite metrics"
            );
        }
        if rows.is_empty() {
            return Err(PipelineError::NoData {
                symbol: symbol.to_string(),
            });
        }
        Ok(rows)
    }

    /// Provider failures never escape: they are logged and read as "no bars".
    fn fetch(&self, symbol: &str) -> Vec<RawBar> {
        match self.provider.fetch_bars(symbol, self.period) {
            Ok(bars) => {
                tracing::info!(
                    symbol,
                    provider = self.provider.name(),
                    period = %self.period,
                    bars = bars.len(),
                    "fetched bars"
                );
                bars
            }
            Err(e) => {
                tracing::warn!(symbol, provider = self.provider.name(), error = %e, "fetch failed");
                Vec::new()
            }
        }
    }
}
