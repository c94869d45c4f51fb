//! Market-data provider trait and structured error types.
//!
//! The MarketDataProvider trait abstracts over data sources (Yahoo Finance,
//! CSV import) so the pipeline can swap implementations and tests can mock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Raw daily bar as delivered by a provider, before cleaning.
///
/// Nulls from the feed stay `None` here; `metrics::clean` decides what survives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<u64>,
}

/// Structured error types for market-data operations.
#[derive(Debug, Error)]
pub enum DataError {
    /// Network or upstream failure that may succeed on retry.
    #[error("transient fetch failure: {0}")]
    Transient(String),

    #[error("symbol not found: {symbol}")]
    SymbolNotFound { symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormat(String),

    #[error("provider is refusing requests for another {remaining_secs}s (circuit breaker open)")]
    CircuitOpen { remaining_secs: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("HTTP client setup failed: {0}")]
    Client(String),
}

impl DataError {
    pub fn is_transient(&self) -> bool {
        matches!(self, DataError::Transient(_))
    }
}

/// Lookback period for a fetch, in the provider's range vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FetchPeriod {
    #[serde(rename = "1mo")]
    OneMonth,
    #[serde(rename = "3mo")]
    ThreeMonths,
    #[serde(rename = "6mo")]
    SixMonths,
    #[default]
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "2y")]
    TwoYears,
    #[serde(rename = "5y")]
    FiveYears,
}

impl FetchPeriod {
    pub fn as_str(self) -> &'static str {
        match self {
            FetchPeriod::OneMonth => "1mo",
            FetchPeriod::ThreeMonths => "3mo",
            FetchPeriod::SixMonths => "6mo",
            FetchPeriod::OneYear => "1y",
            FetchPeriod::TwoYears => "2y",
            FetchPeriod::FiveYears => "5y",
        }
    }

    /// Calendar days covered by the period.
    pub fn days(self) -> i64 {
        match self {
            FetchPeriod::OneMonth => 30,
            FetchPeriod::ThreeMonths => 91,
            FetchPeriod::SixMonths => 182,
            FetchPeriod::OneYear => 365,
            FetchPeriod::TwoYears => 730,
            FetchPeriod::FiveYears => 1826,
        }
    }
}

impl fmt::Display for FetchPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FetchPeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1mo" => Ok(FetchPeriod::OneMonth),
            "3mo" => Ok(FetchPeriod::ThreeMonths),
            "6mo" => Ok(FetchPeriod::SixMonths),
            "1y" => Ok(FetchPeriod::OneYear),
            "2y" => Ok(FetchPeriod::TwoYears),
            "5y" => Ok(FetchPeriod::FiveYears),
            other => Err(format!(
                "unknown period '{other}' (expected 1mo, 3mo, 6mo, 1y, 2y or 5y)"
            )),
        }
    }
}

/// Trait for market-data providers (Yahoo Finance, CSV import, test stubs).
///
/// Providers don't know about the cache; the pipeline sits above this trait.
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch daily bars for a symbol over a lookback period, oldest first.
    ///
    /// An unknown symbol may come back either as `Ok(vec![])` or as
    /// `DataError::SymbolNotFound`; callers treat both as "no data".
    fn fetch_bars(&self, symbol: &str, period: FetchPeriod) -> Result<Vec<RawBar>, DataError>;

    /// Check if the provider is currently accepting requests.
    fn is_available(&self) -> bool {
        true
    }
}
