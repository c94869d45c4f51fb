//! CSV import provider — offline source of daily bars.
//!
//! Layout: `{dir}/{SYMBOL}.csv` with a header row
//! `date,open,high,low,close,volume`. Numeric fields are coerced leniently:
//! blanks and non-numeric text become nulls that cleaning later drops.
//! The lookback period is applied relative to the newest row in the file.

use super::provider::{DataError, FetchPeriod, MarketDataProvider, RawBar};
use chrono::NaiveDate;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date")]
    date: String,
    #[serde(alias = "Open", default)]
    open: Option<String>,
    #[serde(alias = "High", default)]
    high: Option<String>,
    #[serde(alias = "Low", default)]
    low: Option<String>,
    #[serde(alias = "Close", default)]
    close: Option<String>,
    #[serde(alias = "Volume", default)]
    volume: Option<String>,
}

pub struct CsvProvider {
    dir: PathBuf,
}

impl CsvProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `None` for symbols that could name a file outside `dir`.
    fn symbol_path(&self, symbol: &str) -> Option<PathBuf> {
        if symbol.is_empty() || symbol.contains(['/', '\\']) || symbol.contains("..") {
            return None;
        }
        Some(self.dir.join(format!("{symbol}.csv")))
    }
}

impl MarketDataProvider for CsvProvider {
    fn name(&self) -> &str {
        "csv_import"
    }

    fn fetch_bars(&self, symbol: &str, period: FetchPeriod) -> Result<Vec<RawBar>, DataError> {
        let Some(path) = self.symbol_path(symbol) else {
            tracing::warn!(symbol, "rejecting symbol that is not a plain file name");
            return Ok(Vec::new());
        };
        if !path.exists() {
            tracing::debug!(symbol, path = %path.display(), "no CSV file for symbol");
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(&path)?;

        let mut bars = Vec::new();
        for (line, record) in reader.deserialize::<CsvRecord>().enumerate() {
            let record = record?;
            let Some(date) = parse_date(&record.date) else {
                tracing::debug!(symbol, line, date = %record.date, "skipping row with bad date");
                continue;
            };
            bars.push(RawBar {
                date,
                open: coerce_f64(record.open.as_deref()),
                high: coerce_f64(record.high.as_deref()),
                low: coerce_f64(record.low.as_deref()),
                close: coerce_f64(record.close.as_deref()),
                volume: coerce_f64(record.volume.as_deref())
                    .filter(|v| *v >= 0.0)
                    .map(|v| v.round() as u64),
            });
        }

        if let Some(newest) = bars.iter().map(|b| b.date).max() {
            let cutoff = newest - chrono::Duration::days(period.days());
            bars.retain(|b| b.date > cutoff);
        }
        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }
}

/// Accepts `YYYY-MM-DD` and timestamps that start with one
/// (`2024-01-02 00:00:00+05:30`).
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn coerce_f64(raw: Option<&str>) -> Option<f64> {
    raw.and_then(|s| s.replace(',', "").parse::<f64>().ok())
        .filter(|v| v.is_finite())
}
