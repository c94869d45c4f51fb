//! MetricRow — a DailyBar plus its derived columns.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::bar::DailyBar;

/// One persisted row per (symbol, date).
///
/// Field names are the wire and column names used by the API, the CSV export
/// and the `metric_rows` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricRow {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    /// `(close - open) / open`, a signed fraction.
    pub daily_return: f64,
    pub ma_7: f64,
    pub week_52_high: f64,
    pub week_52_low: f64,
    /// Annualized percentage standard deviation of daily_return.
    pub volatility_score: f64,
}

impl MetricRow {
    /// The raw bar this row was derived from.
    pub fn bar(&self) -> DailyBar {
        DailyBar {
            symbol: self.symbol.clone(),
            date: self.date,
            open: self.open,
            high: self.high,
            low: self.low,
            close: self.close,
            volume: self.volume,
        }
    }

    /// Every float column is finite. SQLite stores NaN as NULL, which the
    /// metric columns reject.
    pub fn is_finite(&self) -> bool {
        [
            self.open,
            self.high,
            self.low,
            self.close,
            self.daily_return,
            self.ma_7,
            self.week_52_high,
            self.week_52_low,
            self.volatility_score,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Daily return expressed in percent.
    pub fn daily_return_percent(&self) -> f64 {
        self.daily_return * 100.0
    }
}
