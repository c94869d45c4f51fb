//! DailyBar — one cleaned trading day for one symbol.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// OHLCV bar that survived cleaning.
///
/// Construction goes through `metrics::clean`, which guarantees finite OHLC,
/// `open > 0` and `close > 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBar {
    pub symbol: String,
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl DailyBar {
    /// Intraday return `(close - open) / open` as a signed fraction.
    pub fn intraday_return(&self) -> f64 {
        (self.close - self.open) / self.open
    }

    /// True if the close finished at or above the open.
    pub fn is_up(&self) -> bool {
        self.close >= self.open
    }
}
