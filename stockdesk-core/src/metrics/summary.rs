//! Summary statistics over a metric series.
//!
//! The 52-week figures are taken over rows dated within the last 365 calendar
//! days of `today`, not of the series' own newest date. A stale cache
//! therefore shows up as a short (or fallback) window and an old last-row
//! date rather than being masked. When no row falls inside the window the
//! whole series is used.

use chrono::NaiveDate;

use crate::domain::{MetricRow, Summary};

use super::SUMMARY_LOOKBACK_DAYS;

pub fn summarize(rows: &[MetricRow], today: NaiveDate) -> Summary {
    // max_by_key returns the last maximal element, so ties resolve to the
    // row that came last.
    let Some(latest) = rows.iter().max_by_key(|r| r.date) else {
        return Summary::default();
    };

    let cutoff = today - chrono::Duration::days(SUMMARY_LOOKBACK_DAYS);
    let mut year: Vec<&MetricRow> = rows.iter().filter(|r| r.date >= cutoff).collect();
    if year.is_empty() {
        year = rows.iter().collect();
    }

    let n = rows.len() as f64;
    Summary {
        week_52_high: year.iter().map(|r| r.high).fold(f64::NEG_INFINITY, f64::max),
        week_52_low: year.iter().map(|r| r.low).fold(f64::INFINITY, f64::min),
        avg_close: year.iter().map(|r| r.close).sum::<f64>() / year.len() as f64,
        current_price: latest.close,
        avg_daily_return_percent: rows.iter().map(|r| r.daily_return).sum::<f64>() / n * 100.0,
        volatility_score: latest.volatility_score,
        avg_volume: rows.iter().map(|r| r.volume as f64).sum::<f64>() / n,
        total_days: rows.len(),
    }
}
