//! Metrics engine: cleaning, trailing-window columns and summary statistics.
//!
//! Everything here is a pure function of its inputs. The summary's 365-day
//! window takes the evaluation date as a parameter instead of reading the
//! clock, so the pipeline decides what "today" means.

pub mod clean;
pub mod derive;
pub mod rolling;
pub mod summary;

pub use clean::{clean, CleanedSeries, ValidationError};
pub use derive::{derive, derive_raw};
pub use summary::summarize;

/// Trailing rows in the moving average of close.
pub const MA_WINDOW: usize = 7;
/// Trailing rows for the 52-week high/low (one trading year).
pub const EXTREMA_WINDOW: usize = 252;
/// Trailing rows in the volatility score's standard deviation.
pub const VOLATILITY_WINDOW: usize = 20;
/// Annualization factor for daily volatility.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;
/// Calendar lookback of the summary's 52-week figures.
pub const SUMMARY_LOOKBACK_DAYS: i64 = 365;

/// Create clean bars from close prices for testing.
///
/// open = previous close (or close for the first bar),
/// high = max(open, close) + 1.0, low = min(open, close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<crate::domain::DailyBar> {
    use crate::domain::DailyBar;
    let base_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            DailyBar {
                symbol: "TEST.NS".to_string(),
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000,
            }
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;
