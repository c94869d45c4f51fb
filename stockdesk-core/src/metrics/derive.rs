//! Derived columns for a daily series.

use crate::data::RawBar;
use crate::domain::{DailyBar, MetricRow};

use super::clean::clean;
use super::rolling::{rolling_max, rolling_mean, rolling_min, rolling_std};
use super::{EXTREMA_WINDOW, MA_WINDOW, TRADING_DAYS_PER_YEAR, VOLATILITY_WINDOW};

/// Compute metric rows for cleaned bars.
///
/// Bars are stable-sorted by date first; every trailing window runs over the
/// date-sorted sequence, never the input order. Empty in, empty out.
pub fn derive(mut bars: Vec<DailyBar>) -> Vec<MetricRow> {
    if bars.is_empty() {
        return Vec::new();
    }
    bars.sort_by_key(|b| b.date);

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let highs: Vec<f64> = bars.iter().map(|b| b.high).collect();
    let lows: Vec<f64> = bars.iter().map(|b| b.low).collect();
    let returns: Vec<f64> = bars.iter().map(DailyBar::intraday_return).collect();

    let ma_7 = rolling_mean(&closes, MA_WINDOW);
    let week_52_high = rolling_max(&highs, EXTREMA_WINDOW);
    let week_52_low = rolling_min(&lows, EXTREMA_WINDOW);
    let annualize = TRADING_DAYS_PER_YEAR.sqrt() * 100.0;
    let volatility = rolling_std(&returns, VOLATILITY_WINDOW);

    bars.into_iter()
        .enumerate()
        .map(|(i, bar)| MetricRow {
            symbol: bar.symbol,
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume,
            daily_return: returns[i],
            ma_7: ma_7[i],
            week_52_high: week_52_high[i],
            week_52_low: week_52_low[i],
            volatility_score: volatility[i] * annualize,
        })
        .collect()
}

/// Clean raw provider bars and derive metrics in one step.
pub fn derive_raw(symbol: &str, raw: Vec<RawBar>) -> Vec<MetricRow> {
    derive(clean(symbol, raw).bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{assert_approx, make_bars, DEFAULT_EPSILON};
    use chrono::NaiveDate;

    #[test]
    fn daily_return_is_exact_fraction() {
        let mut bars = make_bars(&[105.0]);
        bars[0].open = 100.0;
        let rows = derive(bars);
        assert_eq!(rows[0].daily_return, 0.05);
    }

    #[test]
    fn ma_7_trailing_with_min_period_one() {
        let rows = derive(make_bars(&[10.0, 20.0, 30.0]));
        let ma: Vec<f64> = rows.iter().map(|r| r.ma_7).collect();
        assert_eq!(ma, vec![10.0, 15.0, 20.0]);
    }

    #[test]
    fn ma_7_full_window() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let rows = derive(make_bars(&closes));
        // last 7 closes: 4..=10, mean 7
        assert_approx(rows[9].ma_7, 7.0, DEFAULT_EPSILON);
    }

    #[test]
    fn extremes_on_increasing_highs_are_running_values() {
        let closes: Vec<f64> = (1..=30).map(|i| 100.0 + i as f64).collect();
        let rows = derive(make_bars(&closes));
        let mut running_max = f64::MIN;
        let mut running_min = f64::MAX;
        for row in &rows {
            running_max = running_max.max(row.high);
            running_min = running_min.min(row.low);
            assert_eq!(row.week_52_high, running_max);
            assert_eq!(row.week_52_low, running_min);
        }
    }

    #[test]
    fn zero_variance_returns_give_zero_volatility() {
        // open 100 / close 101 every day → identical daily returns
        let bars: Vec<DailyBar> = make_bars(&[101.0; 25])
            .into_iter()
            .map(|mut b| {
                b.open = 100.0;
                b
            })
            .collect();
        let rows = derive(bars);
        assert!(rows.iter().all(|r| r.volatility_score == 0.0));
    }

    #[test]
    fn volatility_is_annualized_percent() {
        let mut bars = make_bars(&[101.0, 99.0]);
        bars[0].open = 100.0;
        bars[1].open = 100.0;
        let rows = derive(bars);
        // returns 0.01 and -0.01: sample std = sqrt(0.0002)
        let expected = 0.0002_f64.sqrt() * 252.0_f64.sqrt() * 100.0;
        assert_eq!(rows[0].volatility_score, 0.0);
        assert_approx(rows[1].volatility_score, expected, 1e-9);
    }

    #[test]
    fn sorts_by_date_before_rolling() {
        let mut bars = make_bars(&[10.0, 20.0, 30.0]);
        bars.reverse();
        let rows = derive(bars);
        assert_eq!(rows[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(rows[0].close, 10.0);
        assert_eq!(rows[2].ma_7, 20.0);
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(derive(Vec::new()).is_empty());
        assert!(derive_raw("X.NS", Vec::new()).is_empty());
    }

    #[test]
    fn deterministic() {
        let closes: Vec<f64> = (0..300).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0).collect();
        let bars = make_bars(&closes);
        assert_eq!(derive(bars.clone()), derive(bars));
    }

    #[test]
    fn derive_raw_drops_invalid_rows() {
        let day = |d: u32| NaiveDate::from_ymd_opt(2024, 2, d).unwrap();
        let raw = vec![
            RawBar {
                date: day(1),
                open: Some(100.0),
                high: Some(101.0),
                low: Some(99.0),
                close: Some(100.5),
                volume: Some(10),
            },
            RawBar {
                date: day(2),
                open: None,
                high: Some(101.0),
                low: Some(99.0),
                close: Some(100.0),
                volume: Some(10),
            },
        ];
        let rows = derive_raw("HDFCBANK.NS", raw);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].symbol, "HDFCBANK.NS");
    }
}
