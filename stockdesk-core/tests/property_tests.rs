//! Property tests for metrics and store invariants.
//!
//! Uses proptest to verify:
//! 1. derive is deterministic and output is date-sorted
//! 2. Trailing extrema bracket the current bar and ma_7 stays within them
//! 3. Volatility is never negative
//! 4. Cleaning never lets a non-positive close through
//! 5. Store round trip preserves (date, close) pairs in ascending order

use chrono::NaiveDate;
use proptest::prelude::*;

use stockdesk_core::data::RawBar;
use stockdesk_core::domain::DailyBar;
use stockdesk_core::metrics::{clean, derive, summarize};
use stockdesk_core::CacheStore;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_price() -> impl Strategy<Value = f64> {
    (1.0..5000.0_f64).prop_map(|p| (p * 100.0).round() / 100.0)
}

/// Date-shuffled clean bars with unique dates.
fn arb_bars() -> impl Strategy<Value = Vec<DailyBar>> {
    prop::collection::vec((arb_price(), arb_price(), 0u64..5_000_000), 1..120)
        .prop_map(|points| {
            let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
            points
                .into_iter()
                .enumerate()
                .map(|(i, (open, close, volume))| DailyBar {
                    symbol: "PROP.NS".into(),
                    date: start + chrono::Duration::days(i as i64),
                    open,
                    high: open.max(close) * 1.01,
                    low: open.min(close) * 0.99,
                    close,
                    volume,
                })
                .collect::<Vec<_>>()
        })
        .prop_shuffle()
}

fn arb_raw_bar() -> impl Strategy<Value = RawBar> {
    (
        0i64..60,
        prop::option::of(-10.0..100.0_f64),
        prop::option::of(-10.0..100.0_f64),
        prop::option::of(0u64..1000),
    )
        .prop_map(|(offset, open, close, volume)| RawBar {
            date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap() + chrono::Duration::days(offset),
            open,
            high: Some(110.0),
            low: Some(0.5),
            close,
            volume,
        })
}

// ── 1. Determinism and ordering ──────────────────────────────────────

proptest! {
    #[test]
    fn derive_is_deterministic_and_sorted(bars in arb_bars()) {
        let a = derive(bars.clone());
        let b = derive(bars.clone());
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.len(), bars.len());
        prop_assert!(a.windows(2).all(|w| w[0].date < w[1].date));
    }
}

// ── 2. Extrema bracket the bar ───────────────────────────────────────

proptest! {
    #[test]
    fn extrema_bracket_current_bar(bars in arb_bars()) {
        for row in derive(bars) {
            prop_assert!(row.week_52_high >= row.high);
            prop_assert!(row.week_52_low <= row.low);
            prop_assert!(row.ma_7 <= row.week_52_high + 1e-9);
            prop_assert!(row.ma_7 >= row.week_52_low - 1e-9);
        }
    }
}

// ── 3. Volatility sign ───────────────────────────────────────────────

proptest! {
    #[test]
    fn volatility_is_non_negative(bars in arb_bars()) {
        let rows = derive(bars);
        prop_assert!(rows.iter().all(|r| r.volatility_score >= 0.0));
        prop_assert_eq!(rows[0].volatility_score, 0.0);

        let today = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        let summary = summarize(&rows, today);
        prop_assert_eq!(summary.total_days, rows.len());
        prop_assert!(summary.week_52_high >= summary.week_52_low);
    }
}

// ── 4. Cleaning ──────────────────────────────────────────────────────

proptest! {
    #[test]
    fn clean_keeps_only_valid_unique_rows(raw in prop::collection::vec(arb_raw_bar(), 0..80)) {
        let total = raw.len();
        let cleaned = clean("PROP.NS", raw);
        prop_assert_eq!(cleaned.bars.len() + cleaned.rejected.len(), total);
        prop_assert!(cleaned.bars.iter().all(|b| b.close > 0.0 && b.open > 0.0));

        let mut dates: Vec<NaiveDate> = cleaned.bars.iter().map(|b| b.date).collect();
        dates.sort();
        dates.dedup();
        prop_assert_eq!(dates.len(), cleaned.bars.len());
    }
}

// ── 5. Store round trip ──────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn store_roundtrip_preserves_date_close_pairs(bars in arb_bars()) {
        let store = CacheStore::open_in_memory().unwrap();
        let rows = derive(bars);
        store.append_rows(&rows).unwrap();

        let back = store.get_all_rows("PROP.NS").unwrap();
        let written: Vec<(NaiveDate, f64)> = rows.iter().map(|r| (r.date, r.close)).collect();
        let read: Vec<(NaiveDate, f64)> = back.iter().map(|r| (r.date, r.close)).collect();
        prop_assert_eq!(read, written);
    }
}
