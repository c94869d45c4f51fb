//! Trailing-window primitives with a minimum period of one.
//!
//! Output index `i` covers `values[i + 1 - w ..= i]`, where `w` is the window
//! clipped to the rows available so far. The first row therefore always gets
//! a single-point value instead of NaN.

use std::collections::VecDeque;

/// Slice of at most `window` values ending at and including `i`.
fn trailing(values: &[f64], i: usize, window: usize) -> &[f64] {
    let start = (i + 1).saturating_sub(window.max(1));
    &values[start..=i]
}

/// Trailing arithmetic mean.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            let w = trailing(values, i, window);
            w.iter().sum::<f64>() / w.len() as f64
        })
        .collect()
}

/// Trailing sample standard deviation (n - 1 denominator).
///
/// A single-point window and a window of identical values both yield exactly 0.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<f64> {
    (0..values.len())
        .map(|i| {
            let w = trailing(values, i, window);
            if w.len() < 2 || w.iter().all(|v| *v == w[0]) {
                return 0.0;
            }
            let mean = w.iter().sum::<f64>() / w.len() as f64;
            let ss: f64 = w.iter().map(|v| (v - mean).powi(2)).sum();
            (ss / (w.len() - 1) as f64).sqrt()
        })
        .collect()
}

/// Trailing maximum, O(n) via a monotonic deque of indices.
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, |candidate, held| candidate >= held)
}

/// Trailing minimum, O(n) via a monotonic deque of indices.
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, |candidate, held| candidate <= held)
}

/// `dominates(new, old)` is true when `old` can never be the extreme again
/// once `new` has entered the window.
fn rolling_extreme(values: &[f64], window: usize, dominates: fn(f64, f64) -> bool) -> Vec<f64> {
    let window = window.max(1);
    let mut out = Vec::with_capacity(values.len());
    let mut deque: VecDeque<usize> = VecDeque::new();

    for (i, &v) in values.iter().enumerate() {
        while deque.back().is_some_and(|&j| dominates(v, values[j])) {
            deque.pop_back();
        }
        deque.push_back(i);
        while deque.front().is_some_and(|&j| j + window <= i) {
            deque.pop_front();
        }
        // The deque is never empty here: index i was just pushed.
        out.push(values[deque[0]]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::{assert_approx, DEFAULT_EPSILON};

    #[test]
    fn mean_uses_partial_windows_at_start() {
        let result = rolling_mean(&[10.0, 20.0, 30.0], 7);
        assert_eq!(result, vec![10.0, 15.0, 20.0]);
    }

    #[test]
    fn mean_rolls_once_window_is_full() {
        let result = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_approx(result[2], 2.0, DEFAULT_EPSILON);
        assert_approx(result[3], 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 4.0, DEFAULT_EPSILON);
    }

    #[test]
    fn std_single_point_is_zero() {
        assert_eq!(rolling_std(&[0.05], 20), vec![0.0]);
    }

    #[test]
    fn std_constant_window_is_exactly_zero() {
        let values = vec![0.05; 30];
        assert!(rolling_std(&values, 20).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn std_is_sample_std() {
        // values 1, 2, 3, 4: mean 2.5, ss = 5, sample var = 5/3
        let result = rolling_std(&[1.0, 2.0, 3.0, 4.0], 20);
        assert_approx(result[3], (5.0_f64 / 3.0).sqrt(), DEFAULT_EPSILON);
        // values 1, 2: sample std = sqrt(0.5)
        assert_approx(result[1], 0.5_f64.sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn std_window_drops_old_values() {
        let mut values = vec![1.0, 9.0];
        values.extend(std::iter::repeat(3.0).take(5));
        let result = rolling_std(&values, 5);
        assert_eq!(result[6], 0.0);
    }

    #[test]
    fn max_min_running_on_monotonic_input() {
        let values = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(rolling_max(&values, 252), vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(rolling_min(&values, 252), vec![1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn max_min_expire_out_of_window() {
        let values = [5.0, 1.0, 2.0, 3.0, 0.5];
        assert_eq!(rolling_max(&values, 3), vec![5.0, 5.0, 5.0, 3.0, 3.0]);
        assert_eq!(rolling_min(&values, 3), vec![5.0, 1.0, 1.0, 1.0, 0.5]);
    }

    #[test]
    fn extremes_match_brute_force() {
        let values: Vec<f64> = (0..300).map(|i| ((i * 37) % 101) as f64).collect();
        let max = rolling_max(&values, 20);
        let min = rolling_min(&values, 20);
        for i in 0..values.len() {
            let w = trailing(&values, i, 20);
            assert_eq!(max[i], w.iter().cloned().fold(f64::MIN, f64::max));
            assert_eq!(min[i], w.iter().cloned().fold(f64::MAX, f64::min));
        }
    }

    #[test]
    fn empty_input() {
        assert!(rolling_mean(&[], 7).is_empty());
        assert!(rolling_std(&[], 20).is_empty());
        assert!(rolling_max(&[], 252).is_empty());
    }
}
