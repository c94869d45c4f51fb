//! Row-level cleaning of raw provider bars.
//!
//! A row that fails validation is dropped, never raised: the series carries on
//! with the rows that survive, in their original relative order.

use std::collections::HashSet;

use chrono::NaiveDate;
use thiserror::Error;

use crate::data::RawBar;
use crate::domain::DailyBar;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("{0} is null")]
    MissingField(&'static str),

    #[error("{0} is not a finite number")]
    NonFinite(&'static str),

    #[error("close {0} is not positive")]
    NonPositiveClose(f64),

    #[error("open {0} is not positive")]
    NonPositiveOpen(f64),

    #[error("open {open} to close {close} has no finite return")]
    NonFiniteReturn { open: f64, close: f64 },

    #[error("duplicate row for {0}")]
    DuplicateDate(NaiveDate),
}

/// Output of `clean`: surviving bars plus the reason each dropped row failed.
#[derive(Debug, Clone, Default)]
pub struct CleanedSeries {
    pub bars: Vec<DailyBar>,
    pub rejected: Vec<(NaiveDate, ValidationError)>,
}

/// Validate every raw bar, keeping the ones that pass.
///
/// The first occurrence of a date wins; later rows for the same date are
/// rejected so the cache's (symbol, date) key can never collide on append.
pub fn clean(symbol: &str, raw: Vec<RawBar>) -> CleanedSeries {
    let mut out = CleanedSeries {
        bars: Vec::with_capacity(raw.len()),
        rejected: Vec::new(),
    };
    let mut seen = HashSet::with_capacity(raw.len());

    for bar in raw {
        let date = bar.date;
        match validate(symbol, bar) {
            Ok(_) if !seen.insert(date) => {
                out.rejected
                    .push((date, ValidationError::DuplicateDate(date)));
            }
            Ok(clean) => out.bars.push(clean),
            Err(e) => out.rejected.push((date, e)),
        }
    }

    if !out.rejected.is_empty() {
        tracing::debug!(
            symbol,
            kept = out.bars.len(),
            dropped = out.rejected.len(),
            "dropped invalid rows during cleaning"
        );
    }
    out
}

/// Validate a single raw bar.
pub fn validate(symbol: &str, raw: RawBar) -> Result<DailyBar, ValidationError> {
    let open = finite("open", raw.open)?;
    let high = finite("high", raw.high)?;
    let low = finite("low", raw.low)?;
    let close = finite("close", raw.close)?;

    if close <= 0.0 {
        return Err(ValidationError::NonPositiveClose(close));
    }
    if open <= 0.0 {
        return Err(ValidationError::NonPositiveOpen(open));
    }
    if !((close - open) / open).is_finite() {
        return Err(ValidationError::NonFiniteReturn { open, close });
    }
    let volume = raw.volume.ok_or(ValidationError::MissingField("volume"))?;

    Ok(DailyBar {
        symbol: symbol.to_string(),
        date: raw.date,
        open,
        high,
        low,
        close,
        volume,
    })
}

fn finite(field: &'static str, value: Option<f64>) -> Result<f64, ValidationError> {
    match value {
        None => Err(ValidationError::MissingField(field)),
        Some(v) if !v.is_finite() => Err(ValidationError::NonFinite(field)),
        Some(v) => Ok(v),
    }
}
