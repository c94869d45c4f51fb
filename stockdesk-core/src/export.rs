//! CSV export of metric rows.
//!
//! Columns: date, open, high, low, close, volume, daily_return_percent, ma_7,
//! week_52_high, week_52_low, volatility_score

use std::path::Path;

use thiserror::Error;

use crate::domain::MetricRow;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

const HEADER: [&str; 11] = [
    "date",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "daily_return_percent",
    "ma_7",
    "week_52_high",
    "week_52_low",
    "volatility_score",
];

fn write_rows<W: std::io::Write>(wtr: &mut csv::Writer<W>, rows: &[MetricRow]) -> Result<(), ExportError> {
    wtr.write_record(HEADER)?;
    for r in rows {
        wtr.write_record([
            r.date.to_string(),
            format!("{:.2}", r.open),
            format!("{:.2}", r.high),
            format!("{:.2}", r.low),
            format!("{:.2}", r.close),
            r.volume.to_string(),
            format!("{:.4}", r.daily_return_percent()),
            format!("{:.2}", r.ma_7),
            format!("{:.2}", r.week_52_high),
            format!("{:.2}", r.week_52_low),
            format!("{:.2}", r.volatility_score),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Render rows as a CSV document.
pub fn rows_to_csv(rows: &[MetricRow]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    write_rows(&mut wtr, rows)?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write rows to `path`, creating parent directories as needed.
pub fn export_rows_csv(rows: &[MetricRow], path: &Path) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    write_rows(&mut wtr, rows)?;
    tracing::info!(path = %path.display(), rows = rows.len(), "exported rows to CSV");
    Ok(())
}
