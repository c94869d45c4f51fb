//! Derived metric rows, keyed by (symbol, date).

use chrono::NaiveDate;
use rusqlite::{ffi, params, Connection, Row};

use crate::domain::MetricRow;

use super::StoreError;

const COLUMNS: &str = "symbol, date, open, high, low, close, volume, daily_return, ma_7, \
                       week_52_high, week_52_low, volatility_score";

fn read_row(row: &Row<'_>) -> rusqlite::Result<MetricRow> {
    let volume: i64 = row.get(6)?;
    Ok(MetricRow {
        symbol: row.get(0)?,
        date: row.get(1)?,
        open: row.get(2)?,
        high: row.get(3)?,
        low: row.get(4)?,
        close: row.get(5)?,
        volume: volume.max(0) as u64,
        daily_return: row.get(7)?,
        ma_7: row.get(8)?,
        week_52_high: row.get(9)?,
        week_52_low: row.get(10)?,
        volatility_score: row.get(11)?,
    })
}

/// Insert all rows in one transaction. The first conflicting (symbol, date)
/// aborts the whole batch and nothing is written.
pub fn append_rows(conn: &mut Connection, rows: &[MetricRow]) -> Result<usize, StoreError> {
    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(&format!(
            "INSERT INTO metric_rows ({COLUMNS}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)"
        ))?;
        for row in rows {
            stmt.execute(params![
                row.symbol,
                row.date,
                row.open,
                row.high,
                row.low,
                row.close,
                row.volume as i64,
                row.daily_return,
                row.ma_7,
                row.week_52_high,
                row.week_52_low,
                row.volatility_score,
            ])
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(ref f, _)
                    if f.extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY =>
                {
                    StoreError::DuplicateRow {
                        symbol: row.symbol.clone(),
                        date: row.date,
                    }
                }
                other => StoreError::Database(other),
            })?;
        }
    }
    tx.commit()?;
    Ok(rows.len())
}

pub fn get_all_rows(conn: &Connection, symbol: &str) -> Result<Vec<MetricRow>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM metric_rows WHERE symbol = ?1 ORDER BY date ASC"
    ))?;
    let rows = stmt
        .query_map([symbol], read_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rows)
}

/// The newest `limit` rows, returned oldest first.
pub fn get_recent_rows(
    conn: &Connection,
    symbol: &str,
    limit: usize,
) -> Result<Vec<MetricRow>, StoreError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM metric_rows WHERE symbol = ?1 ORDER BY date DESC LIMIT ?2"
    ))?;
    let mut rows = stmt
        .query_map(params![symbol, limit as i64], read_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    rows.reverse();
    Ok(rows)
}

pub fn clear_rows(conn: &Connection, symbol: &str) -> Result<usize, StoreError> {
    Ok(conn.execute("DELETE FROM metric_rows WHERE symbol = ?1", [symbol])?)
}

pub fn row_count(conn: &Connection, symbol: &str) -> Result<usize, StoreError> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM metric_rows WHERE symbol = ?1",
        [symbol],
        |r| r.get(0),
    )?;
    Ok(count as usize)
}

pub fn latest_date(conn: &Connection, symbol: &str) -> Result<Option<NaiveDate>, StoreError> {
    let date: Option<NaiveDate> = conn.query_row(
        "SELECT MAX(date) FROM metric_rows WHERE symbol = ?1",
        [symbol],
        |r| r.get(0),
    )?;
    Ok(date)
}
