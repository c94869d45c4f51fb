//! SQLite-backed cache of companies and derived metric rows.
//!
//! A single connection sits behind a mutex; every public method takes the
//! lock for the duration of one statement or one transaction. Rows are
//! append-only per (symbol, date) and only ever removed as a whole symbol.

mod companies;
mod migrations;
mod rows;

use std::path::Path;

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use rusqlite::Connection;
use thiserror::Error;

use crate::domain::{Company, MetricRow};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("row already cached for {symbol} on {date}")]
    DuplicateRow { symbol: String, date: NaiveDate },

    #[error("cannot create database directory: {0}")]
    Io(#[from] std::io::Error),
}

pub struct CacheStore {
    conn: Mutex<Connection>,
}

impl CacheStore {
    /// Open (or create) the cache database at `path` and apply migrations.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(path)?;
        // journal_mode returns a row, so it cannot go through execute.
        conn.query_row("PRAGMA journal_mode = WAL", [], |_| Ok(()))?;
        conn.execute_batch("PRAGMA busy_timeout = 5000;")?;
        tracing::debug!(path = %path.display(), "opened cache database");
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self, StoreError> {
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Insert or rename a directory entry, stamping it with the current time.
    pub fn upsert_company(&self, symbol: &str, name: &str) -> Result<(), StoreError> {
        companies::upsert_company(&self.conn.lock(), symbol, name, Utc::now())
    }

    /// All companies, in insertion order.
    pub fn list_companies(&self) -> Result<Vec<Company>, StoreError> {
        companies::list_companies(&self.conn.lock())
    }

    /// Append rows atomically. Fails with [`StoreError::DuplicateRow`] if any
    /// (symbol, date) is already present, leaving the store unchanged.
    pub fn append_rows(&self, rows: &[MetricRow]) -> Result<usize, StoreError> {
        if rows.is_empty() {
            return Ok(0);
        }
        let written = rows::append_rows(&mut self.conn.lock(), rows)?;
        tracing::debug!(symbol = %rows[0].symbol, written, "appended metric rows");
        Ok(written)
    }

    /// Every cached row for `symbol`, ascending by date.
    pub fn get_all_rows(&self, symbol: &str) -> Result<Vec<MetricRow>, StoreError> {
        rows::get_all_rows(&self.conn.lock(), symbol)
    }

    /// The newest `limit` rows for `symbol`, ascending by date.
    pub fn get_recent_rows(&self, symbol: &str, limit: usize) -> Result<Vec<MetricRow>, StoreError> {
        rows::get_recent_rows(&self.conn.lock(), symbol, limit)
    }

    /// Delete every row for `symbol`; returns how many were removed.
    pub fn clear_rows(&self, symbol: &str) -> Result<usize, StoreError> {
        rows::clear_rows(&self.conn.lock(), symbol)
    }

    pub fn row_count(&self, symbol: &str) -> Result<usize, StoreError> {
        rows::row_count(&self.conn.lock(), symbol)
    }

    pub fn latest_date(&self, symbol: &str) -> Result<Option<NaiveDate>, StoreError> {
        rows::latest_date(&self.conn.lock(), symbol)
    }
}
