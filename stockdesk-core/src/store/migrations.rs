//! Schema migrations for the cache database.

use rusqlite::Connection;

use super::StoreError;

pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS migrations (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        )",
        [],
    )?;

    run_migration(conn, "001_companies", CREATE_COMPANIES_TABLE)?;
    run_migration(conn, "002_metric_rows", CREATE_METRIC_ROWS_TABLE)?;
    Ok(())
}

fn run_migration(conn: &Connection, name: &str, sql: &str) -> Result<(), StoreError> {
    let applied: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM migrations WHERE name = ?1)",
        [name],
        |row| row.get(0),
    )?;

    if !applied {
        tracing::info!(migration = name, "applying cache schema migration");
        conn.execute_batch(sql)?;
        conn.execute("INSERT INTO migrations (name) VALUES (?1)", [name])?;
    }
    Ok(())
}

const CREATE_COMPANIES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS companies (
    symbol TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    last_updated TEXT NOT NULL
);
"#;

// Append-only. A second insert for the same (symbol, date) fails.
const CREATE_METRIC_ROWS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS metric_rows (
    symbol TEXT NOT NULL,
    date TEXT NOT NULL,
    open REAL NOT NULL,
    high REAL NOT NULL,
    low REAL NOT NULL,
    close REAL NOT NULL,
    volume INTEGER NOT NULL,
    daily_return REAL NOT NULL,
    ma_7 REAL NOT NULL,
    week_52_high REAL NOT NULL,
    week_52_low REAL NOT NULL,
    volatility_score REAL NOT NULL,
    PRIMARY KEY (symbol, date)
);
"#;
