//! Company directory table.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

use crate::domain::Company;

use super::StoreError;

pub fn upsert_company(
    conn: &Connection,
    symbol: &str,
    name: &str,
    now: DateTime<Utc>,
) -> Result<(), StoreError> {
    conn.execute(
        "INSERT OR REPLACE INTO companies (symbol, name, last_updated) VALUES (?1, ?2, ?3)",
        params![symbol, name, now],
    )?;
    Ok(())
}

pub fn list_companies(conn: &Connection) -> Result<Vec<Company>, StoreError> {
    let mut stmt =
        conn.prepare("SELECT symbol, name, last_updated FROM companies ORDER BY rowid")?;
    let companies = stmt
        .query_map([], |row| {
            Ok(Company {
                symbol: row.get(0)?,
                name: row.get(1)?,
                last_updated: row.get(2)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(companies)
}
