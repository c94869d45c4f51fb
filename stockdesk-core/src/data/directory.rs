//! Company directory — the fixed list of tracked equities.
//!
//! The default list covers fifteen NSE large caps. A deployment can replace it
//! with `[[companies]]` entries in the config file, or with a standalone TOML
//! file of the same shape.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// A directory entry before it is stamped with a last-updated time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyEntry {
    pub symbol: String,
    pub name: String,
}

impl CompanyEntry {
    pub fn new(symbol: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DirectoryFile {
    companies: Vec<CompanyEntry>,
}

/// The built-in NSE directory.
pub fn default_companies() -> Vec<CompanyEntry> {
    [
        ("RELIANCE.NS", "Reliance Industries"),
        ("TCS.NS", "Tata Consultancy Services"),
        ("HDFCBANK.NS", "HDFC Bank"),
        ("INFY.NS", "Infosys"),
        ("ICICIBANK.NS", "ICICI Bank"),
        ("HINDUNILVR.NS", "Hindustan Unilever"),
        ("ITC.NS", "ITC"),
        ("SBIN.NS", "State Bank of India"),
        ("BHARTIARTL.NS", "Bharti Airtel"),
        ("KOTAKBANK.NS", "Kotak Mahindra Bank"),
        ("LT.NS", "Larsen & Toubro"),
        ("AXISBANK.NS", "Axis Bank"),
        ("WIPRO.NS", "Wipro"),
        ("MARUTI.NS", "Maruti Suzuki"),
        ("TITAN.NS", "Titan Company"),
    ]
    .into_iter()
    .map(|(symbol, name)| CompanyEntry::new(symbol, name))
    .collect()
}

/// Parse a directory from TOML (`[[companies]]` tables).
pub fn from_toml(content: &str) -> Result<Vec<CompanyEntry>, toml::de::Error> {
    toml::from_str::<DirectoryFile>(content).map(|f| f.companies)
}

/// Load a directory from a TOML file.
pub fn from_file(path: &Path) -> Result<Vec<CompanyEntry>, String> {
    let content =
        std::fs::read_to_string(path).map_err(|e| format!("read directory file: {e}"))?;
    from_toml(&content).map_err(|e| format!("parse directory TOML: {e}"))
}

/// Serialize a directory to TOML.
pub fn to_toml(companies: &[CompanyEntry]) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&DirectoryFile {
        companies: companies.to_vec(),
    })
}
