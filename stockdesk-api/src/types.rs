//! Request and response bodies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use stockdesk_core::{MetricRow, Summary};

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    pub message: String,
    pub version: String,
    pub endpoints: BTreeMap<String, String>,
    pub example_symbols: Vec<String>,
}

impl ServiceInfo {
    pub fn new(example_symbols: Vec<String>) -> Self {
        let endpoints = [
            ("/companies", "Get list of all available companies"),
            ("/data/{symbol}", "Get the most recent days of metric rows for a symbol (?days=N, default 30)"),
            ("/summary/{symbol}", "Get 52-week summary statistics for a symbol"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            message: "StockDesk API".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            endpoints,
            example_symbols,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataQuery {
    pub days: Option<usize>,
}

/// Body of `GET /data/:symbol`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesResponse {
    pub symbol: String,
    pub days_returned: usize,
    pub data: Vec<MetricRow>,
}

/// Body of `GET /summary/:symbol`. Key names are part of the public contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub symbol: String,
    #[serde(rename = "52_week_high")]
    pub week_52_high: f64,
    #[serde(rename = "52_week_low")]
    pub week_52_low: f64,
    pub avg_close: f64,
    pub current_price: f64,
    pub avg_daily_return_percent: f64,
    pub volatility_score: f64,
    pub avg_volume: f64,
    pub total_days: usize,
}

impl SummaryResponse {
    pub fn new(symbol: impl Into<String>, s: &Summary) -> Self {
        Self {
            symbol: symbol.into(),
            week_52_high: s.week_52_high,
            week_52_low: s.week_52_low,
            avg_close: s.avg_close,
            current_price: s.current_price,
            avg_daily_return_percent: s.avg_daily_return_percent,
            volatility_score: s.volatility_score,
            avg_volume: s.avg_volume,
            total_days: s.total_days,
        }
    }
}
