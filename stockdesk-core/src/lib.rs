//! StockDesk Core — daily bars in, derived metrics out, cached in SQLite.
//!
//! This crate contains everything the presentation layers share:
//! - Domain types (daily bars, metric rows, companies, summaries)
//! - Metrics engine: cleaning, trailing-window columns, summary statistics
//! - Market-data providers (Yahoo Finance, CSV import) behind one trait
//! - SQLite cache store keyed by (symbol, date)
//! - Pipeline orchestrator deciding cache hit vs fetch + derive + persist
//! - CSV export of metric rows
//! - TOML configuration

pub mod config;
pub mod data;
pub mod domain;
pub mod export;
pub mod metrics;
pub mod pipeline;
pub mod store;

pub use config::{AppConfig, ConfigError};
pub use domain::{Company, DailyBar, MetricRow, Summary, VolatilityBand};
pub use pipeline::{Pipeline, PipelineError, SeriesResult, SeriesSource};
pub use store::{CacheStore, StoreError};
