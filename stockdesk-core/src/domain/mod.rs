//! Domain types for StockDesk

pub mod bar;
pub mod company;
pub mod metric_row;
pub mod summary;

pub use bar::DailyBar;
pub use company::Company;
pub use metric_row::MetricRow;
pub use summary::{Summary, VolatilityBand};

/// Exchange-suffixed ticker, e.g. `RELIANCE.NS`.
pub type Symbol = String;
