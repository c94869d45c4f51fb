//! StockDesk TUI — terminal dashboard over the shared pipeline.
//!
//! Layout:
//! - Left: company directory
//! - Right: metric cards, then four tabs
//!   1. Price (candles with MA-7 overlay)
//!   2. Returns & Volatility
//!   3. Data (last 30 rows)
//!   4. Summary
//!
//! All pipeline calls run on a worker thread; the UI thread only renders and
//! dispatches keys.

pub mod app;
pub mod input;
pub mod persistence;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::{AppState, Tab};
pub use theme::Theme;

#[cfg(test)]
mod test_helpers;
