//! StockDesk API — read-mostly HTTP surface over the pipeline.
//!
//! Routes:
//! - `GET /` service banner, endpoint list, example symbols
//! - `GET /companies` company directory
//! - `GET /data/:symbol?days=N` newest N metric rows (default 30)
//! - `GET /summary/:symbol` flattened summary statistics
//!
//! Handlers hand every pipeline call to the blocking pool; the pipeline does
//! network and SQLite I/O synchronously.

pub mod error;
pub mod handlers;
pub mod server;
pub mod types;

pub use error::ApiError;
pub use server::{router, serve, ApiState, ServeError};
pub use types::{DataQuery, SeriesResponse, ServiceInfo, SummaryResponse};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn state_is_send_sync() {
        assert_send::<ApiState>();
        assert_sync::<ApiState>();
    }
}
