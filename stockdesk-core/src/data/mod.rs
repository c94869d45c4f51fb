//! Market-data sources and the company directory

pub mod circuit_breaker;
pub mod csv_import;
pub mod directory;
pub mod provider;
pub mod yahoo;

pub use circuit_breaker::CircuitBreaker;
pub use csv_import::CsvProvider;
pub use directory::{default_companies, CompanyEntry};
pub use provider::{DataError, FetchPeriod, MarketDataProvider, RawBar};
pub use yahoo::{YahooProvider, YahooSettings};
