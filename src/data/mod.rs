//! Data module - CSV-backed kline store and the query service

mod loader;
mod payload;
mod query;

pub use loader::{KlineLoader, LoaderError};
pub use payload::{KlinePayload, KlineRecord, KlineSeries, PayloadStatus};
pub use query::KlineQuery;
