//! Price source trait and structured error types.
//!
//! The PriceSource trait abstracts over where daily closes come from (CSV
//! files, in-memory fixtures, synthetic walks) so the simulator can be fed
//! and tested without knowing about fetching or caching.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Close price for one trading day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailyClose {
    pub date: NaiveDate,
    pub close: f64,
}

impl DailyClose {
    pub fn new(date: NaiveDate, close: f64) -> Self {
        Self { date, close }
    }
}

/// Errors a price source can report.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("instrument not found: {instrument}")]
    InstrumentNotFound { instrument: String },

    #[error("no price data for '{instrument}' between {start} and {end}")]
    EmptyRange {
        instrument: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("malformed price data in {path}: {reason}")]
    Malformed { path: String, reason: String },
}

/// Where a series came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    CsvImport,
    InMemory,
    Synthetic,
}

/// Supplier of raw daily closes.
///
/// Implementations return trading days only, in ascending date order. They
/// do no gap filling; that is the adapter's job.
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    fn kind(&self) -> DataSource;

    /// Daily closes for `instrument` with dates in `[start, end]`.
    fn daily_closes(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>, DataError>;
}
