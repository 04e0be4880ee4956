//! In-memory price source for fixtures and embedding hosts.

use chrono::NaiveDate;
use std::collections::HashMap;

use super::provider::{DailyClose, DataError, DataSource, PriceSource};

/// Price source backed by a map of pre-loaded closes.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPriceSource {
    closes: HashMap<String, Vec<DailyClose>>,
}

impl InMemoryPriceSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) an instrument's closes. Stored in date order.
    pub fn insert(&mut self, instrument: impl Into<String>, mut closes: Vec<DailyClose>) {
        closes.sort_by_key(|c| c.date);
        self.closes.insert(instrument.into(), closes);
    }

    pub fn with(mut self, instrument: impl Into<String>, closes: Vec<DailyClose>) -> Self {
        self.insert(instrument, closes);
        self
    }

    /// Same close on every calendar day of `[start, end]`.
    pub fn with_constant(
        self,
        instrument: impl Into<String>,
        close: f64,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Self {
        let closes = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|d| DailyClose::new(d, close))
            .collect();
        self.with(instrument, closes)
    }
}

impl PriceSource for InMemoryPriceSource {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn kind(&self) -> DataSource {
        DataSource::InMemory
    }

    fn daily_closes(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>, DataError> {
        let closes = self
            .closes
            .get(instrument)
            .ok_or_else(|| DataError::InstrumentNotFound {
                instrument: instrument.to_string(),
            })?;
        Ok(closes
            .iter()
            .filter(|c| c.date >= start && c.date <= end)
            .copied()
            .collect())
    }
}
