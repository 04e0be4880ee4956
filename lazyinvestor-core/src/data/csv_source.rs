//! CSV import: one file per instrument.
//!
//! Layout: `{dir}/{INSTRUMENT}.csv`, with a header row containing at least a
//! date column (`date` or `Date`, `YYYY-MM-DD`) and a close column (`close`
//! or `Close`). Extra columns such as open/high/low/volume are ignored, so a
//! plain daily-history export loads as-is.

use chrono::NaiveDate;
use serde::Deserialize;
use std::path::PathBuf;

use super::provider::{DailyClose, DataError, DataSource, PriceSource};

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(alias = "Date")]
    date: NaiveDate,
    #[serde(alias = "Close")]
    close: f64,
}

/// Price source reading per-instrument CSV files from a directory.
#[derive(Debug, Clone)]
pub struct CsvPriceSource {
    dir: PathBuf,
}

impl CsvPriceSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path to an instrument's file: `{dir}/{INSTRUMENT}.csv`
    pub fn path_for(&self, instrument: &str) -> PathBuf {
        self.dir.join(format!("{instrument}.csv"))
    }

    /// Read every row of an instrument's file, sorted by date.
    pub fn read_all(&self, instrument: &str) -> Result<Vec<DailyClose>, DataError> {
        let path = self.path_for(instrument);
        if !path.exists() {
            return Err(DataError::InstrumentNotFound {
                instrument: instrument.to_string(),
            });
        }

        let malformed = |reason: String| DataError::Malformed {
            path: path.display().to_string(),
            reason,
        };

        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(&path)
            .map_err(|e| malformed(e.to_string()))?;

        let mut closes = Vec::new();
        for record in reader.deserialize::<CsvRow>() {
            let row = record.map_err(|e| match e.position() {
                Some(pos) => malformed(format!("line {}: {e}", pos.line())),
                None => malformed(e.to_string()),
            })?;
            closes.push(DailyClose::new(row.date, row.close));
        }
        closes.sort_by_key(|c| c.date);
        Ok(closes)
    }
}

impl PriceSource for CsvPriceSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn kind(&self) -> DataSource {
        DataSource::CsvImport
    }

    fn daily_closes(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>, DataError> {
        let closes: Vec<DailyClose> = self
            .read_all(instrument)?
            .into_iter()
            .filter(|c| c.date >= start && c.date <= end)
            .collect();
        tracing::debug!(
            instrument,
            rows = closes.len(),
            dir = %self.dir.display(),
            "loaded closes from csv"
        );
        Ok(closes)
    }
}
