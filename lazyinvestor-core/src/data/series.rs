//! Price series adapter: continuous daily closes over a date range.
//!
//! Raw sources report trading days only. The adapter turns that into one
//! close per calendar day by carrying the last known close forward across
//! weekends and holidays. The first day of the range must be covered by a
//! real close on or before it; a range that starts before the earliest
//! available close is rejected rather than approximated.

use chrono::NaiveDate;
use serde::Serialize;

use super::provider::{DailyClose, PriceSource};
use crate::domain::SimulationConfig;
use crate::error::SimulationError;

/// Gap-free closes for one instrument, one entry per calendar day.
/// Only constructible through [`PriceSeries::forward_fill`], which rejects
/// non-finite and non-positive closes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    instrument: String,
    start: NaiveDate,
    closes: Vec<f64>,
    /// Days whose close was carried forward rather than reported.
    filled_days: usize,
}

impl PriceSeries {
    /// Build a series covering `[start, end]` from raw trading-day closes.
    ///
    /// Input order does not matter; for duplicate dates the last point wins.
    /// Points outside the range are only used to seed the first day.
    pub fn forward_fill(
        instrument: &str,
        raw: &[DailyClose],
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Self, SimulationError> {
        if start > end {
            return Err(SimulationError::config(
                "start_date",
                format!("start date {start} is after end date {end}"),
            ));
        }

        let mut points: Vec<DailyClose> = raw.iter().copied().filter(|p| p.date <= end).collect();
        if let Some(bad) = points.iter().find(|p| !p.close.is_finite() || p.close <= 0.0) {
            return Err(SimulationError::unavailable(
                instrument,
                format!("invalid close {} on {}", bad.close, bad.date),
            ));
        }
        points.sort_by_key(|p| p.date);

        let mut iter = points.into_iter().peekable();
        let mut last_known: Option<f64> = None;
        // Seed from everything on or before the first day.
        while let Some(p) = iter.next_if(|p| p.date <= start) {
            last_known = Some(p.close);
        }

        let Some(mut current) = last_known else {
            let reason = match iter.peek() {
                Some(first) => format!(
                    "earliest available close is {}, after range start {start}",
                    first.date
                ),
                None => format!("no closes between {start} and {end}"),
            };
            return Err(SimulationError::unavailable(instrument, reason));
        };

        let day_count = ((end - start).num_days() + 1) as usize;
        let mut closes = Vec::with_capacity(day_count);
        let mut filled_days = 0;

        for date in start.iter_days().take(day_count) {
            let mut reported = false;
            while let Some(p) = iter.next_if(|p| p.date <= date) {
                current = p.close;
                reported = true;
            }
            if !reported && date != start {
                filled_days += 1;
            }
            closes.push(current);
        }

        Ok(Self {
            instrument: instrument.to_string(),
            start,
            closes,
            filled_days,
        })
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.start + chrono::Duration::days(self.closes.len() as i64 - 1)
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }

    pub fn filled_days(&self) -> usize {
        self.filled_days
    }

    /// Close on the day `offset` days after the start.
    pub fn at_offset(&self, offset: usize) -> Option<f64> {
        self.closes.get(offset).copied()
    }

    /// Close on a calendar date inside the range.
    pub fn price_on(&self, date: NaiveDate) -> Option<f64> {
        let offset = (date - self.start).num_days();
        if offset < 0 {
            return None;
        }
        self.at_offset(offset as usize)
    }

    /// `(date, close)` for every calendar day.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, f64)> + '_ {
        self.start.iter_days().zip(self.closes.iter().copied())
    }
}

/// Fetch and normalize one instrument's series from a source.
pub fn load_price_series(
    source: &dyn PriceSource,
    instrument: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceSeries, SimulationError> {
    let raw = source
        .daily_closes(instrument, start, end)
        .map_err(|e| SimulationError::from_source(instrument, e))?;
    let series = PriceSeries::forward_fill(instrument, &raw, start, end)?;
    tracing::debug!(
        instrument,
        source = source.name(),
        trading_days = raw.len(),
        filled_days = series.filled_days(),
        "normalized price series"
    );
    Ok(series)
}

/// Load one series per allocated instrument, in allocation order.
///
/// Instruments are normalized independently; the first failure aborts.
pub fn load_config_series(
    source: &dyn PriceSource,
    config: &SimulationConfig,
) -> Result<Vec<PriceSeries>, SimulationError> {
    config
        .instruments()
        .map(|instrument| load_price_series(source, instrument, config.start_date, config.end_date))
        .collect()
}
