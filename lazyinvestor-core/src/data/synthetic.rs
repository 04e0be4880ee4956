//! Synthetic closes for demos and offline runs.
//!
//! Produces a weekday-only random walk anchored at a fixed epoch: the close
//! on the day before 2000-01-03 is 100.0 and every weekday after that moves
//! by a return drawn from an RNG seeded with `blake3(instrument, date)`. A
//! given instrument therefore has one price history, whatever range is
//! requested. Results built on this source are clearly fake.

use chrono::{Datelike, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{DailyClose, DataError, DataSource, PriceSource};

/// First day of the walk (a Monday).
const EPOCH: (i32, u32, u32) = (2000, 1, 3);

fn epoch() -> NaiveDate {
    let (y, m, d) = EPOCH;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Deterministic random-walk price source.
#[derive(Debug, Clone)]
pub struct SyntheticPriceSource {
    base_price: f64,
    max_daily_move: f64,
}

impl SyntheticPriceSource {
    pub fn new() -> Self {
        Self {
            base_price: 100.0,
            max_daily_move: 0.03,
        }
    }

    /// Return for `instrument` on `date`, independent of any other day.
    fn daily_return(&self, instrument: &str, date: NaiveDate) -> f64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(instrument.as_bytes());
        hasher.update(&[0]);
        hasher.update(date.to_string().as_bytes());
        let seed: [u8; 32] = *hasher.finalize().as_bytes();
        StdRng::from_seed(seed).gen_range(-self.max_daily_move..self.max_daily_move)
    }
}

impl Default for SyntheticPriceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PriceSource for SyntheticPriceSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn kind(&self) -> DataSource {
        DataSource::Synthetic
    }

    fn daily_closes(
        &self,
        instrument: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DailyClose>, DataError> {
        let anchor = epoch();
        let mut closes = Vec::new();

        // Before the epoch: walk backwards from the base close.
        if start < anchor {
            let mut price = self.base_price;
            let mut later: Option<NaiveDate> = None;
            let mut date = anchor.pred_opt();
            while let Some(d) = date.filter(|d| *d >= start) {
                if !is_weekend(d) {
                    if let Some(next) = later {
                        price /= 1.0 + self.daily_return(instrument, next);
                    }
                    if d <= end {
                        closes.push(DailyClose::new(d, price));
                    }
                    later = Some(d);
                }
                date = d.pred_opt();
            }
            closes.reverse();
        }

        // From the epoch on: walk forwards.
        if end >= anchor {
            let mut price = self.base_price;
            for d in anchor.iter_days().take_while(|d| *d <= end) {
                if is_weekend(d) {
                    continue;
                }
                price *= 1.0 + self.daily_return(instrument, d);
                if d >= start {
                    closes.push(DailyClose::new(d, price));
                }
            }
        }

        if closes.is_empty() {
            return Err(DataError::EmptyRange {
                instrument: instrument.to_string(),
                start,
                end,
            });
        }
        Ok(closes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    #[test]
    fn skips_weekends() {
        let closes = SyntheticPriceSource::new()
            .daily_closes("SPY", d(1), d(14))
            .unwrap();
        // Jan 1-14 2024 has 10 weekdays
        assert_eq!(closes.len(), 10);
        assert!(closes
            .iter()
            .all(|c| !matches!(c.date.weekday(), Weekday::Sat | Weekday::Sun)));
    }

    #[test]
    fn same_instrument_same_path() {
        let source = SyntheticPriceSource::new();
        let a = source.daily_closes("SPY", d(1), d(31)).unwrap();
        let b = source.daily_closes("SPY", d(1), d(31)).unwrap();
        let c = source.daily_closes("QQQ", d(1), d(31)).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn weekend_only_range_is_empty() {
        // 2024-01-06 and 07 are Saturday and Sunday
        let result = SyntheticPriceSource::new().daily_closes("SPY", d(6), d(7));
        assert!(matches!(result, Err(DataError::EmptyRange { .. })));
    }

    #[test]
    fn prices_stay_positive() {
        let closes = SyntheticPriceSource::new()
            .daily_closes("SPY", d(1), NaiveDate::from_ymd_opt(2030, 1, 1).unwrap())
            .unwrap();
        assert!(closes.iter().all(|c| c.close > 0.0));
    }

    fn assert_same_on_shared_dates(a: &[DailyClose], b: &[DailyClose]) {
        let mut shared = 0;
        for close in b {
            if let Some(other) = a.iter().find(|c| c.date == close.date) {
                assert_eq!(other.close, close.close, "differs on {}", close.date);
                shared += 1;
            }
        }
        assert!(shared > 0);
    }

    #[test]
    fn overlapping_ranges_agree_on_shared_dates() {
        let source = SyntheticPriceSource::new();
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let long = source.daily_closes("SPY", ymd(2025, 1, 1), ymd(2025, 3, 31)).unwrap();
        let late = source.daily_closes("SPY", ymd(2025, 2, 3), ymd(2025, 3, 31)).unwrap();
        assert_same_on_shared_dates(&long, &late);

        let on_march_3 = |closes: &[DailyClose]| {
            closes.iter().find(|c| c.date == ymd(2025, 3, 3)).map(|c| c.close)
        };
        assert_eq!(on_march_3(&long), on_march_3(&late));
    }

    #[test]
    fn ranges_straddling_the_epoch_agree() {
        let source = SyntheticPriceSource::new();
        let ymd = |y, m, d| NaiveDate::from_ymd_opt(y, m, d).unwrap();
        let before = source.daily_closes("QQQ", ymd(1999, 12, 1), ymd(2000, 1, 31)).unwrap();
        let after = source.daily_closes("QQQ", ymd(2000, 1, 3), ymd(2000, 1, 31)).unwrap();
        let inside = source.daily_closes("QQQ", ymd(1999, 12, 15), ymd(1999, 12, 31)).unwrap();
        assert_same_on_shared_dates(&before, &after);
        assert_same_on_shared_dates(&before, &inside);
    }
}
