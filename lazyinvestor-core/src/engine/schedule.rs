//! Investment-day scheduling.
//!
//! The k-th investment after day 0 lands on the first calendar day whose
//! offset from the start is at least `k * frequency_days`. Integer
//! frequencies reduce to `offset % f == 0`; 3.5 days alternates 4- and
//! 3-day gaps (0, 4, 7, 11, 14, ...) without drifting.

use chrono::NaiveDate;

/// Slack for comparing day offsets against multiples of the frequency.
const OFFSET_EPSILON: f64 = 1e-9;

/// Number of scheduled investments with offset <= `offset`, minus one.
fn periods_elapsed(offset: f64, frequency_days: f64) -> f64 {
    ((offset + OFFSET_EPSILON) / frequency_days).floor()
}

/// True if the day `offset` days after the start is an investment day.
///
/// Day 0 always is. `frequency_days` must be positive.
pub fn is_investment_offset(offset: usize, frequency_days: f64) -> bool {
    if offset == 0 {
        return true;
    }
    periods_elapsed(offset as f64, frequency_days)
        > periods_elapsed((offset - 1) as f64, frequency_days)
}

/// Every investment date in `[start, end]`.
pub fn investment_dates(start: NaiveDate, end: NaiveDate, frequency_days: f64) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .enumerate()
        .filter(|(offset, _)| is_investment_offset(*offset, frequency_days))
        .map(|(_, date)| date)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offsets(frequency_days: f64, days: usize) -> Vec<usize> {
        (0..days)
            .filter(|o| is_investment_offset(*o, frequency_days))
            .collect()
    }

    #[test]
    fn weekly_is_every_seventh_day() {
        assert_eq!(offsets(7.0, 22), vec![0, 7, 14, 21]);
    }

    #[test]
    fn monthly_is_every_thirtieth_day() {
        assert_eq!(offsets(30.0, 91), vec![0, 30, 60, 90]);
    }

    #[test]
    fn twice_a_week_alternates_four_and_three() {
        let o = offsets(3.5, 29);
        assert_eq!(o, vec![0, 4, 7, 11, 14, 18, 21, 25, 28]);
        let gaps: Vec<usize> = o.windows(2).map(|w| w[1] - w[0]).collect();
        assert!(gaps.chunks(2).all(|pair| pair == [4, 3]));
    }

    #[test]
    fn twice_a_week_does_not_drift_over_years() {
        // 2 per week over 520 weeks, plus day 0
        assert_eq!(offsets(3.5, 7 * 520).len(), 1040);
    }

    #[test]
    fn dates_within_range() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 1, 8).unwrap();
        assert_eq!(
            investment_dates(start, end, 7.0),
            vec![start, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap()]
        );
    }
}
