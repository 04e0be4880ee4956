//! Simulation configuration and its validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::allocation::{validate_allocations, Allocation};
use super::frequency::InvestmentFrequency;
use crate::error::SimulationError;

/// Immutable input for one DCA simulation run.
///
/// Construct once, validate, and never mutate. Rates are decimals
/// (`0.045` for 4.5%), amounts are in a single currency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub initial_savings: f64,
    pub annual_interest_rate: f64,
    /// Amount invested per period; 0 means savings-only.
    pub periodic_investment: f64,
    /// Calendar days between investments (3.5, 7, 14 or 30).
    pub frequency_days: f64,
    pub start_date: NaiveDate,
    /// Inclusive.
    pub end_date: NaiveDate,
    /// Ordered; fixes the per-instrument iteration order of every output.
    pub allocations: Vec<Allocation>,
}

impl SimulationConfig {
    /// Config with a named frequency preset.
    pub fn new(
        initial_savings: f64,
        annual_interest_rate: f64,
        periodic_investment: f64,
        frequency: InvestmentFrequency,
        start_date: NaiveDate,
        end_date: NaiveDate,
        allocations: Vec<Allocation>,
    ) -> Self {
        Self {
            initial_savings,
            annual_interest_rate,
            periodic_investment,
            frequency_days: frequency.days(),
            start_date,
            end_date,
            allocations,
        }
    }

    /// Savings-only config: no instruments, no purchases.
    pub fn savings_only(
        initial_savings: f64,
        annual_interest_rate: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self::new(
            initial_savings,
            annual_interest_rate,
            0.0,
            InvestmentFrequency::Weekly,
            start_date,
            end_date,
            Vec::new(),
        )
    }

    /// Check every field. Runs before any price data is requested.
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.start_date > self.end_date {
            return Err(SimulationError::config(
                "start_date",
                format!(
                    "start date {} is after end date {}",
                    self.start_date, self.end_date
                ),
            ));
        }
        non_negative_amount("initial_savings", self.initial_savings)?;
        non_negative_amount("periodic_investment", self.periodic_investment)?;

        if !self.annual_interest_rate.is_finite() || self.annual_interest_rate < 0.0 {
            return Err(SimulationError::config(
                "annual_interest_rate",
                format!(
                    "must be a non-negative decimal, got {}",
                    self.annual_interest_rate
                ),
            ));
        }

        if self.frequency().is_none() {
            return Err(SimulationError::config(
                "frequency_days",
                format!(
                    "unsupported frequency of {} days (supported: 3.5, 7, 14, 30)",
                    self.frequency_days
                ),
            ));
        }

        // A savings-only run may leave the portfolio empty.
        if self.allocations.is_empty() && self.periodic_investment == 0.0 {
            return Ok(());
        }
        if self.allocations.is_empty() {
            return Err(SimulationError::InvalidAllocation(
                "allocations cannot be empty when the periodic investment is positive".into(),
            ));
        }
        validate_allocations(&self.allocations)
    }

    pub fn frequency(&self) -> Option<InvestmentFrequency> {
        InvestmentFrequency::from_days(self.frequency_days)
    }

    /// Number of calendar days in `[start_date, end_date]`.
    pub fn day_count(&self) -> usize {
        ((self.end_date - self.start_date).num_days() + 1).max(0) as usize
    }

    pub fn daily_interest_rate(&self) -> f64 {
        self.annual_interest_rate / 365.0
    }

    pub fn is_savings_only(&self) -> bool {
        self.periodic_investment == 0.0
    }

    pub fn instruments(&self) -> impl Iterator<Item = &str> {
        self.allocations.iter().map(|a| a.instrument.as_str())
    }

    /// Deterministic BLAKE3 fingerprint over the canonical JSON form.
    ///
    /// Two configs with identical fields share a fingerprint, so results can
    /// be matched to the inputs that produced them.
    pub fn fingerprint(&self) -> String {
        let json = serde_json::to_string(self).expect("SimulationConfig must serialize");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}

fn non_negative_amount(field: &'static str, value: f64) -> Result<(), SimulationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimulationError::config(
            field,
            format!("must be a non-negative amount, got {value}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample() -> SimulationConfig {
        SimulationConfig::new(
            26_000.0,
            0.045,
            500.0,
            InvestmentFrequency::Weekly,
            date("2025-01-01"),
            date("2025-10-31"),
            vec![Allocation::new("VFV.TO", 1.0)],
        )
    }

    #[test]
    fn valid_config_passes() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn day_count_is_inclusive() {
        let mut cfg = sample();
        cfg.end_date = cfg.start_date;
        assert_eq!(cfg.day_count(), 1);
        assert_eq!(sample().day_count(), 304);
    }

    #[test]
    fn rejects_reversed_dates() {
        let mut cfg = sample();
        cfg.end_date = date("2024-12-31");
        let err = cfg.validate().unwrap_err();
        assert!(matches!(
            err,
            SimulationError::InvalidConfig { field: "start_date", .. }
        ));
    }

    #[test]
    fn rejects_negative_amounts() {
        let mut cfg = sample();
        cfg.initial_savings = -1.0;
        assert!(matches!(
            cfg.validate().unwrap_err(),
            SimulationError::InvalidConfig { field: "initial_savings", .. }
        ));

        let mut cfg = sample();
        cfg.periodic_investment = f64::NAN;
        assert!(matches!(
            cfg.validate().unwrap_err(),
            SimulationError::InvalidConfig { field: "periodic_investment", .. }
        ));
    }

    #[test]
    fn rejects_unsupported_frequency() {
        let mut cfg = sample();
        cfg.frequency_days = 10.0;
        assert!(matches!(
            cfg.validate().unwrap_err(),
            SimulationError::InvalidConfig { field: "frequency_days", .. }
        ));
    }

    #[test]
    fn savings_only_allows_empty_allocations() {
        let cfg = SimulationConfig::savings_only(1000.0, 0.05, date("2025-01-01"), date("2025-01-31"));
        assert!(cfg.validate().is_ok());
        assert!(cfg.is_savings_only());
    }

    #[test]
    fn investing_requires_allocations() {
        let mut cfg = sample();
        cfg.allocations.clear();
        assert!(matches!(
            cfg.validate().unwrap_err(),
            SimulationError::InvalidAllocation(_)
        ));
    }

    #[test]
    fn fingerprint_is_deterministic_and_sensitive() {
        let a = sample();
        let mut b = sample();
        assert_eq!(a.fingerprint(), b.fingerprint());
        b.periodic_investment = 250.0;
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn fingerprint_hashes_the_serialized_config() {
        let cfg = sample();
        let json = serde_json::to_string(&cfg).unwrap();
        assert_eq!(cfg.fingerprint(), blake3::hash(json.as_bytes()).to_hex().to_string());
        assert_ne!(cfg.fingerprint(), blake3::hash(b"").to_hex().to_string());
    }
}
