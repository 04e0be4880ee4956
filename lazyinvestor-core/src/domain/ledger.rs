//! Ledger rows: one complete state snapshot per simulated calendar day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::allocation::InstrumentId;

/// Per-instrument state for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstrumentDay {
    pub instrument: InstrumentId,
    /// Close for the day (forward-filled on non-trading days).
    pub price: f64,
    /// Currency invested into this instrument today; 0 off investment days.
    pub purchase_amount: f64,
    pub shares_purchased: f64,
    /// Running total, never decreases.
    pub total_shares: f64,
}

impl InstrumentDay {
    pub fn market_value(&self) -> f64 {
        self.total_shares * self.price
    }
}

/// One simulated calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRow {
    pub date: NaiveDate,
    /// Cash at the start of the day, before interest.
    pub opening_cash: f64,
    /// Cash at the end of the day, after interest and any purchase.
    pub cash_balance: f64,
    pub daily_interest: f64,
    pub cumulative_interest: f64,
    pub is_investment_day: bool,
    /// Sum of the per-instrument purchase amounts.
    pub invested_amount: f64,
    /// In allocation order.
    pub instruments: Vec<InstrumentDay>,
    pub investment_value: f64,
    pub total_value: f64,
}

impl LedgerRow {
    /// Look up an instrument's state by id.
    pub fn instrument(&self, id: &str) -> Option<&InstrumentDay> {
        self.instruments.iter().find(|i| i.instrument == id)
    }

    /// Cash available for purchases on this day (opening cash plus interest).
    pub fn cash_before_purchase(&self) -> f64 {
        self.opening_cash + self.daily_interest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> LedgerRow {
        LedgerRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            opening_cash: 1000.0,
            cash_balance: 500.5,
            daily_interest: 0.5,
            cumulative_interest: 0.5,
            is_investment_day: true,
            invested_amount: 500.0,
            instruments: vec![InstrumentDay {
                instrument: "SPY".into(),
                price: 100.0,
                purchase_amount: 500.0,
                shares_purchased: 5.0,
                total_shares: 5.0,
            }],
            investment_value: 500.0,
            total_value: 1000.5,
        }
    }

    #[test]
    fn instrument_lookup() {
        let r = row();
        assert_eq!(r.instrument("SPY").map(|i| i.total_shares), Some(5.0));
        assert!(r.instrument("QQQ").is_none());
    }

    #[test]
    fn cash_before_purchase_includes_interest() {
        assert_eq!(row().cash_before_purchase(), 1000.5);
    }
}
