//! Simulation output: the ledger plus summary scalars derived from it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::allocation::InstrumentId;
use super::config::SimulationConfig;
use super::ledger::LedgerRow;

/// One instrument's slice of a purchase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseLeg {
    pub instrument: InstrumentId,
    pub amount: f64,
    pub price: f64,
    pub shares: f64,
}

/// A day on which money actually moved from savings into instruments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvestmentRecord {
    pub date: NaiveDate,
    pub total_amount: f64,
    pub legs: Vec<PurchaseLeg>,
}

/// Position in one instrument at the end of the range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub instrument: InstrumentId,
    pub total_shares: f64,
    pub final_price: f64,
    pub market_value: f64,
}

/// Scalars derived from the final ledger row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub initial_savings: f64,
    pub total_interest_earned: f64,
    pub total_invested: f64,
    pub num_investments: usize,
    pub final_investment_value: f64,
    pub final_cash_balance: f64,
    pub final_total_value: f64,
    /// `final_investment_value - total_invested`.
    pub investment_return: f64,
    /// Investment return as a percentage of the amount invested (0 if nothing was invested).
    pub investment_return_rate_percent: f64,
    /// `final_total_value - initial_savings`.
    pub total_return: f64,
    /// Total return as a percentage of the initial savings (0 if there were none).
    pub return_rate_percent: f64,
    pub final_holdings: Vec<Holding>,
}

impl SimulationSummary {
    /// Derive the summary from a complete ledger.
    ///
    /// `rows` must be non-empty; the simulator always emits at least one row.
    pub fn from_ledger(initial_savings: f64, rows: &[LedgerRow]) -> Self {
        let total_invested: f64 = rows.iter().map(|r| r.invested_amount).sum();
        let num_investments = rows.iter().filter(|r| r.invested_amount > 0.0).count();

        let (final_cash, final_investment, final_total, interest, holdings) = match rows.last() {
            Some(last) => (
                last.cash_balance,
                last.investment_value,
                last.total_value,
                last.cumulative_interest,
                last.instruments
                    .iter()
                    .map(|i| Holding {
                        instrument: i.instrument.clone(),
                        total_shares: i.total_shares,
                        final_price: i.price,
                        market_value: i.market_value(),
                    })
                    .collect(),
            ),
            None => (initial_savings, 0.0, initial_savings, 0.0, Vec::new()),
        };

        let investment_return = final_investment - total_invested;
        let total_return = final_total - initial_savings;

        Self {
            initial_savings,
            total_interest_earned: interest,
            total_invested,
            num_investments,
            final_investment_value: final_investment,
            final_cash_balance: final_cash,
            final_total_value: final_total,
            investment_return,
            investment_return_rate_percent: percent_of(investment_return, total_invested),
            total_return,
            return_rate_percent: percent_of(total_return, initial_savings),
            final_holdings: holdings,
        }
    }
}

fn percent_of(value: f64, base: f64) -> f64 {
    if base > 0.0 {
        value / base * 100.0
    } else {
        0.0
    }
}

/// Complete result of one simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub config: SimulationConfig,
    /// BLAKE3 fingerprint of `config`.
    pub config_fingerprint: String,
    pub rows: Vec<LedgerRow>,
    pub investments: Vec<InvestmentRecord>,
    pub summary: SimulationSummary,
}

impl SimulationResult {
    /// Assemble a result from a finished ledger.
    pub fn from_ledger(config: SimulationConfig, rows: Vec<LedgerRow>) -> Self {
        let summary = SimulationSummary::from_ledger(config.initial_savings, &rows);
        let investments = rows
            .iter()
            .filter(|r| r.invested_amount > 0.0)
            .map(|r| InvestmentRecord {
                date: r.date,
                total_amount: r.invested_amount,
                legs: r
                    .instruments
                    .iter()
                    .map(|i| PurchaseLeg {
                        instrument: i.instrument.clone(),
                        amount: i.purchase_amount,
                        price: i.price,
                        shares: i.shares_purchased,
                    })
                    .collect(),
            })
            .collect();

        Self {
            config_fingerprint: config.fingerprint(),
            config,
            rows,
            investments,
            summary,
        }
    }

    /// `(date, total_value)` points for a value-over-time chart.
    pub fn value_series(&self) -> Vec<(NaiveDate, f64)> {
        self.rows.iter().map(|r| (r.date, r.total_value)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ledger::InstrumentDay;

    fn row(day: u32, cash: f64, invested: f64, shares: f64, price: f64) -> LedgerRow {
        let total_value = cash + shares * price;
        LedgerRow {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            opening_cash: cash + invested,
            cash_balance: cash,
            daily_interest: 0.0,
            cumulative_interest: 0.0,
            is_investment_day: invested > 0.0,
            invested_amount: invested,
            instruments: vec![InstrumentDay {
                instrument: "SPY".into(),
                price,
                purchase_amount: invested,
                shares_purchased: if invested > 0.0 { invested / price } else { 0.0 },
                total_shares: shares,
            }],
            investment_value: shares * price,
            total_value,
        }
    }

    #[test]
    fn summary_from_two_purchases() {
        let rows = vec![
            row(1, 500.0, 500.0, 5.0, 100.0),
            row(2, 500.0, 0.0, 5.0, 110.0),
            row(3, 0.0, 500.0, 9.545454545454545, 110.0),
        ];
        let s = SimulationSummary::from_ledger(1000.0, &rows);
        assert_eq!(s.total_invested, 1000.0);
        assert_eq!(s.num_investments, 2);
        assert!((s.final_investment_value - 1050.0).abs() < 1e-9);
        assert!((s.investment_return - 50.0).abs() < 1e-9);
        assert!((s.investment_return_rate_percent - 5.0).abs() < 1e-9);
        assert!((s.return_rate_percent - 5.0).abs() < 1e-9);
        assert_eq!(s.final_holdings.len(), 1);
        assert_eq!(s.final_holdings[0].final_price, 110.0);
    }

    #[test]
    fn zero_initial_savings_gives_zero_rate() {
        let rows = vec![row(1, 0.0, 0.0, 0.0, 100.0)];
        let s = SimulationSummary::from_ledger(0.0, &rows);
        assert_eq!(s.return_rate_percent, 0.0);
        assert_eq!(s.investment_return_rate_percent, 0.0);
    }
}
