//! The DCA day loop.
//!
//! One forward pass, one iteration per calendar day, four phases per day:
//! 1. Interest accrues on the opening cash (before any purchase)
//! 2. Investment-day check against the schedule
//! 3. Purchase of `min(periodic_investment, cash)` split by weight
//! 4. Mark to market
//!
//! Everything that can fail is checked in [`DaySimulation::new`]; once the
//! loop starts it always runs to the final day.

use crate::data::{load_config_series, PriceSeries, PriceSource};
use crate::domain::{InstrumentDay, LedgerRow, SimulationConfig, SimulationResult};
use crate::engine::schedule::is_investment_offset;
use crate::error::SimulationError;
use chrono::Duration;

/// Streaming simulation: yields one [`LedgerRow`] per calendar day.
#[derive(Debug, Clone)]
pub struct DaySimulation<'a> {
    config: &'a SimulationConfig,
    /// Closes per instrument (allocation order), one per day of the range.
    prices: Vec<Vec<f64>>,
    daily_rate: f64,
    day: usize,
    day_count: usize,
    cash: f64,
    cumulative_interest: f64,
    total_shares: Vec<f64>,
}

impl<'a> DaySimulation<'a> {
    /// Validate the config and line up one series per allocated instrument.
    ///
    /// `series` may be in any order and may cover more than the range; every
    /// allocated instrument needs a series that covers every day of it.
    pub fn new(
        config: &'a SimulationConfig,
        series: &[PriceSeries],
    ) -> Result<Self, SimulationError> {
        config.validate()?;
        let day_count = config.day_count();

        let prices = config
            .instruments()
            .map(|instrument| range_closes(config, series, instrument, day_count))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            total_shares: vec![0.0; prices.len()],
            prices,
            daily_rate: config.daily_interest_rate(),
            day: 0,
            day_count,
            cash: config.initial_savings,
            cumulative_interest: 0.0,
        })
    }

    pub fn day_count(&self) -> usize {
        self.day_count
    }

    fn step(&mut self) -> LedgerRow {
        let offset = self.day;
        let date = self.config.start_date + Duration::days(offset as i64);

        // Phase 1: interest on the opening balance
        let opening_cash = self.cash;
        let daily_interest = opening_cash * self.daily_rate;
        self.cash += daily_interest;
        self.cumulative_interest += daily_interest;

        // Phase 2: schedule
        let is_investment_day = !self.config.is_savings_only()
            && is_investment_offset(offset, self.config.frequency_days);

        // Phase 3: purchase, capped at available cash
        let invested_amount = if is_investment_day {
            self.config.periodic_investment.min(self.cash)
        } else {
            0.0
        };

        let mut instruments = Vec::with_capacity(self.prices.len());
        let mut investment_value = 0.0;
        for (i, alloc) in self.config.allocations.iter().enumerate() {
            let price = self.prices[i][offset];
            let purchase_amount = invested_amount * alloc.weight;
            let shares_purchased = purchase_amount / price;
            self.total_shares[i] += shares_purchased;

            let day = InstrumentDay {
                instrument: alloc.instrument.clone(),
                price,
                purchase_amount,
                shares_purchased,
                total_shares: self.total_shares[i],
            };
            // Phase 4: mark to market
            investment_value += day.market_value();
            instruments.push(day);
        }
        self.cash -= invested_amount;

        self.day += 1;
        LedgerRow {
            date,
            opening_cash,
            cash_balance: self.cash,
            daily_interest,
            cumulative_interest: self.cumulative_interest,
            is_investment_day,
            invested_amount,
            instruments,
            investment_value,
            total_value: self.cash + investment_value,
        }
    }
}

impl Iterator for DaySimulation<'_> {
    type Item = LedgerRow;

    fn next(&mut self) -> Option<LedgerRow> {
        if self.day >= self.day_count {
            return None;
        }
        Some(self.step())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.day_count - self.day;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for DaySimulation<'_> {}

/// Closes for `instrument` over the config's range, one per day.
fn range_closes(
    config: &SimulationConfig,
    series: &[PriceSeries],
    instrument: &str,
    day_count: usize,
) -> Result<Vec<f64>, SimulationError> {
    let s = series
        .iter()
        .find(|s| s.instrument() == instrument)
        .ok_or_else(|| SimulationError::unavailable(instrument, "no price series supplied"))?;

    config
        .start_date
        .iter_days()
        .take(day_count)
        .map(|date| {
            s.price_on(date).ok_or_else(|| {
                SimulationError::unavailable(
                    instrument,
                    format!(
                        "series covers {} to {}, missing {date}",
                        s.start(),
                        s.end()
                    ),
                )
            })
        })
        .collect()
}

/// Run the full day loop and collect the result.
pub fn simulate(
    config: &SimulationConfig,
    series: &[PriceSeries],
) -> Result<SimulationResult, SimulationError> {
    let sim = DaySimulation::new(config, series)?;
    tracing::debug!(
        days = sim.day_count(),
        instruments = config.allocations.len(),
        periodic = config.periodic_investment,
        frequency_days = config.frequency_days,
        "starting simulation"
    );

    let rows: Vec<LedgerRow> = sim.collect();
    let result = SimulationResult::from_ledger(config.clone(), rows);

    tracing::debug!(
        final_total_value = result.summary.final_total_value,
        total_invested = result.summary.total_invested,
        investments = result.summary.num_investments,
        "simulation complete"
    );
    Ok(result)
}

/// Validate, load series from `source`, then simulate.
///
/// The source is not queried unless the config is valid.
pub fn run_simulation(
    config: &SimulationConfig,
    source: &dyn PriceSource,
) -> Result<SimulationResult, SimulationError> {
    config.validate()?;
    let series = load_config_series(source, config)?;
    simulate(config, &series)
}
