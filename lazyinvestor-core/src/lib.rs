//! LazyInvestor Core: DCA simulation engine.
//!
//! This crate contains the pure simulation core:
//! - Domain types (config, allocations, frequencies, ledger rows, results)
//! - Price sources (CSV import, in-memory, synthetic) behind one trait
//! - Price series adapter that forward-fills non-trading days
//! - Day-by-day simulator: interest accrual, scheduling, weighted purchases
//!
//! The simulator performs no I/O. Given the same config and price series it
//! produces bit-identical results.

pub mod data;
pub mod domain;
pub mod engine;
pub mod error;

pub use data::{DailyClose, DataError, PriceSeries, PriceSource};
pub use domain::{
    Allocation, InstrumentDay, InvestmentFrequency, LedgerRow, SimulationConfig,
    SimulationResult, SimulationSummary,
};
pub use engine::{run_simulation, simulate, DaySimulation};
pub use error::SimulationError;
