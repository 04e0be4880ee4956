//! Domain types for the DCA simulator

pub mod allocation;
pub mod config;
pub mod frequency;
pub mod ledger;
pub mod result;

pub use allocation::{validate_allocations, Allocation, InstrumentId, WEIGHT_SUM_TOLERANCE};
pub use config::SimulationConfig;
pub use frequency::InvestmentFrequency;
pub use ledger::{InstrumentDay, LedgerRow};
pub use result::{Holding, InvestmentRecord, PurchaseLeg, SimulationResult, SimulationSummary};
