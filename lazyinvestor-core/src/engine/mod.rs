//! Simulation engine: investment schedule and the day loop

pub mod schedule;
pub mod simulator;

pub use schedule::{investment_dates, is_investment_offset};
pub use simulator::{run_simulation, simulate, DaySimulation};
