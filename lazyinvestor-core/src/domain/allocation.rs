//! Target allocation across instruments.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::error::SimulationError;

/// Allowed deviation of the weight sum from 1.0.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Instrument identifier (ticker symbol).
pub type InstrumentId = String;

/// Fraction of each periodic investment directed to one instrument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Allocation {
    pub instrument: InstrumentId,
    pub weight: f64,
}

impl Allocation {
    pub fn new(instrument: impl Into<InstrumentId>, weight: f64) -> Self {
        Self {
            instrument: instrument.into(),
            weight,
        }
    }
}

/// Check an ordered allocation list.
///
/// Weights must be finite and positive, instrument ids non-empty and unique,
/// and the weights must sum to 1.0 within [`WEIGHT_SUM_TOLERANCE`].
pub fn validate_allocations(allocations: &[Allocation]) -> Result<(), SimulationError> {
    let mut seen = HashSet::new();
    for alloc in allocations {
        if alloc.instrument.trim().is_empty() {
            return Err(SimulationError::InvalidAllocation(
                "instrument id must not be empty".into(),
            ));
        }
        if !seen.insert(alloc.instrument.as_str()) {
            return Err(SimulationError::InvalidAllocation(format!(
                "instrument '{}' appears more than once",
                alloc.instrument
            )));
        }
        if !alloc.weight.is_finite() || alloc.weight <= 0.0 {
            return Err(SimulationError::InvalidAllocation(format!(
                "weight for '{}' must be positive, got {}",
                alloc.instrument, alloc.weight
            )));
        }
    }

    let sum: f64 = allocations.iter().map(|a| a.weight).sum();
    if (sum - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
        return Err(SimulationError::InvalidAllocation(format!(
            "weights must sum to 100%, current sum: {:.4}%",
            sum * 100.0
        )));
    }
    Ok(())
}
