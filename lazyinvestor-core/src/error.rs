//! Structured error types for the simulation core.
//!
//! Every failure is raised before the day loop starts. A run either completes
//! to its final day or returns one of these; there are no partial ledgers.

use thiserror::Error;

use crate::data::DataError;

/// Errors from config validation, price loading, and simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("invalid config field '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },

    #[error("invalid allocation: {0}")]
    InvalidAllocation(String),

    #[error("price data unavailable for '{instrument}': {reason}")]
    DataUnavailable { instrument: String, reason: String },
}

impl SimulationError {
    pub(crate) fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn unavailable(instrument: &str, reason: impl Into<String>) -> Self {
        Self::DataUnavailable {
            instrument: instrument.to_string(),
            reason: reason.into(),
        }
    }

    /// Wrap a price source failure for one instrument.
    pub fn from_source(instrument: &str, err: DataError) -> Self {
        Self::unavailable(instrument, err.to_string())
    }

    /// True for failures caused by the config itself (nothing was fetched).
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::InvalidAllocation(_)
        )
    }

    /// The instrument a data failure refers to, if any.
    pub fn instrument(&self) -> Option<&str> {
        match self {
            Self::DataUnavailable { instrument, .. } => Some(instrument),
            _ => None,
        }
    }
}
