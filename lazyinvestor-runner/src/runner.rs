//! Scenario runner: wires config, price loading and the simulator.
//!
//! Two entry points:
//! - `run_scenario()`: one named scenario against a price source. Used by CLI.
//! - `run_scenarios()`: many scenarios, optionally in parallel with rayon.
//!   Each scenario owns its own ledger; results come back in input order.

use std::collections::BTreeMap;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use lazyinvestor_core::data::{DataSource, PriceSource};
use lazyinvestor_core::{simulate, SimulationError, SimulationResult};

use crate::config::{ConfigError, ScenarioSpec};
use crate::data_loader::{load_series, LoadOptions};

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("simulation error: {0}")]
    Simulation(#[from] SimulationError),
}

/// Current schema version for persisted artifacts.
pub const SCHEMA_VERSION: u32 = 1;

/// A finished scenario with data provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioRun {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub name: String,
    pub result: SimulationResult,
    pub sources: BTreeMap<String, DataSource>,
    pub dataset_hash: String,
    pub has_synthetic: bool,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

/// Run one scenario: validate, load series, simulate.
///
/// Config errors are reported before the source is touched.
pub fn run_scenario(
    spec: &ScenarioSpec,
    source: &dyn PriceSource,
    opts: &LoadOptions,
) -> Result<ScenarioRun, RunError> {
    let started = Instant::now();
    let config = spec.to_simulation_config()?;
    let loaded = load_series(&config, source, opts)?;
    let result = simulate(&config, &loaded.series)?;

    let s = &result.summary;
    tracing::info!(
        scenario = %spec.name,
        days = result.rows.len(),
        investments = s.num_investments,
        total_invested = s.total_invested,
        final_total_value = s.final_total_value,
        synthetic = loaded.has_synthetic,
        elapsed_ms = started.elapsed().as_millis() as u64,
        "scenario complete"
    );

    Ok(ScenarioRun {
        schema_version: SCHEMA_VERSION,
        name: spec.name.clone(),
        result,
        sources: loaded.sources,
        dataset_hash: loaded.dataset_hash,
        has_synthetic: loaded.has_synthetic,
    })
}

/// Run every scenario, returning `(name, outcome)` pairs in input order.
///
/// One failing scenario does not stop the others.
pub fn run_scenarios(
    specs: &[ScenarioSpec],
    source: &dyn PriceSource,
    opts: &LoadOptions,
    parallel: bool,
) -> Vec<(String, Result<ScenarioRun, RunError>)> {
    let run = |spec: &ScenarioSpec| (spec.name.clone(), run_scenario(spec, source, opts));
    let outcomes: Vec<_> = if parallel {
        specs.par_iter().map(run).collect()
    } else {
        specs.iter().map(run).collect()
    };

    let failed = outcomes.iter().filter(|(_, r)| r.is_err()).count();
    if failed > 0 {
        tracing::warn!(failed, total = specs.len(), "some scenarios failed");
    }
    outcomes
}
