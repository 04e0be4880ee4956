//! Named store of finished scenarios.
//!
//! The registry is owned by the caller; nothing in the core reaches into
//! it. Names are unique and iteration is in name order.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::runner::ScenarioRun;

/// Scenario name → finished run.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRegistry {
    runs: BTreeMap<String, ScenarioRun>,
}

/// One line of a side-by-side comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonRow {
    pub name: String,
    pub initial_savings: f64,
    pub periodic_investment: f64,
    pub frequency_days: f64,
    pub total_invested: f64,
    pub num_investments: usize,
    pub total_interest_earned: f64,
    pub final_cash_balance: f64,
    pub final_investment_value: f64,
    pub final_total_value: f64,
    pub investment_return: f64,
    pub total_return: f64,
    pub return_rate_percent: f64,
    pub has_synthetic: bool,
}

impl ComparisonRow {
    fn from_run(run: &ScenarioRun) -> Self {
        let s = &run.result.summary;
        let c = &run.result.config;
        Self {
            name: run.name.clone(),
            initial_savings: s.initial_savings,
            periodic_investment: c.periodic_investment,
            frequency_days: c.frequency_days,
            total_invested: s.total_invested,
            num_investments: s.num_investments,
            total_interest_earned: s.total_interest_earned,
            final_cash_balance: s.final_cash_balance,
            final_investment_value: s.final_investment_value,
            final_total_value: s.final_total_value,
            investment_return: s.investment_return,
            total_return: s.total_return,
            return_rate_percent: s.return_rate_percent,
            has_synthetic: run.has_synthetic,
        }
    }
}

impl ScenarioRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a run under its name, returning any run it replaced.
    pub fn insert(&mut self, run: ScenarioRun) -> Option<ScenarioRun> {
        let replaced = self.runs.insert(run.name.clone(), run);
        if let Some(old) = &replaced {
            tracing::debug!(scenario = %old.name, "replaced scenario in registry");
        }
        replaced
    }

    pub fn get(&self, name: &str) -> Option<&ScenarioRun> {
        self.runs.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<ScenarioRun> {
        self.runs.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.runs.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ScenarioRun> {
        self.runs.values()
    }

    /// One comparison row per scenario, in name order.
    pub fn comparison(&self) -> Vec<ComparisonRow> {
        self.runs.values().map(ComparisonRow::from_run).collect()
    }

    /// Scenario with the highest final total value.
    pub fn best_by_total_value(&self) -> Option<&ScenarioRun> {
        self.runs.values().max_by(|a, b| {
            a.result
                .summary
                .final_total_value
                .total_cmp(&b.result.summary.final_total_value)
        })
    }
}

impl FromIterator<ScenarioRun> for ScenarioRegistry {
    fn from_iter<I: IntoIterator<Item = ScenarioRun>>(iter: I) -> Self {
        let mut registry = Self::new();
        for run in iter {
            registry.insert(run);
        }
        registry
    }
}

impl Extend<ScenarioRun> for ScenarioRegistry {
    fn extend<I: IntoIterator<Item = ScenarioRun>>(&mut self, iter: I) {
        for run in iter {
            self.insert(run);
        }
    }
}
