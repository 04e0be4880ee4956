//! TOML scenario files.
//!
//! A file holds an optional `[data]` table selecting the price source and
//! one or more `[[scenario]]` tables:
//!
//! ```toml
//! [data]
//! source = "csv"
//! dir = "prices"
//!
//! [[scenario]]
//! name = "baseline"
//! initial_savings = 26000.0
//! annual_interest_rate = 0.045
//! periodic_investment = 500.0
//! frequency = "weekly"
//! start_date = "2025-01-01"
//! end_date = "2025-10-31"
//!
//! [[scenario.allocation]]
//! instrument = "VFV.TO"
//! weight = 1.0
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

use lazyinvestor_core::{Allocation, InvestmentFrequency, SimulationConfig, SimulationError};

/// Errors from loading or interpreting a scenario file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse scenario file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("scenario file defines no scenarios")]
    NoScenarios,

    #[error("duplicate scenario name '{0}'")]
    DuplicateName(String),

    #[error("scenario '{name}' not found (available: {available})")]
    UnknownScenario { name: String, available: String },

    #[error("scenario '{name}': {reason}")]
    InvalidField { name: String, reason: String },

    #[error("scenario '{name}': {source}")]
    Invalid {
        name: String,
        #[source]
        source: SimulationError,
    },
}

/// Where price data comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum DataSettings {
    /// One `<instrument>.csv` per instrument under `dir`.
    Csv { dir: PathBuf },
    /// Deterministic random walk (demo/offline only).
    Synthetic,
}

impl Default for DataSettings {
    fn default() -> Self {
        DataSettings::Csv {
            dir: PathBuf::from("prices"),
        }
    }
}

/// Frequency as written in a file: a preset label or a day count.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrequencySpec {
    Days(f64),
    Label(String),
}

impl Default for FrequencySpec {
    fn default() -> Self {
        FrequencySpec::Label(InvestmentFrequency::Weekly.label().to_string())
    }
}

impl From<InvestmentFrequency> for FrequencySpec {
    fn from(f: InvestmentFrequency) -> Self {
        FrequencySpec::Label(f.label().to_string())
    }
}

/// One named scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSpec {
    pub name: String,
    pub initial_savings: f64,
    #[serde(default)]
    pub annual_interest_rate: f64,
    #[serde(default)]
    pub periodic_investment: f64,
    #[serde(default)]
    pub frequency: FrequencySpec,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, rename = "allocation")]
    pub allocations: Vec<Allocation>,
}

impl ScenarioSpec {
    /// Convert to a core config and validate it.
    pub fn to_simulation_config(&self) -> Result<SimulationConfig, ConfigError> {
        let frequency_days = match &self.frequency {
            FrequencySpec::Days(days) => *days,
            FrequencySpec::Label(label) => label
                .parse::<InvestmentFrequency>()
                .map_err(|reason| ConfigError::InvalidField {
                    name: self.name.clone(),
                    reason,
                })?
                .days(),
        };

        let config = SimulationConfig {
            initial_savings: self.initial_savings,
            annual_interest_rate: self.annual_interest_rate,
            periodic_investment: self.periodic_investment,
            frequency_days,
            start_date: self.start_date,
            end_date: self.end_date,
            allocations: self.allocations.clone(),
        };
        config.validate().map_err(|source| ConfigError::Invalid {
            name: self.name.clone(),
            source,
        })?;
        Ok(config)
    }
}

/// Parsed scenario file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default)]
    pub data: DataSettings,
    #[serde(default, rename = "scenario")]
    pub scenarios: Vec<ScenarioSpec>,
}

impl ScenarioFile {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let file: ScenarioFile = toml::from_str(text)?;
        file.check_names()?;
        Ok(file)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    fn check_names(&self) -> Result<(), ConfigError> {
        if self.scenarios.is_empty() {
            return Err(ConfigError::NoScenarios);
        }
        let mut seen = HashSet::new();
        for s in &self.scenarios {
            if !seen.insert(s.name.as_str()) {
                return Err(ConfigError::DuplicateName(s.name.clone()));
            }
        }
        Ok(())
    }

    /// Look up a scenario by name.
    pub fn scenario(&self, name: &str) -> Result<&ScenarioSpec, ConfigError> {
        self.scenarios
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| ConfigError::UnknownScenario {
                name: name.to_string(),
                available: self
                    .scenarios
                    .iter()
                    .map(|s| s.name.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            })
    }
}
