//! LazyInvestor Runner: scenario files, price loading, comparison and export.
//!
//! This crate builds on `lazyinvestor-core` to provide:
//! - TOML scenario files with a `[data]` source table
//! - Price loading with per-instrument provenance and synthetic fallback
//! - Single and parallel multi-scenario runs
//! - A caller-owned scenario registry with comparison tables
//! - JSON, CSV and Markdown artifacts

pub mod config;
pub mod data_loader;
pub mod export;
pub mod registry;
pub mod runner;

pub use config::{ConfigError, DataSettings, FrequencySpec, ScenarioFile, ScenarioSpec};
pub use data_loader::{load_series, open_source, LoadOptions, LoadedSeries};
pub use registry::{ComparisonRow, ScenarioRegistry};
pub use runner::{run_scenario, run_scenarios, RunError, ScenarioRun, SCHEMA_VERSION};

#[cfg(test)]
mod send_sync_checks {
    use super::*;

    fn assert_send<T: Send>() {}
    fn assert_sync<T: Sync>() {}

    #[test]
    fn config_types_are_send_sync() {
        assert_send::<ScenarioFile>();
        assert_sync::<ScenarioFile>();
        assert_send::<ScenarioSpec>();
        assert_sync::<ScenarioSpec>();
        assert_send::<LoadOptions>();
        assert_sync::<LoadOptions>();
    }

    #[test]
    fn scenario_run_is_send_sync() {
        assert_send::<ScenarioRun>();
        assert_sync::<ScenarioRun>();
    }

    #[test]
    fn registry_is_send_sync() {
        assert_send::<ScenarioRegistry>();
        assert_sync::<ScenarioRegistry>();
        assert_send::<ComparisonRow>();
        assert_sync::<ComparisonRow>();
    }

    #[test]
    fn errors_are_send_sync() {
        assert_send::<RunError>();
        assert_sync::<RunError>();
    }
}
