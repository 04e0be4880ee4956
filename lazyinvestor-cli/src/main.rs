//! LazyInvestor CLI: run and compare dollar-cost-averaging scenarios.
//!
//! Commands:
//! - `run`: simulate one scenario from a TOML file or inline flags
//! - `compare`: simulate every scenario in a file in parallel and tabulate
//! - `frequencies`: list the supported investment frequency presets
//! - `schedule`: preview the investment dates for a range and frequency

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use lazyinvestor_core::engine::investment_dates;
use lazyinvestor_core::{Allocation, InvestmentFrequency};
use lazyinvestor_runner::export::{
    format_money, generate_comparison, save_artifacts, save_comparison,
};
use lazyinvestor_runner::{
    open_source, run_scenario, run_scenarios, DataSettings, FrequencySpec, LoadOptions,
    ScenarioFile, ScenarioRegistry, ScenarioRun, ScenarioSpec,
};

#[derive(Parser)]
#[command(
    name = "lazyinvestor",
    about = "LazyInvestor: savings interest plus periodic ETF purchases, simulated day by day"
)]
struct Cli {
    /// Debug-level logging (overridden by RUST_LOG).
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Where prices come from, shared by `run` and `compare`.
#[derive(clap::Args)]
struct DataArgs {
    /// Directory of `<INSTRUMENT>.csv` files. Overrides the file's [data] table.
    #[arg(long)]
    prices_dir: Option<PathBuf>,

    /// Use synthetic prices for instruments with no data (results are tagged).
    #[arg(long, default_value_t = false)]
    synthetic: bool,

    /// Output directory for artifacts.
    #[arg(long, default_value = "results")]
    output_dir: PathBuf,

    /// Print results only; write no artifacts.
    #[arg(long, default_value_t = false)]
    no_save: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate one scenario from a TOML file or inline flags.
    Run {
        /// Path to a TOML scenario file.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Scenario name within the file (required if it has several).
        #[arg(long, requires = "config")]
        scenario: Option<String>,

        /// Initial savings balance.
        #[arg(long, default_value_t = 26_000.0)]
        initial: f64,

        /// Annual savings interest rate in percent (4.5 = 4.5%).
        #[arg(long, default_value_t = 4.5)]
        interest_pct: f64,

        /// Amount invested on each investment day.
        #[arg(long, default_value_t = 500.0)]
        amount: f64,

        /// twice-a-week, weekly, biweekly, monthly (or 3.5, 7, 14, 30).
        #[arg(long, default_value = "weekly")]
        frequency: String,

        /// Start date (YYYY-MM-DD).
        #[arg(long, default_value = "2025-01-01")]
        start: String,

        /// End date (YYYY-MM-DD), inclusive.
        #[arg(long, default_value = "2025-10-31")]
        end: String,

        /// Allocation as INSTRUMENT=WEIGHT (0.4 or 40%); repeatable.
        #[arg(long = "allocation", short = 'a', default_value = "VFV.TO=100%")]
        allocations: Vec<String>,

        #[command(flatten)]
        data: DataArgs,
    },
    /// Simulate every scenario in a file and print a comparison.
    Compare {
        /// Path to a TOML scenario file.
        #[arg(long)]
        config: PathBuf,

        /// Run scenarios one at a time instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        #[command(flatten)]
        data: DataArgs,
    },
    /// List supported investment frequencies.
    Frequencies,
    /// Preview investment dates for a range and frequency.
    Schedule {
        #[arg(long)]
        start: String,
        #[arg(long)]
        end: String,
        #[arg(long, default_value = "weekly")]
        frequency: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Run {
            config,
            scenario,
            initial,
            interest_pct,
            amount,
            frequency,
            start,
            end,
            allocations,
            data,
        } => {
            let (spec, settings) = match config {
                Some(path) => scenario_from_file(&path, scenario.as_deref())?,
                None => (
                    ScenarioSpec {
                        name: "cli".into(),
                        initial_savings: initial,
                        annual_interest_rate: interest_pct / 100.0,
                        periodic_investment: amount,
                        frequency: FrequencySpec::Label(frequency),
                        start_date: parse_date(&start)?,
                        end_date: parse_date(&end)?,
                        allocations: allocations
                            .iter()
                            .map(|a| parse_allocation(a))
                            .collect::<Result<_>>()?,
                    },
                    DataSettings::default(),
                ),
            };
            run_cmd(&spec, settings, &data)
        }
        Commands::Compare {
            config,
            sequential,
            data,
        } => compare_cmd(&config, !sequential, &data),
        Commands::Frequencies => {
            println!("{:<14} {:>6}", "Frequency", "Days");
            println!("{}", "-".repeat(21));
            for f in InvestmentFrequency::ALL {
                println!("{:<14} {:>6}", f.label(), f.days());
            }
            Ok(())
        }
        Commands::Schedule {
            start,
            end,
            frequency,
        } => schedule_cmd(&start, &end, &frequency),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{s}' (expected YYYY-MM-DD)"))
}

fn parse_frequency(s: &str) -> Result<InvestmentFrequency> {
    s.parse::<InvestmentFrequency>().map_err(anyhow::Error::msg)
}

/// `VFV.TO=0.4` or `VFV.TO=40%`.
fn parse_allocation(s: &str) -> Result<Allocation> {
    let Some((instrument, weight)) = s.split_once('=') else {
        bail!("allocation '{s}' must look like INSTRUMENT=WEIGHT");
    };
    let weight = weight.trim();
    let weight = match weight.strip_suffix('%') {
        Some(pct) => pct.trim().parse::<f64>().map(|w| w / 100.0),
        None => weight.parse::<f64>(),
    }
    .with_context(|| format!("invalid weight in allocation '{s}'"))?;
    Ok(Allocation::new(instrument.trim(), weight))
}

fn scenario_from_file(path: &Path, name: Option<&str>) -> Result<(ScenarioSpec, DataSettings)> {
    let file = ScenarioFile::from_file(path)?;
    tracing::debug!(path = %path.display(), scenarios = file.scenarios.len(), "loaded scenario file");
    let spec = match name {
        Some(name) => file.scenario(name)?.clone(),
        None if file.scenarios.len() == 1 => file.scenarios[0].clone(),
        None => bail!(
            "{} defines {} scenarios; pick one with --scenario or use `compare`",
            path.display(),
            file.scenarios.len()
        ),
    };
    Ok((spec, file.data))
}

fn resolve_settings(settings: DataSettings, data: &DataArgs) -> DataSettings {
    match &data.prices_dir {
        Some(dir) => DataSettings::Csv { dir: dir.clone() },
        None => settings,
    }
}

fn run_cmd(spec: &ScenarioSpec, settings: DataSettings, data: &DataArgs) -> Result<()> {
    let source = open_source(&resolve_settings(settings, data));
    let opts = LoadOptions {
        synthetic_fallback: data.synthetic,
    };

    let run = run_scenario(spec, source.as_ref(), &opts)?;
    print_summary(&run);

    if !data.no_save {
        let run_dir = save_artifacts(&run, &data.output_dir)?;
        println!("Artifacts saved to: {}", run_dir.display());
    }
    Ok(())
}

fn compare_cmd(config: &Path, parallel: bool, data: &DataArgs) -> Result<()> {
    let file = ScenarioFile::from_file(config)?;
    tracing::info!(
        scenarios = file.scenarios.len(),
        parallel,
        "comparing scenarios from {}",
        config.display()
    );
    let source = open_source(&resolve_settings(file.data.clone(), data));
    let opts = LoadOptions {
        synthetic_fallback: data.synthetic,
    };

    let mut registry = ScenarioRegistry::new();
    let mut failures = 0usize;
    for (name, outcome) in run_scenarios(&file.scenarios, source.as_ref(), &opts, parallel) {
        match outcome {
            Ok(run) => {
                registry.insert(run);
            }
            Err(e) => {
                failures += 1;
                eprintln!("Scenario '{name}' failed: {e}");
            }
        }
    }

    println!();
    println!("{}", generate_comparison(&registry));

    if !data.no_save && !registry.is_empty() {
        for run in registry.iter() {
            save_artifacts(run, &data.output_dir)?;
        }
        let path = save_comparison(&registry, &data.output_dir)?;
        println!("Comparison saved to: {}", path.display());
    }

    if failures > 0 {
        bail!("{failures} of {} scenario(s) failed", file.scenarios.len());
    }
    Ok(())
}

fn schedule_cmd(start: &str, end: &str, frequency: &str) -> Result<()> {
    let (start, end) = (parse_date(start)?, parse_date(end)?);
    if start > end {
        bail!("start date {start} is after end date {end}");
    }
    let freq = parse_frequency(frequency)?;
    let dates = investment_dates(start, end, freq.days());

    println!("{} investment day(s), {}:", dates.len(), freq.label());
    for d in &dates {
        println!("  {} {}", d, d.format("%a"));
    }
    Ok(())
}

fn print_summary(run: &ScenarioRun) {
    let r = &run.result;
    let c = &r.config;
    let s = &r.summary;

    println!();
    println!("=== DCA Simulation: {} ===", run.name);
    println!("Period:            {} to {} ({} days)", c.start_date, c.end_date, r.rows.len());
    println!("Initial Savings:   {}", format_money(s.initial_savings));
    println!("Interest Rate:     {:.2}%", c.annual_interest_rate * 100.0);
    println!(
        "Investment:        {} every {} days",
        format_money(c.periodic_investment),
        c.frequency_days
    );
    for a in &c.allocations {
        println!("  {:<12} {:>6.1}%", a.instrument, a.weight * 100.0);
    }
    println!();
    println!("--- Results ---");
    println!("Final Total Value: {}", format_money(s.final_total_value));
    println!("Cash Balance:      {}", format_money(s.final_cash_balance));
    println!("Investment Value:  {}", format_money(s.final_investment_value));
    println!(
        "Total Invested:    {} ({} purchases)",
        format_money(s.total_invested),
        s.num_investments
    );
    println!("Interest Earned:   {}", format_money(s.total_interest_earned));
    println!(
        "Investment Return: {} ({:.2}%)",
        format_money(s.investment_return),
        s.investment_return_rate_percent
    );
    println!(
        "Total Return:      {} ({:.2}%)",
        format_money(s.total_return),
        s.return_rate_percent
    );
    if !s.final_holdings.is_empty() {
        println!();
        println!("{:<12} {:>12} {:>12} {:>14}", "Instrument", "Shares", "Price", "Value");
        println!("{}", "-".repeat(53));
        for h in &s.final_holdings {
            println!(
                "{:<12} {:>12.4} {:>12.2} {:>14}",
                h.instrument,
                h.total_shares,
                h.final_price,
                format_money(h.market_value)
            );
        }
    }
    if run.has_synthetic {
        println!();
        println!("WARNING: Results based on SYNTHETIC data");
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocation_parsing() {
        let a = parse_allocation("VFV.TO=0.4").unwrap();
        assert_eq!(a.instrument, "VFV.TO");
        assert_eq!(a.weight, 0.4);

        let b = parse_allocation(" QCN = 60% ").unwrap();
        assert_eq!(b.instrument, "QCN");
        assert!((b.weight - 0.6).abs() < 1e-12);

        assert!(parse_allocation("QCN").is_err());
        assert!(parse_allocation("QCN=abc").is_err());
    }

    #[test]
    fn cli_parses_inline_run() {
        let cli = Cli::try_parse_from([
            "lazyinvestor",
            "run",
            "--amount",
            "250",
            "--frequency",
            "biweekly",
            "-a",
            "VFV.TO=40%",
            "-a",
            "QCN=60%",
            "--no-save",
        ])
        .unwrap();
        match cli.command {
            Commands::Run {
                amount,
                allocations,
                data,
                ..
            } => {
                assert_eq!(amount, 250.0);
                assert_eq!(allocations, vec!["VFV.TO=40%", "QCN=60%"]);
                assert!(data.no_save);
            }
            _ => panic!("expected run"),
        }
    }

    #[test]
    fn scenario_requires_config() {
        assert!(Cli::try_parse_from(["lazyinvestor", "run", "--scenario", "x"]).is_err());
    }

    #[test]
    fn prices_dir_overrides_file_settings() {
        let data = DataArgs {
            prices_dir: Some(PathBuf::from("other")),
            synthetic: false,
            output_dir: PathBuf::from("results"),
            no_save: true,
        };
        assert_eq!(
            resolve_settings(DataSettings::Synthetic, &data),
            DataSettings::Csv {
                dir: PathBuf::from("other")
            }
        );
    }
}
