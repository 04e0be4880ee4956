//! Reporting and export: JSON, CSV, and Markdown artifact generation.
//!
//! Provides three export formats for scenario runs:
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: daily ledger, value over time, and investment history
//! - **Markdown**: single-scenario summaries and side-by-side comparisons
//!
//! CSV numbers are written with Rust's shortest round-trip formatting, so
//! every ledger value can be read back exactly.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use lazyinvestor_core::SimulationResult;

use crate::registry::{ComparisonRow, ScenarioRegistry};
use crate::runner::{ScenarioRun, SCHEMA_VERSION};

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `ScenarioRun` to pretty JSON.
pub fn export_json(run: &ScenarioRun) -> Result<String> {
    serde_json::to_string_pretty(run).context("failed to serialize ScenarioRun to JSON")
}

/// Deserialize a `ScenarioRun` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ScenarioRun> {
    let run: ScenarioRun =
        serde_json::from_str(json).context("failed to deserialize ScenarioRun from JSON")?;
    if run.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            run.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(run)
}

// ─── CSV export ─────────────────────────────────────────────────────

fn num(v: f64) -> String {
    v.to_string()
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String> {
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export the daily ledger, one row per calendar day.
///
/// Columns: date, opening_cash, daily_interest, cumulative_interest,
/// cash_balance, is_investment_day, invested_amount, then for each
/// instrument in allocation order `<id>_price`, `<id>_purchase_amount`,
/// `<id>_shares_purchased`, `<id>_total_shares`, then investment_value and
/// total_value.
pub fn export_ledger_csv(result: &SimulationResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    let mut header: Vec<String> = [
        "date",
        "opening_cash",
        "daily_interest",
        "cumulative_interest",
        "cash_balance",
        "is_investment_day",
        "invested_amount",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    for id in result.config.instruments() {
        header.push(format!("{id}_price"));
        header.push(format!("{id}_purchase_amount"));
        header.push(format!("{id}_shares_purchased"));
        header.push(format!("{id}_total_shares"));
    }
    header.push("investment_value".into());
    header.push("total_value".into());
    wtr.write_record(&header)?;

    for row in &result.rows {
        let mut record = vec![
            row.date.to_string(),
            num(row.opening_cash),
            num(row.daily_interest),
            num(row.cumulative_interest),
            num(row.cash_balance),
            row.is_investment_day.to_string(),
            num(row.invested_amount),
        ];
        for inst in &row.instruments {
            record.push(num(inst.price));
            record.push(num(inst.purchase_amount));
            record.push(num(inst.shares_purchased));
            record.push(num(inst.total_shares));
        }
        record.push(num(row.investment_value));
        record.push(num(row.total_value));
        wtr.write_record(&record)?;
    }

    finish(wtr)
}

/// Export value over time: date, cash_balance, investment_value, total_value.
pub fn export_value_csv(result: &SimulationResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "cash_balance", "investment_value", "total_value"])?;
    for row in &result.rows {
        wtr.write_record([
            row.date.to_string(),
            num(row.cash_balance),
            num(row.investment_value),
            num(row.total_value),
        ])?;
    }
    finish(wtr)
}

/// Export the investment history, one row per purchase leg.
pub fn export_investments_csv(result: &SimulationResult) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["date", "instrument", "amount", "price", "shares", "total_amount"])?;
    for inv in &result.investments {
        for leg in &inv.legs {
            wtr.write_record([
                inv.date.to_string(),
                leg.instrument.clone(),
                num(leg.amount),
                num(leg.price),
                num(leg.shares),
                num(inv.total_amount),
            ])?;
        }
    }
    finish(wtr)
}

/// Export a comparison table as CSV.
pub fn export_comparison_csv(rows: &[ComparisonRow]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    for row in rows {
        wtr.serialize(row)?;
    }
    finish(wtr)
}

// ─── Artifact bundle ────────────────────────────────────────────────

fn dir_safe(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
        .collect()
}

/// Save the full artifact set for a single scenario run.
///
/// Creates a directory named `{scenario}_{timestamp}/` under `output_dir`
/// containing:
/// - `manifest.json`: the full `ScenarioRun`
/// - `ledger.csv`: daily ledger with per-instrument columns
/// - `value.csv`: cash, holdings and total value per day
/// - `investments.csv`: purchase history
/// - `summary.md`: human-readable report
///
/// Returns the path to the created directory.
pub fn save_artifacts(run: &ScenarioRun, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!(
        "{}_{}",
        dir_safe(&run.name),
        chrono::Local::now().format("%Y%m%d_%H%M%S")
    );
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create artifact dir: {}", run_dir.display()))?;

    let files = [
        ("manifest.json", export_json(run)?),
        ("ledger.csv", export_ledger_csv(&run.result)?),
        ("value.csv", export_value_csv(&run.result)?),
        ("investments.csv", export_investments_csv(&run.result)?),
        ("summary.md", generate_report(run)),
    ];
    for (file, contents) in files {
        let path = run_dir.join(file);
        std::fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
    }

    tracing::debug!(dir = %run_dir.display(), "saved scenario artifacts");
    Ok(run_dir)
}

/// Load a `ScenarioRun` from an artifact directory's manifest.json.
///
/// Rejects unknown schema versions.
pub fn load_artifacts(dir: &Path) -> Result<ScenarioRun> {
    let manifest_path = dir.join("manifest.json");
    let json = std::fs::read_to_string(&manifest_path)
        .with_context(|| format!("failed to read {}", manifest_path.display()))?;
    import_json(&json)
}

/// Write `comparison.md` and `comparison.csv` under `output_dir`.
pub fn save_comparison(registry: &ScenarioRegistry, output_dir: &Path) -> Result<PathBuf> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output dir: {}", output_dir.display()))?;
    let rows = registry.comparison();

    let md_path = output_dir.join("comparison.md");
    std::fs::write(&md_path, generate_comparison(registry))
        .with_context(|| format!("failed to write {}", md_path.display()))?;
    let csv_path = output_dir.join("comparison.csv");
    std::fs::write(&csv_path, export_comparison_csv(&rows)?)
        .with_context(|| format!("failed to write {}", csv_path.display()))?;
    Ok(md_path)
}

// ─── Markdown reports ───────────────────────────────────────────────

/// `$1,234.56` style formatting; negatives as `-$1,234.56`.
pub fn format_money(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

fn frequency_label(days: f64) -> String {
    match lazyinvestor_core::InvestmentFrequency::from_days(days) {
        Some(f) => f.label().to_string(),
        None => format!("every {days} days"),
    }
}

/// Generate a Markdown report for a single scenario run.
pub fn generate_report(run: &ScenarioRun) -> String {
    let r = &run.result;
    let c = &r.config;
    let s = &r.summary;
    let mut md = String::with_capacity(2048);

    md.push_str(&format!("# DCA Simulation: {}\n\n", run.name));
    if run.has_synthetic {
        md.push_str("> **Warning:** synthetic prices were used. These numbers are not real.\n\n");
    }

    md.push_str("## Configuration\n\n");
    md.push_str("| Field | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Period | {} to {} |\n", c.start_date, c.end_date));
    md.push_str(&format!("| Days | {} |\n", r.rows.len()));
    md.push_str(&format!("| Initial Savings | {} |\n", format_money(c.initial_savings)));
    md.push_str(&format!(
        "| Annual Interest Rate | {:.2}% |\n",
        c.annual_interest_rate * 100.0
    ));
    md.push_str(&format!(
        "| Periodic Investment | {} ({}) |\n",
        format_money(c.periodic_investment),
        frequency_label(c.frequency_days)
    ));
    if !c.allocations.is_empty() {
        let split: Vec<String> = c
            .allocations
            .iter()
            .map(|a| format!("{} {:.1}%", a.instrument, a.weight * 100.0))
            .collect();
        md.push_str(&format!("| Allocation | {} |\n", split.join(", ")));
    }
    md.push_str(&format!("| Fingerprint | `{}` |\n", &r.config_fingerprint));
    md.push('\n');

    md.push_str("## Results\n\n");
    md.push_str("| Metric | Value |\n");
    md.push_str("| --- | --- |\n");
    md.push_str(&format!("| Final Total Value | {} |\n", format_money(s.final_total_value)));
    md.push_str(&format!("| Final Cash Balance | {} |\n", format_money(s.final_cash_balance)));
    md.push_str(&format!(
        "| Final Investment Value | {} |\n",
        format_money(s.final_investment_value)
    ));
    md.push_str(&format!(
        "| Total Invested | {} ({} purchases) |\n",
        format_money(s.total_invested),
        s.num_investments
    ));
    md.push_str(&format!(
        "| Interest Earned | {} |\n",
        format_money(s.total_interest_earned)
    ));
    md.push_str(&format!(
        "| Investment Return | {} ({:.2}%) |\n",
        format_money(s.investment_return),
        s.investment_return_rate_percent
    ));
    md.push_str(&format!(
        "| Total Return | {} ({:.2}%) |\n",
        format_money(s.total_return),
        s.return_rate_percent
    ));
    md.push('\n');

    if !s.final_holdings.is_empty() {
        md.push_str("## Holdings\n\n");
        md.push_str("| Instrument | Shares | Final Price | Market Value |\n");
        md.push_str("| --- | ---: | ---: | ---: |\n");
        for h in &s.final_holdings {
            md.push_str(&format!(
                "| {} | {:.4} | {} | {} |\n",
                h.instrument,
                h.total_shares,
                format_money(h.final_price),
                format_money(h.market_value)
            ));
        }
        md.push('\n');
    }

    md
}

/// Generate a side-by-side Markdown comparison of every registered scenario.
pub fn generate_comparison(registry: &ScenarioRegistry) -> String {
    let mut md = String::with_capacity(1024);
    md.push_str("# Scenario Comparison\n\n");

    if registry.is_empty() {
        md.push_str("_No scenarios._\n");
        return md;
    }

    md.push_str(
        "| Scenario | Invested | Purchases | Interest | Cash | Holdings | Total Value | Total Return |\n",
    );
    md.push_str("| --- | ---: | ---: | ---: | ---: | ---: | ---: | ---: |\n");
    for row in registry.comparison() {
        let name = if row.has_synthetic {
            format!("{} (synthetic)", row.name)
        } else {
            row.name.clone()
        };
        md.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} | {} ({:.2}%) |\n",
            name,
            format_money(row.total_invested),
            row.num_investments,
            format_money(row.total_interest_earned),
            format_money(row.final_cash_balance),
            format_money(row.final_investment_value),
            format_money(row.final_total_value),
            format_money(row.total_return),
            row.return_rate_percent
        ));
    }

    if let Some(best) = registry.best_by_total_value() {
        md.push_str(&format!(
            "\nHighest final value: **{}** at {}\n",
            best.name,
            format_money(best.result.summary.final_total_value)
        ));
    }
    md
}
