//! Artifact export: JSON manifest, CSV layouts, Markdown reports.

use chrono::NaiveDate;

use lazyinvestor_core::data::InMemoryPriceSource;
use lazyinvestor_core::{Allocation, InvestmentFrequency};
use lazyinvestor_runner::export::{
    export_investments_csv, export_json, export_ledger_csv, export_value_csv, generate_comparison,
    generate_report, import_json, load_artifacts, save_artifacts, save_comparison,
};
use lazyinvestor_runner::{run_scenario, LoadOptions, ScenarioRegistry, ScenarioRun, ScenarioSpec};

fn d(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
}

fn two_fund_run(name: &str) -> ScenarioRun {
    let spec = ScenarioSpec {
        name: name.into(),
        initial_savings: 10_000.0,
        annual_interest_rate: 0.05,
        periodic_investment: 500.0,
        frequency: InvestmentFrequency::Weekly.into(),
        start_date: d(1),
        end_date: d(8),
        allocations: vec![Allocation::new("SPY", 0.6), Allocation::new("QQQ", 0.4)],
    };
    let source = InMemoryPriceSource::new()
        .with_constant("SPY", 100.0, d(1), d(8))
        .with_constant("QQQ", 50.0, d(1), d(8));
    run_scenario(&spec, &source, &LoadOptions::default()).unwrap()
}

fn parse(csv_text: &str) -> (Vec<String>, Vec<Vec<String>>) {
    let mut rdr = csv::Reader::from_reader(csv_text.as_bytes());
    let header = rdr.headers().unwrap().iter().map(String::from).collect();
    let rows = rdr
        .records()
        .map(|r| r.unwrap().iter().map(String::from).collect())
        .collect();
    (header, rows)
}

// ── JSON ─────────────────────────────────────────────────────────────

#[test]
fn json_round_trip_preserves_run() {
    let run = two_fund_run("base");
    let json = export_json(&run).unwrap();
    assert!(json.contains("\"schema_version\": 1"));
    assert_eq!(import_json(&json).unwrap(), run);
}

#[test]
fn future_schema_version_is_rejected() {
    let run = two_fund_run("base");
    let json = export_json(&run)
        .unwrap()
        .replace("\"schema_version\": 1", "\"schema_version\": 99");
    let err = import_json(&json).unwrap_err();
    assert!(err.to_string().contains("unsupported schema version 99"));
}

// ── CSV ──────────────────────────────────────────────────────────────

#[test]
fn ledger_csv_has_per_instrument_columns_in_allocation_order() {
    let run = two_fund_run("base");
    let (header, rows) = parse(&export_ledger_csv(&run.result).unwrap());

    assert_eq!(
        header,
        vec![
            "date",
            "opening_cash",
            "daily_interest",
            "cumulative_interest",
            "cash_balance",
            "is_investment_day",
            "invested_amount",
            "SPY_price",
            "SPY_purchase_amount",
            "SPY_shares_purchased",
            "SPY_total_shares",
            "QQQ_price",
            "QQQ_purchase_amount",
            "QQQ_shares_purchased",
            "QQQ_total_shares",
            "investment_value",
            "total_value",
        ]
    );
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[0][0], "2024-01-01");
    assert_eq!(rows[0][5], "true");
    assert_eq!(rows[1][5], "false");
    // 60% of 500 at 100, 40% of 500 at 50
    assert_eq!(rows[0][8], "300");
    assert_eq!(rows[0][9], "3");
    assert_eq!(rows[0][13], "4");
    assert_eq!(rows[7][14], "8");
}

#[test]
fn ledger_values_read_back_exactly() {
    let run = two_fund_run("base");
    let (_, rows) = parse(&export_ledger_csv(&run.result).unwrap());
    for (row, ledger) in rows.iter().zip(&run.result.rows) {
        assert_eq!(row[4].parse::<f64>().unwrap(), ledger.cash_balance);
        assert_eq!(row[16].parse::<f64>().unwrap(), ledger.total_value);
    }
}

#[test]
fn value_csv_layout() {
    let run = two_fund_run("base");
    let (header, rows) = parse(&export_value_csv(&run.result).unwrap());
    assert_eq!(header, vec!["date", "cash_balance", "investment_value", "total_value"]);
    assert_eq!(rows.len(), 8);
    assert_eq!(rows[7][2], "1000");
}

#[test]
fn investments_csv_has_one_row_per_leg() {
    let run = two_fund_run("base");
    let (header, rows) = parse(&export_investments_csv(&run.result).unwrap());
    assert_eq!(
        header,
        vec!["date", "instrument", "amount", "price", "shares", "total_amount"]
    );
    // two purchase days × two instruments
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0][1], "SPY");
    assert_eq!(rows[1][1], "QQQ");
    assert_eq!(rows[2][0], "2024-01-08");
}

// ── Markdown ─────────────────────────────────────────────────────────

#[test]
fn report_contains_configuration_and_holdings() {
    let run = two_fund_run("base");
    let md = generate_report(&run);
    assert!(md.starts_with("# DCA Simulation: base"));
    assert!(md.contains("| Initial Savings | $10,000.00 |"));
    assert!(md.contains("| Periodic Investment | $500.00 (weekly) |"));
    assert!(md.contains("SPY 60.0%, QQQ 40.0%"));
    assert!(md.contains("| Total Invested | $1,000.00 (2 purchases) |"));
    assert!(md.contains("## Holdings"));
    assert!(!md.contains("synthetic"));
}

#[test]
fn comparison_lists_every_scenario() {
    let registry: ScenarioRegistry = [two_fund_run("a"), two_fund_run("b")].into_iter().collect();
    let md = generate_comparison(&registry);
    assert!(md.contains("| a |"));
    assert!(md.contains("| b |"));
    assert!(md.contains("Highest final value"));

    let empty = generate_comparison(&ScenarioRegistry::new());
    assert!(empty.contains("_No scenarios._"));
}

// ── Artifact bundle ──────────────────────────────────────────────────

#[test]
fn save_and_load_artifacts() {
    let tmp = tempfile::tempdir().unwrap();
    let run = two_fund_run("base case");

    let dir = save_artifacts(&run, tmp.path()).unwrap();
    let dirname = dir.file_name().unwrap().to_string_lossy().to_string();
    assert!(dirname.starts_with("base_case_"));
    for file in ["manifest.json", "ledger.csv", "value.csv", "investments.csv", "summary.md"] {
        assert!(dir.join(file).exists(), "missing {file}");
    }

    assert_eq!(load_artifacts(&dir).unwrap(), run);
}

#[test]
fn load_artifacts_reports_missing_manifest() {
    let tmp = tempfile::tempdir().unwrap();
    let err = load_artifacts(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("manifest.json"));
}

#[test]
fn save_comparison_writes_markdown_and_csv() {
    let tmp = tempfile::tempdir().unwrap();
    let registry: ScenarioRegistry = [two_fund_run("a"), two_fund_run("b")].into_iter().collect();

    let md_path = save_comparison(&registry, tmp.path()).unwrap();
    assert!(md_path.exists());
    let csv_text = std::fs::read_to_string(tmp.path().join("comparison.csv")).unwrap();
    let (header, rows) = parse(&csv_text);
    assert_eq!(header[0], "name");
    assert_eq!(rows.len(), 2);
}
