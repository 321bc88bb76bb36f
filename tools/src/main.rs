//! rehab-calc: headless runner for the rehabilitation repayment engine.
//!
//! Usage:
//!   rehab-calc --input applicant.json
//!   rehab-calc --input applicant.json --policy policy-2027.json --json
//!   rehab-calc --input applicant.json --db policies.db --as-of 2027-03-01
//!   rehab-calc --db policies.db --publish policy-2027.json
//!   rehab-calc --dump-policy

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate};
use rehab_core::{
    config::PolicyConfig,
    engine::{calculate, calculate_as_of},
    format::{format_monthly, format_won},
    input::UserInput,
    living_cost::AllowanceBreakdown,
    policy_store::PolicyStore,
    result::CalculationResult,
};
use std::env;

#[derive(serde::Serialize)]
struct Report<'a> {
    as_of:  NaiveDate,
    source: &'a str,
    result: &'a CalculationResult,
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let json = args.iter().any(|a| a == "--json");
    let dump_policy = args.iter().any(|a| a == "--dump-policy");
    let input_path = flag_value(&args, "--input");
    let policy_path = flag_value(&args, "--policy");
    let db = flag_value(&args, "--db");
    let publish = flag_value(&args, "--publish");
    let as_of = parse_arg(&args, "--as-of", Local::now().date_naive());

    if dump_policy {
        println!("{}", serde_json::to_string_pretty(&PolicyConfig::default_2026())?);
        return Ok(());
    }

    if let Some(path) = publish {
        let Some(db) = db else {
            bail!("--publish needs --db");
        };
        let policy = PolicyConfig::load(path)?;
        let store = PolicyStore::open(db)?;
        store.migrate()?;
        let snapshot_id = store.publish(&policy)?;
        println!("published {} policy as {snapshot_id}", policy.base_year);
        println!("  snapshots for {}: {}", policy.base_year, store.snapshot_count(policy.base_year)?);
        return Ok(());
    }

    let Some(input_path) = input_path else {
        bail!("usage: rehab-calc --input FILE [--policy FILE | --db PATH] [--as-of YYYY-MM-DD] [--json]");
    };
    let content = std::fs::read_to_string(input_path)
        .with_context(|| format!("Cannot read {input_path}"))?;
    let input: UserInput = serde_json::from_str(&content)?;

    let (result, source) = match (policy_path, db) {
        (Some(path), _) => {
            let policy = PolicyConfig::load(path)?;
            (calculate(&input, Some(&policy))?, path.to_string())
        }
        (None, Some(db)) => {
            let store = PolicyStore::open(db)?;
            store.migrate()?;
            log::info!("rehab-calc: store years {:?}", store.years()?);
            (calculate_as_of(&input, &store, as_of)?, db.to_string())
        }
        (None, None) => (calculate(&input, None)?, "builtin".to_string()),
    };

    if json {
        let report = Report { as_of, source: &source, result: &result };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&result, &source);
    }
    Ok(())
}

fn print_summary(r: &CalculationResult, source: &str) {
    println!("=== REHABILITATION ESTIMATE ===");
    println!("  policy:          {} ({source})", r.policy_year);
    println!("  status:          {:?}", r.status);
    println!("  reason:          {}", r.status_reason);
    println!("  court:           {} [{}]", r.court_name, r.region_class.label());
    println!();
    println!("  monthly payment: {}", format_monthly(r.monthly_payment));
    println!("  months:          {}", r.repayment_months);
    println!("  total repayment: {}", format_won(r.total_repayment));
    println!("  debt reduction:  {} ({}%)", format_won(r.total_debt_reduction), r.debt_reduction_rate);
    println!();
    println!("  household size:  {}", r.household_size);
    println!("  living cost:     {}", format_won(r.recognized_living_cost));
    println!("    base:          {}", format_won(r.base_living_cost));
    println!("    additional:    {}", format_won(r.additional_living_cost));
    print_breakdown("housing", r.housing_breakdown.as_ref());
    print_breakdown("medical", r.medical_breakdown.as_ref());
    print_breakdown("education", r.education_breakdown.as_ref());
    println!("  disposable:      {}", format_won(r.disposable_income));
    println!("  liquidation:     {}", format_won(r.liquidation_value));
    println!("  exempt deposit:  {}", format_won(r.exempt_deposit));

    if !r.advisories.is_empty() {
        println!();
        println!("=== ADVISORIES ===");
        for a in &r.advisories {
            println!("  - {a}");
        }
    }
    if !r.risk_warnings.is_empty() {
        println!();
        println!("=== WARNINGS ===");
        for w in &r.risk_warnings {
            println!("  ! {w}");
        }
    }
    if let Some(notice) = &r.unemployed_notice {
        println!();
        println!("  note: {notice}");
    }
}

fn print_breakdown(label: &str, breakdown: Option<&AllowanceBreakdown>) {
    if let Some(b) = breakdown {
        println!("      {label:<10} {}", b.explanation);
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn parse_arg<T: std::str::FromStr + Copy>(args: &[String], flag: &str, default: T) -> T {
    args.windows(2)
        .find(|w| w[0] == flag)
        .and_then(|w| w[1].parse().ok())
        .unwrap_or(default)
}
