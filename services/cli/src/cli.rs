use crate::infra::{
    as_of_or_today, parse_date, parse_score, print_json, read_comparables, read_json,
};
use chrono::{Datelike, NaiveDate};
use clap::{Args, Parser, Subcommand};
use deal_engine::config::{AppConfig, EngineConfig};
use deal_engine::error::AppError;
use deal_engine::telemetry;
use deal_engine::valuation::RepairCostModel;
use deal_engine::{CriteriaMatcher, InvestmentCriteria, Property};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "deal-engine",
    about = "Value properties, score wholesale deals, and match against investment criteria",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Estimate after-repair value from comparable sales
    Arv(ArvArgs),
    /// Estimate renovation cost from a condition score
    Repair(RepairArgs),
    /// Analyze wholesale deal economics
    Wholesale(WholesaleArgs),
    /// Score a property against an investment criteria file
    Match(MatchArgs),
}

#[derive(Args, Debug)]
struct ArvArgs {
    /// Subject property JSON file
    #[arg(long)]
    property: PathBuf,
    /// Comparable sales as a JSON array or a CSV export
    #[arg(long)]
    comps: PathBuf,
    /// Valuation date for comparable recency (defaults to today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct RepairArgs {
    /// Subject property JSON file
    #[arg(long)]
    property: PathBuf,
    /// Condition from 0.0 (gut job) to 1.0 (turnkey)
    #[arg(long, value_parser = parse_score)]
    condition: f64,
    /// Date used to compute the home's age (defaults to today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct WholesaleArgs {
    /// Subject property JSON file
    #[arg(long)]
    property: PathBuf,
    /// Comparable sales as a JSON array or a CSV export
    #[arg(long)]
    comps: PathBuf,
    /// Condition from 0.0 (gut job) to 1.0 (turnkey)
    #[arg(long, value_parser = parse_score)]
    condition: f64,
    /// Override the maximum wholesale fee as a fraction of ARV
    #[arg(long)]
    max_fee_pct: Option<f64>,
    /// Override the investor's minimum profit margin as a fraction of ARV
    #[arg(long)]
    min_profit_margin: Option<f64>,
    /// Override the monthly holding cost rate
    #[arg(long)]
    holding_rate: Option<f64>,
    /// Valuation date for comparable recency (defaults to today)
    #[arg(long, value_parser = parse_date)]
    as_of: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct MatchArgs {
    /// Property JSON file
    #[arg(long)]
    property: PathBuf,
    /// Investment criteria JSON file
    #[arg(long)]
    criteria: PathBuf,
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    let engine = config.engine()?;

    info!(environment = ?config.environment, "deal engine starting");

    match cli.command {
        Command::Arv(args) => run_arv(&engine, args),
        Command::Repair(args) => run_repair(&engine, args),
        Command::Wholesale(args) => run_wholesale(&engine, args),
        Command::Match(args) => run_match(args),
    }
}

fn run_arv(engine: &EngineConfig, args: ArvArgs) -> Result<(), AppError> {
    let property: Property = read_json(&args.property)?;
    let comparables = read_comparables(&args.comps)?;
    let result =
        engine
            .arv_estimator()
            .estimate(&property, &comparables, as_of_or_today(args.as_of))?;
    print_json(&result)
}

fn run_repair(engine: &EngineConfig, args: RepairArgs) -> Result<(), AppError> {
    let property: Property = read_json(&args.property)?;
    let as_of_year = as_of_or_today(args.as_of).year();
    let estimate = engine
        .repair_model()
        .estimate(&property, args.condition, as_of_year)?;
    print_json(&estimate)
}

fn run_wholesale(engine: &EngineConfig, args: WholesaleArgs) -> Result<(), AppError> {
    let property: Property = read_json(&args.property)?;
    let comparables = read_comparables(&args.comps)?;

    let analyzer = engine.wholesale_analyzer();
    let mut parameters = analyzer.parameters().clone();
    if let Some(pct) = args.max_fee_pct {
        parameters.max_wholesale_fee_pct = pct;
    }
    if let Some(margin) = args.min_profit_margin {
        parameters.min_profit_margin = margin;
    }
    if let Some(rate) = args.holding_rate {
        parameters.holding_cost_monthly_rate = rate;
    }

    let result = analyzer.analyze_with(
        &property,
        &comparables,
        args.condition,
        as_of_or_today(args.as_of),
        &parameters,
    )?;
    print_json(&result)
}

fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let property: Property = read_json(&args.property)?;
    let criteria: InvestmentCriteria = read_json(&args.criteria)?;
    let matcher = CriteriaMatcher::new(&criteria)?;
    info!(
        criteria = matcher.name().unwrap_or("unnamed"),
        rules = matcher.rule_count(),
        "matching property against criteria"
    );
    print_json(&matcher.evaluate(&property))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_wholesale_overrides() {
        let cli = Cli::try_parse_from([
            "deal-engine",
            "wholesale",
            "--property",
            "subject.json",
            "--comps",
            "comps.csv",
            "--condition",
            "0.5",
            "--min-profit-margin",
            "0.25",
            "--as-of",
            "2025-06-30",
        ])
        .expect("arguments parse");

        match cli.command {
            Command::Wholesale(args) => {
                assert_eq!(args.condition, 0.5);
                assert_eq!(args.min_profit_margin, Some(0.25));
                assert_eq!(args.max_fee_pct, None);
                assert_eq!(args.as_of, NaiveDate::from_ymd_opt(2025, 6, 30));
            }
            other => panic!("expected wholesale command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_out_of_range_condition() {
        let result = Cli::try_parse_from([
            "deal-engine",
            "repair",
            "--property",
            "subject.json",
            "--condition",
            "1.5",
        ]);
        assert!(result.is_err());
    }
}
