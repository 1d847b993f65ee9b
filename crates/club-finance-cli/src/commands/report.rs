use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use club_finance_core::report::build_season_report;
use club_finance_core::rollup::GroupLevel;
use club_finance_core::with_metadata;

use super::SourceArgs;
use crate::input;

/// Arguments for listing seasons
#[derive(Args)]
pub struct SeasonsArgs {
    /// Path to the season table CSV (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the season report views
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Cash at bank at the start of the season (overrides the config file)
    #[arg(long)]
    pub opening_balance: Option<Decimal>,
}

pub fn run_seasons(
    args: SeasonsArgs,
    config_path: Option<&str>,
) -> Result<Value, Box<dyn std::error::Error>> {
    let (ingested, _) = input::load(args.input.as_deref(), config_path)?;
    let seasons = ingested.store.seasons();
    let result = with_metadata(
        "Distinct seasons in first-occurrence order",
        &json!({ "records": ingested.store.len() }),
        ingested.warnings(),
        0,
        json!({
            "seasons": seasons,
            "default": ingested.store.default_season(),
        }),
    );
    Ok(serde_json::to_value(result)?)
}

fn season_output(args: ReportArgs, config_path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let (ingested, mut config) = input::load(args.source.input.as_deref(), config_path)?;
    if let Some(opening) = args.opening_balance {
        config.opening_balance = opening;
    }
    let output = build_season_report(&ingested, args.source.season.as_deref(), &config)?;
    Ok(serde_json::to_value(output)?)
}

/// Replace the report body with flattened statement rows at `level`, plus
/// the margin line and, for the summary, the cash balance.
fn statement_view(
    args: ReportArgs,
    config_path: Option<&str>,
    level: GroupLevel,
) -> Result<Value, Box<dyn std::error::Error>> {
    let mut value = season_output(args, config_path)?;
    let report: club_finance_core::report::SeasonReport =
        serde_json::from_value(value["result"].take())?;

    let np = &report.net_profit;
    let mut body = json!({
        "season": report.season,
        "rows": report.statement_rows(level),
        "margins": {
            "actual": np.margins.actual,
            "budget": np.margins.budget,
            "prior": np.margins.prior,
            "delta_to_budget": np.margin_delta_budget,
            "delta_to_prior": np.margin_delta_prior,
        },
    });
    if level == GroupLevel::Type {
        body["cash_balance"] = serde_json::to_value(&report.cash_balance)?;
    }
    value["result"] = body;
    Ok(value)
}

pub fn run_report(args: ReportArgs, config_path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    season_output(args, config_path)
}

pub fn run_pnl(args: ReportArgs, config_path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    statement_view(args, config_path, GroupLevel::Category)
}

pub fn run_breakdown(args: ReportArgs, config_path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    statement_view(args, config_path, GroupLevel::Item)
}

pub fn run_summary(args: ReportArgs, config_path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    statement_view(args, config_path, GroupLevel::Type)
}
