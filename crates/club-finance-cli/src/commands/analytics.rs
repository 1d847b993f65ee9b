use clap::Args;
use serde_json::Value;

use club_finance_core::analytics;

use super::{SeriesArg, SourceArgs, TypeArg};
use crate::input;

/// Arguments for the category mix
#[derive(Args)]
pub struct MixArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    #[arg(long, value_enum, default_value = "revenue")]
    pub r#type: TypeArg,

    #[arg(long, value_enum, default_value = "actual")]
    pub series: SeriesArg,

    /// Categories listed before folding into "Other" (overrides the config file)
    #[arg(long)]
    pub top: Option<usize>,
}

/// Arguments for the season trend
#[derive(Args)]
pub struct TrendArgs {
    /// Path to the season table CSV (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    #[arg(long, value_enum, default_value = "revenue")]
    pub r#type: TypeArg,

    #[arg(long, value_enum, default_value = "actual")]
    pub series: SeriesArg,
}

pub fn run_mix(args: MixArgs, config_path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let (ingested, config) = input::load(args.source.input.as_deref(), config_path)?;
    let output = analytics::build_category_mix(
        &ingested,
        args.source.season.as_deref(),
        args.r#type.into(),
        args.series.into(),
        args.top.unwrap_or(config.top_categories),
    )?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_trend(args: TrendArgs, config_path: Option<&str>) -> Result<Value, Box<dyn std::error::Error>> {
    let (ingested, _) = input::load(args.input.as_deref(), config_path)?;
    let output = analytics::build_season_trend(&ingested, args.r#type.into(), args.series.into());
    Ok(serde_json::to_value(output)?)
}
