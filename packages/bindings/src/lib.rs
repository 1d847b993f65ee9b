use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use club_finance_core::config::ReportConfig;
use club_finance_core::ingest::{ingest, Ingested, RawRecord};
use club_finance_core::rollup::GroupLevel;
use club_finance_core::types::{RecordType, Series};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

fn load(records: &[RawRecord], config: &ReportConfig) -> NapiResult<Ingested> {
    ingest(records, &config.ingest_options()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Season report
// ---------------------------------------------------------------------------

#[napi]
pub fn season_report(input_json: String) -> NapiResult<String> {
    let input: club_finance_core::report::SeasonReportInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = club_finance_core::report::analyze_season(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct StatementInput {
    records: Vec<RawRecord>,
    #[serde(default)]
    season: Option<String>,
    #[serde(default = "default_level")]
    level: GroupLevel,
    #[serde(default)]
    config: ReportConfig,
}

fn default_level() -> GroupLevel {
    GroupLevel::Item
}

/// Flat statement rows at the requested level, wrapped in the report envelope.
#[napi]
pub fn statement_rows(input_json: String) -> NapiResult<String> {
    let input: StatementInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let ingested = load(&input.records, &input.config)?;
    let output = club_finance_core::report::build_season_report(
        &ingested,
        input.season.as_deref(),
        &input.config,
    )
    .map_err(to_napi_error)?;
    let rows = output.result.statement_rows(input.level);
    serde_json::to_string(&serde_json::json!({
        "result": rows,
        "methodology": output.methodology,
        "assumptions": output.assumptions,
        "warnings": output.warnings,
    }))
    .map_err(to_napi_error)
}

#[derive(Deserialize)]
struct RecordsInput {
    records: Vec<RawRecord>,
    #[serde(default)]
    config: ReportConfig,
}

#[napi]
pub fn list_seasons(input_json: String) -> NapiResult<String> {
    let input: RecordsInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let ingested = load(&input.records, &input.config)?;
    serde_json::to_string(&serde_json::json!({
        "seasons": ingested.store.seasons(),
        "default": ingested.store.default_season(),
        "warnings": ingested.warnings(),
    }))
    .map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Analytics
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct MixInput {
    records: Vec<RawRecord>,
    #[serde(default)]
    season: Option<String>,
    record_type: RecordType,
    #[serde(default = "default_series")]
    series: Series,
    #[serde(default)]
    top_n: Option<usize>,
    #[serde(default)]
    config: ReportConfig,
}

#[derive(Deserialize)]
struct TrendInput {
    records: Vec<RawRecord>,
    record_type: RecordType,
    #[serde(default = "default_series")]
    series: Series,
    #[serde(default)]
    config: ReportConfig,
}

fn default_series() -> Series {
    Series::Actual
}

#[napi]
pub fn category_mix(input_json: String) -> NapiResult<String> {
    let input: MixInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let ingested = load(&input.records, &input.config)?;
    let output = club_finance_core::analytics::build_category_mix(
        &ingested,
        input.season.as_deref(),
        input.record_type,
        input.series,
        input.top_n.unwrap_or(input.config.top_categories),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn season_trend(input_json: String) -> NapiResult<String> {
    let input: TrendInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let ingested = load(&input.records, &input.config)?;
    let output = club_finance_core::analytics::build_season_trend(
        &ingested,
        input.record_type,
        input.series,
    );
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Classification and formatting
// ---------------------------------------------------------------------------

fn parse_decimal(text: &str) -> NapiResult<Decimal> {
    text.trim().parse::<Decimal>().map_err(to_napi_error)
}

#[napi]
pub fn classify_variance(variance: String, record_type: String) -> NapiResult<String> {
    let variance = parse_decimal(&variance)?;
    let record_type: RecordType = record_type.parse().map_err(to_napi_error)?;
    Ok(club_finance_core::classify::classify(variance, record_type)
        .as_str()
        .to_string())
}

#[napi]
pub fn format_currency(value: String) -> String {
    club_finance_core::format::format_currency_text(&value)
}

/// Takes a ratio (0.25 renders as 25.0%); empty input renders the undefined marker.
#[napi]
pub fn format_percent(ratio: Option<String>) -> NapiResult<String> {
    let ratio = match ratio.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(text) => Some(parse_decimal(text)?),
    };
    Ok(club_finance_core::format::format_percent(ratio))
}
