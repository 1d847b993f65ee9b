use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::debug;

use crate::grouping::seasons_of;
use crate::ingest::Ingested;
use crate::records::FinancialRecord;
use crate::report::resolve_season;
use crate::rollup::{ratio, rollup, saturating_sum, total_for, GroupKey, GroupLevel};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, RecordType, Series};
use crate::ClubFinanceResult;

/// Label of the bucket collecting categories beyond the top N.
pub const OTHER_LABEL: &str = "Other";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryShare {
    pub name: String,
    pub value: Money,
    /// value / sum of all listed values
    pub share: Option<Rate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonTotal {
    pub season: String,
    pub value: Money,
}

/// Per-category totals of one series, largest first. Categories past
/// `top_n` are folded into [`OTHER_LABEL`] when their sum is positive.
pub fn category_mix(
    records: &[FinancialRecord],
    record_type: RecordType,
    series: Series,
    top_n: usize,
) -> Vec<CategoryShare> {
    let mut totals: Vec<(String, Money)> = rollup(records, GroupLevel::Category)
        .into_iter()
        .filter_map(|kt| match kt.key {
            GroupKey::Category {
                record_type: rt,
                category,
            } if rt == record_type => Some((category, kt.totals.get(series))),
            _ => None,
        })
        .collect();

    // stable: equal values keep first-occurrence order
    totals.sort_by(|a, b| b.1.cmp(&a.1));

    let rest = saturating_sum(totals.iter().skip(top_n).map(|(_, v)| *v));
    totals.truncate(top_n);
    if rest > Decimal::ZERO {
        totals.push((OTHER_LABEL.to_string(), rest));
    }

    let grand = saturating_sum(totals.iter().map(|(_, v)| *v));
    totals
        .into_iter()
        .map(|(name, value)| CategoryShare {
            share: ratio(value, grand),
            name,
            value,
        })
        .collect()
}

/// Series total of one type for every season, in first-occurrence order.
pub fn season_trend(
    records: &[FinancialRecord],
    record_type: RecordType,
    series: Series,
) -> Vec<SeasonTotal> {
    seasons_of(records)
        .into_iter()
        .map(|season| SeasonTotal {
            season: season.to_string(),
            value: total_for(records, |r| {
                r.season == season && r.record_type == record_type && r.in_series(series)
            }),
        })
        .collect()
}

/// Category mix of one season. Ingestion warnings for that season come
/// first in the envelope.
pub fn build_category_mix(
    ingested: &Ingested,
    season: Option<&str>,
    record_type: RecordType,
    series: Series,
    top_n: usize,
) -> ClubFinanceResult<ComputationOutput<Vec<CategoryShare>>> {
    let start = Instant::now();
    let season = resolve_season(&ingested.store, season)?;
    let snapshot = ingested.store.for_season(&season);
    let mix = category_mix(snapshot.records(), record_type, series, top_n);
    debug!(season = %season, %record_type, entries = mix.len(), "category mix built");

    let mut warnings = ingested.warnings_for(&season);
    if mix.iter().any(|c| c.value < Decimal::ZERO) {
        warnings.push(format!(
            "Negative {:?} {} category totals present; shares do not form a proper distribution",
            series, record_type
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Category mix: per-category series totals, top N plus Other",
        &serde_json::json!({
            "season": season,
            "type": record_type,
            "series": series,
            "top_n": top_n,
        }),
        warnings,
        elapsed,
        mix,
    ))
}

/// Trend across every season; carries all ingestion warnings.
pub fn build_season_trend(
    ingested: &Ingested,
    record_type: RecordType,
    series: Series,
) -> ComputationOutput<Vec<SeasonTotal>> {
    let start = Instant::now();
    let trend = season_trend(ingested.store.records(), record_type, series);
    debug!(%record_type, seasons = trend.len(), "season trend built");
    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Season trend: series total per season",
        &serde_json::json!({
            "type": record_type,
            "series": series,
            "seasons": trend.len(),
        }),
        ingested.warnings(),
        elapsed,
        trend,
    )
}
