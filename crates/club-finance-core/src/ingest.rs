//! The single coercion step between loosely typed table rows and
//! [`FinancialRecord`]. Everything downstream sees typed values only.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::error::ClubFinanceError;
use crate::records::{FinancialRecord, RecordStore};
use crate::types::{Money, RecordType, Series};
use crate::ClubFinanceResult;

// ---------------------------------------------------------------------------
// Raw rows
// ---------------------------------------------------------------------------

/// One row as it arrives from the season table. Cells may be text, numbers,
/// booleans or empty; all are kept as text until [`ingest`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    #[serde(rename = "Year", default, deserialize_with = "lenient_text")]
    pub year: String,
    #[serde(rename = "Type", default, deserialize_with = "lenient_text")]
    pub record_type: String,
    #[serde(rename = "Category", default, deserialize_with = "lenient_text")]
    pub category: String,
    #[serde(rename = "Item", default, deserialize_with = "lenient_text")]
    pub item: String,
    #[serde(rename = "Amount", default, deserialize_with = "lenient_text")]
    pub amount: String,
    #[serde(rename = "IsActual", default, deserialize_with = "lenient_text")]
    pub is_actual: String,
    #[serde(rename = "IsBudget", default, deserialize_with = "lenient_text")]
    pub is_budget: String,
    #[serde(rename = "IsPriorYear", default, deserialize_with = "lenient_text")]
    pub is_prior_year: String,
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct TextVisitor;

    impl<'de> Visitor<'de> for TextVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a string, number, boolean or empty cell")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_string<E: de::Error>(self, v: String) -> Result<String, E> {
            Ok(v)
        }

        fn visit_bool<E: de::Error>(self, v: bool) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_unit<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_none<E: de::Error>(self) -> Result<String, E> {
            Ok(String::new())
        }

        fn visit_some<D2>(self, deserializer: D2) -> Result<String, D2::Error>
        where
            D2: Deserializer<'de>,
        {
            deserializer.deserialize_any(TextVisitor)
        }
    }

    deserializer.deserialize_any(TextVisitor)
}

// ---------------------------------------------------------------------------
// Coercion
// ---------------------------------------------------------------------------

/// Parses an amount cell. A leading currency symbol and thousands
/// separators are tolerated; anything else non-numeric yields `None`.
pub fn coerce_amount(text: &str) -> Option<Money> {
    let cleaned: String = text
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}

/// Largest accepted amount magnitude.
pub const MAX_ABS_AMOUNT: Money = dec!(1000000000000000);

/// `true`, `1`, `yes`, `y` (any case) are set; everything else is not.
pub fn coerce_flag(text: &str) -> bool {
    matches!(
        text.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "y"
    )
}

// ---------------------------------------------------------------------------
// Anomalies
// ---------------------------------------------------------------------------

/// A data-integrity problem found while ingesting. Rows are numbered from 1,
/// excluding the header. Every anomaly names the season it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum Anomaly {
    /// Row excluded from every typed rollup.
    UnknownType { row: usize, season: String, value: String },
    /// Amount coerced to zero; the row is kept.
    NonNumericAmount { row: usize, season: String, value: String },
    /// Amount beyond [`MAX_ABS_AMOUNT`]; coerced to zero, the row is kept.
    AmountOutOfRange { row: usize, season: String, value: String },
    NoSeriesFlag { row: usize, season: String },
    MultipleSeriesFlags { row: usize, season: String, flags: usize },
    MissingSeason { row: usize },
    /// More than one record for the same line and series; values are summed.
    DuplicateSeries {
        season: String,
        record_type: RecordType,
        category: String,
        item: String,
        series: Series,
        count: usize,
    },
}

impl Anomaly {
    /// Season label of the offending row; empty for [`Anomaly::MissingSeason`].
    pub fn season(&self) -> &str {
        match self {
            Anomaly::UnknownType { season, .. }
            | Anomaly::NonNumericAmount { season, .. }
            | Anomaly::AmountOutOfRange { season, .. }
            | Anomaly::NoSeriesFlag { season, .. }
            | Anomaly::MultipleSeriesFlags { season, .. }
            | Anomaly::DuplicateSeries { season, .. } => season,
            Anomaly::MissingSeason { .. } => "",
        }
    }
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Anomaly::UnknownType { row, value, .. } => write!(
                f,
                "Row {}: unknown Type '{}' (expected Revenue or Expense); row excluded",
                row, value
            ),
            Anomaly::NonNumericAmount { row, value, .. } => {
                write!(f, "Row {}: Amount '{}' is not numeric; treated as 0", row, value)
            }
            Anomaly::AmountOutOfRange { row, value, .. } => write!(
                f,
                "Row {}: Amount '{}' exceeds {} in magnitude; treated as 0",
                row, value, MAX_ABS_AMOUNT
            ),
            Anomaly::NoSeriesFlag { row, .. } => write!(
                f,
                "Row {}: none of IsActual/IsBudget/IsPriorYear is set; row contributes to no series",
                row
            ),
            Anomaly::MultipleSeriesFlags { row, flags, .. } => write!(
                f,
                "Row {}: {} series flags set; amount counted in each",
                row, flags
            ),
            Anomaly::MissingSeason { row } => write!(f, "Row {}: empty Year", row),
            Anomaly::DuplicateSeries {
                season,
                record_type,
                category,
                item,
                series,
                count,
            } => write!(
                f,
                "{} {} / {} / {}: {} {:?} records; amounts summed",
                season, record_type, category, item, count, series
            ),
        }
    }
}

// ---------------------------------------------------------------------------
// Ingestion
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestOptions {
    /// Fail on an unknown Type instead of excluding the row.
    #[serde(default)]
    pub strict_types: bool,
}

/// Typed snapshot plus everything that looked wrong on the way in.
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub store: RecordStore,
    pub anomalies: Vec<Anomaly>,
}

impl Ingested {
    pub fn warnings(&self) -> Vec<String> {
        self.anomalies.iter().map(|a| a.to_string()).collect()
    }

    /// Warnings for rows of one season only.
    pub fn warnings_for(&self, season: &str) -> Vec<String> {
        self.anomalies
            .iter()
            .filter(|a| a.season() == season)
            .map(|a| a.to_string())
            .collect()
    }
}

type LineSeriesKey = (String, RecordType, String, String, Series);

/// Validates and coerces raw rows into a [`RecordStore`].
pub fn ingest(rows: &[RawRecord], options: &IngestOptions) -> ClubFinanceResult<Ingested> {
    let mut records = Vec::with_capacity(rows.len());
    let mut anomalies = Vec::new();

    for (i, raw) in rows.iter().enumerate() {
        let row = i + 1;
        let season = raw.year.trim().to_string();

        let record_type = match RecordType::from_str(&raw.record_type) {
            Ok(rt) => rt,
            Err(_) if options.strict_types => {
                return Err(ClubFinanceError::UnknownRecordType {
                    row,
                    value: raw.record_type.trim().to_string(),
                });
            }
            Err(_) => {
                anomalies.push(Anomaly::UnknownType {
                    row,
                    season,
                    value: raw.record_type.trim().to_string(),
                });
                continue;
            }
        };

        let amount = match coerce_amount(&raw.amount) {
            Some(v) if v.abs() <= MAX_ABS_AMOUNT => v,
            Some(_) => {
                anomalies.push(Anomaly::AmountOutOfRange {
                    row,
                    season: season.clone(),
                    value: raw.amount.trim().to_string(),
                });
                Decimal::ZERO
            }
            None => {
                anomalies.push(Anomaly::NonNumericAmount {
                    row,
                    season: season.clone(),
                    value: raw.amount.clone(),
                });
                Decimal::ZERO
            }
        };

        if season.is_empty() {
            anomalies.push(Anomaly::MissingSeason { row });
        }

        let record = FinancialRecord {
            season,
            record_type,
            category: raw.category.trim().to_string(),
            item: raw.item.trim().to_string(),
            amount,
            is_actual: coerce_flag(&raw.is_actual),
            is_budget: coerce_flag(&raw.is_budget),
            is_prior_year: coerce_flag(&raw.is_prior_year),
        };

        match record.series_flags() {
            0 => anomalies.push(Anomaly::NoSeriesFlag {
                row,
                season: record.season.clone(),
            }),
            1 => {}
            flags => anomalies.push(Anomaly::MultipleSeriesFlags {
                row,
                season: record.season.clone(),
                flags,
            }),
        }

        records.push(record);
    }

    anomalies.extend(duplicate_series(&records));

    for anomaly in &anomalies {
        warn!(%anomaly, "ingestion anomaly");
    }
    debug!(
        rows = rows.len(),
        records = records.len(),
        anomalies = anomalies.len(),
        "ingested season table"
    );

    Ok(Ingested {
        store: RecordStore::new(records),
        anomalies,
    })
}

/// Lines carrying more than one record for the same series, in the order the
/// line first appeared.
fn duplicate_series(records: &[FinancialRecord]) -> Vec<Anomaly> {
    let mut counts: HashMap<LineSeriesKey, usize> = HashMap::new();
    let mut order: Vec<LineSeriesKey> = Vec::new();

    for r in records {
        for series in Series::ALL {
            if !r.in_series(series) {
                continue;
            }
            let key = (
                r.season.clone(),
                r.record_type,
                r.category.clone(),
                r.item.clone(),
                series,
            );
            let count = counts.entry(key.clone()).or_insert(0);
            *count += 1;
            if *count == 2 {
                order.push(key);
            }
        }
    }

    order
        .into_iter()
        .map(|key| {
            let count = counts[&key];
            let (season, record_type, category, item, series) = key;
            Anomaly::DuplicateSeries {
                season,
                record_type,
                category,
                item,
                series,
                count,
            }
        })
        .collect()
}
