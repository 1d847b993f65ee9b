use serde::{Deserialize, Serialize};

use crate::grouping;
use crate::types::{Money, RecordType, Series};

/// One strictly typed line of the season table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// Season label, e.g. "2024/25"
    pub season: String,
    pub record_type: RecordType,
    /// Mid-level grouping, e.g. "Sponsorships"
    pub category: String,
    /// Leaf-level line description
    pub item: String,
    pub amount: Money,
    pub is_actual: bool,
    pub is_budget: bool,
    pub is_prior_year: bool,
}

impl FinancialRecord {
    /// Whether this row carries a value for `series`. Flags are not
    /// mutually exclusive.
    pub fn in_series(&self, series: Series) -> bool {
        match series {
            Series::Actual => self.is_actual,
            Series::Budget => self.is_budget,
            Series::PriorYear => self.is_prior_year,
        }
    }

    pub fn series_flags(&self) -> usize {
        [self.is_actual, self.is_budget, self.is_prior_year]
            .iter()
            .filter(|f| **f)
            .count()
    }
}

/// Ordered, immutable snapshot of ingested records.
///
/// A new store is built whenever new source data arrives; there is no append.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordStore {
    records: Vec<FinancialRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<FinancialRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[FinancialRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct season labels in the order they first appear.
    pub fn seasons(&self) -> Vec<&str> {
        grouping::seasons_of(&self.records)
    }

    /// The season selected when the caller names none: the first one seen.
    pub fn default_season(&self) -> Option<&str> {
        self.records.first().map(|r| r.season.as_str())
    }

    /// Snapshot restricted to one season, preserving input order.
    pub fn for_season(&self, season: &str) -> RecordStore {
        RecordStore {
            records: self
                .records
                .iter()
                .filter(|r| r.season == season)
                .cloned()
                .collect(),
        }
    }
}

impl From<Vec<FinancialRecord>> for RecordStore {
    fn from(records: Vec<FinancialRecord>) -> Self {
        Self::new(records)
    }
}
