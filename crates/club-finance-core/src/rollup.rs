use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::{Add, Sub};

use crate::records::FinancialRecord;
use crate::types::{Comparison, Money, Rate, RecordType, Series};

// ---------------------------------------------------------------------------
// Totals
// ---------------------------------------------------------------------------

/// Actual, budget and prior-year values for one grouping key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub actual: Money,
    pub budget: Money,
    pub prior: Money,
}

impl Totals {
    pub fn new(actual: Money, budget: Money, prior: Money) -> Self {
        Self {
            actual,
            budget,
            prior,
        }
    }

    pub fn get(&self, series: Series) -> Money {
        match series {
            Series::Actual => self.actual,
            Series::Budget => self.budget,
            Series::PriorYear => self.prior,
        }
    }

    /// Adds the record's amount to every series it is flagged for.
    pub fn accumulate(&mut self, record: &FinancialRecord) {
        if record.is_actual {
            self.actual = self.actual.saturating_add(record.amount);
        }
        if record.is_budget {
            self.budget = self.budget.saturating_add(record.amount);
        }
        if record.is_prior_year {
            self.prior = self.prior.saturating_add(record.amount);
        }
    }

    /// actual - comparison series
    pub fn variance(&self, comparison: Comparison) -> Money {
        self.actual.saturating_sub(self.get(comparison.series()))
    }

    pub fn variance_to_budget(&self) -> Money {
        self.variance(Comparison::Budget)
    }

    pub fn variance_to_prior(&self) -> Money {
        self.variance(Comparison::PriorYear)
    }
}

impl Add for Totals {
    type Output = Totals;

    fn add(self, rhs: Totals) -> Totals {
        Totals {
            actual: self.actual.saturating_add(rhs.actual),
            budget: self.budget.saturating_add(rhs.budget),
            prior: self.prior.saturating_add(rhs.prior),
        }
    }
}

impl Sub for Totals {
    type Output = Totals;

    fn sub(self, rhs: Totals) -> Totals {
        Totals {
            actual: self.actual.saturating_sub(rhs.actual),
            budget: self.budget.saturating_sub(rhs.budget),
            prior: self.prior.saturating_sub(rhs.prior),
        }
    }
}

impl std::iter::Sum for Totals {
    fn sum<I: Iterator<Item = Totals>>(iter: I) -> Totals {
        iter.fold(Totals::default(), |acc, t| acc + t)
    }
}

// ---------------------------------------------------------------------------
// Grouping keys
// ---------------------------------------------------------------------------

/// Which key is held constant when rolling up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GroupLevel {
    Item,
    Category,
    Type,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "level")]
pub enum GroupKey {
    Type {
        record_type: RecordType,
    },
    Category {
        record_type: RecordType,
        category: String,
    },
    Item {
        record_type: RecordType,
        category: String,
        item: String,
    },
}

impl GroupKey {
    pub fn of(record: &FinancialRecord, level: GroupLevel) -> GroupKey {
        match level {
            GroupLevel::Type => GroupKey::Type {
                record_type: record.record_type,
            },
            GroupLevel::Category => GroupKey::Category {
                record_type: record.record_type,
                category: record.category.clone(),
            },
            GroupLevel::Item => GroupKey::Item {
                record_type: record.record_type,
                category: record.category.clone(),
                item: record.item.clone(),
            },
        }
    }

    pub fn record_type(&self) -> RecordType {
        match self {
            GroupKey::Type { record_type }
            | GroupKey::Category { record_type, .. }
            | GroupKey::Item { record_type, .. } => *record_type,
        }
    }

    pub fn matches(&self, record: &FinancialRecord) -> bool {
        match self {
            GroupKey::Type { record_type } => record.record_type == *record_type,
            GroupKey::Category {
                record_type,
                category,
            } => record.record_type == *record_type && record.category == *category,
            GroupKey::Item {
                record_type,
                category,
                item,
            } => {
                record.record_type == *record_type
                    && record.category == *category
                    && record.item == *item
            }
        }
    }
}

/// One entry of a rollup: a key and its three series totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyedTotals {
    pub key: GroupKey,
    pub totals: Totals,
}

// ---------------------------------------------------------------------------
// Summation
// ---------------------------------------------------------------------------

/// Sum of `amount` over every record matching `predicate`. Saturates at the
/// Decimal bounds instead of overflowing.
pub fn total_for<P>(records: &[FinancialRecord], predicate: P) -> Money
where
    P: Fn(&FinancialRecord) -> bool,
{
    saturating_sum(records.iter().filter(|r| predicate(r)).map(|r| r.amount))
}

pub fn saturating_sum<I>(values: I) -> Money
where
    I: IntoIterator<Item = Money>,
{
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(v))
}

/// Series total for a whole type, e.g. actual revenue.
pub fn series_total(records: &[FinancialRecord], record_type: RecordType, series: Series) -> Money {
    total_for(records, |r| r.record_type == record_type && r.in_series(series))
}

/// Totals for one key. Several records flagged for the same series under the
/// same key are summed.
pub fn totals_for(records: &[FinancialRecord], key: &GroupKey) -> Totals {
    let series_sum = |series: Series| total_for(records, |r| key.matches(r) && r.in_series(series));
    Totals::new(
        series_sum(Series::Actual),
        series_sum(Series::Budget),
        series_sum(Series::PriorYear),
    )
}

/// Totals for every key at `level`, in first-occurrence order of the keys.
pub fn rollup(records: &[FinancialRecord], level: GroupLevel) -> Vec<KeyedTotals> {
    let mut index: HashMap<GroupKey, usize> = HashMap::new();
    let mut out: Vec<KeyedTotals> = Vec::new();

    for record in records {
        let key = GroupKey::of(record, level);
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                index.insert(key.clone(), out.len());
                out.push(KeyedTotals {
                    key,
                    totals: Totals::default(),
                });
                out.len() - 1
            }
        };
        out[slot].totals.accumulate(record);
    }

    out
}

/// Net profit per series, from already rolled-up revenue and expense totals.
/// Both are stored as positive magnitudes.
pub fn net_profit(revenue: &Totals, expense: &Totals) -> Totals {
    *revenue - *expense
}

// ---------------------------------------------------------------------------
// Ratios
// ---------------------------------------------------------------------------

/// profit / revenue; `None` when revenue is zero or the ratio is out of
/// Decimal range.
pub fn margin(profit: Money, revenue: Money) -> Option<Rate> {
    ratio(profit, revenue)
}

/// Difference of two margins; undefined if either side is.
pub fn margin_delta(current: Option<Rate>, baseline: Option<Rate>) -> Option<Rate> {
    current?.checked_sub(baseline?)
}

/// variance / baseline; `None` when the baseline is zero.
pub fn variance_pct(variance: Money, baseline: Money) -> Option<Rate> {
    ratio(variance, baseline)
}

/// numerator / denominator, undefined on a zero denominator or overflow.
pub fn ratio(numerator: Decimal, denominator: Decimal) -> Option<Rate> {
    if denominator.is_zero() {
        return None;
    }
    numerator.checked_div(denominator)
}

/// Net profit margin for each series, computed independently.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margins {
    pub actual: Option<Rate>,
    pub budget: Option<Rate>,
    pub prior: Option<Rate>,
}

impl Margins {
    pub fn from_totals(profit: &Totals, revenue: &Totals) -> Self {
        Self {
            actual: margin(profit.actual, revenue.actual),
            budget: margin(profit.budget, revenue.budget),
            prior: margin(profit.prior, revenue.prior),
        }
    }

    pub fn get(&self, series: Series) -> Option<Rate> {
        match series {
            Series::Actual => self.actual,
            Series::Budget => self.budget,
            Series::PriorYear => self.prior,
        }
    }

    /// Actual margin minus the comparison margin.
    pub fn delta(&self, comparison: Comparison) -> Option<Rate> {
        margin_delta(self.actual, self.get(comparison.series()))
    }
}
