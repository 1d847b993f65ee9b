//! Distinct categories, items and seasons in the order the source table
//! introduced them.

use std::collections::HashSet;

use crate::records::FinancialRecord;
use crate::types::RecordType;

/// Keeps the first occurrence of every key, in input order.
fn distinct_in_order<'a, I>(keys: I) -> Vec<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    keys.into_iter().filter(|k| seen.insert(*k)).collect()
}

/// Distinct categories of `record_type`.
pub fn categories_of(records: &[FinancialRecord], record_type: RecordType) -> Vec<&str> {
    distinct_in_order(
        records
            .iter()
            .filter(|r| r.record_type == record_type)
            .map(|r| r.category.as_str()),
    )
}

/// Distinct items within one category of `record_type`.
pub fn items_of<'a>(
    records: &'a [FinancialRecord],
    category: &str,
    record_type: RecordType,
) -> Vec<&'a str> {
    distinct_in_order(
        records
            .iter()
            .filter(|r| r.record_type == record_type && r.category == category)
            .map(|r| r.item.as_str()),
    )
}

pub fn seasons_of(records: &[FinancialRecord]) -> Vec<&str> {
    distinct_in_order(records.iter().map(|r| r.season.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::fixtures::record;
    use crate::types::Series;
    use rust_decimal_macros::dec;

    fn sample() -> Vec<FinancialRecord> {
        vec![
            record("s", RecordType::Revenue, "Subscriptions", "Seniors", dec!(10), Series::Actual),
            record("s", RecordType::Expense, "Player Payments", "Coach", dec!(9000), Series::Actual),
            record("s", RecordType::Revenue, "Bar & Food", "Bar", dec!(5), Series::Actual),
            record("s", RecordType::Revenue, "Subscriptions", "Juniors", dec!(3), Series::Budget),
            record("s", RecordType::Revenue, "Subscriptions", "Seniors", dec!(12), Series::Budget),
            record("s", RecordType::Revenue, "Bar & Food", "Food", dec!(2), Series::Actual),
        ]
    }

    #[test]
    fn test_categories_follow_input_order_not_alphabetical() {
        let records = sample();
        assert_eq!(
            categories_of(&records, RecordType::Revenue),
            vec!["Subscriptions", "Bar & Food"]
        );
        assert_eq!(
            categories_of(&records, RecordType::Expense),
            vec!["Player Payments"]
        );
    }

    #[test]
    fn test_items_are_distinct_within_category() {
        let records = sample();
        assert_eq!(
            items_of(&records, "Subscriptions", RecordType::Revenue),
            vec!["Seniors", "Juniors"]
        );
    }

    #[test]
    fn test_items_respect_type() {
        let records = sample();
        assert!(items_of(&records, "Subscriptions", RecordType::Expense).is_empty());
    }

    #[test]
    fn test_empty_input_yields_empty_sequences() {
        assert!(categories_of(&[], RecordType::Revenue).is_empty());
        assert!(items_of(&[], "Anything", RecordType::Expense).is_empty());
        assert!(seasons_of(&[]).is_empty());
    }
}
