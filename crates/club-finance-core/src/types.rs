use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ClubFinanceError;

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Top-level classification of a line item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordType {
    Revenue,
    Expense,
}

impl RecordType {
    pub const ALL: [RecordType; 2] = [RecordType::Revenue, RecordType::Expense];

    pub fn as_str(&self) -> &'static str {
        match self {
            RecordType::Revenue => "Revenue",
            RecordType::Expense => "Expense",
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecordType {
    type Err = ClubFinanceError;

    /// Case-insensitive; surrounding whitespace is ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("revenue") {
            Ok(RecordType::Revenue)
        } else if trimmed.eq_ignore_ascii_case("expense") {
            Ok(RecordType::Expense)
        } else {
            Err(ClubFinanceError::InvalidInput {
                field: "Type".into(),
                reason: format!("'{}' is neither Revenue nor Expense", trimmed),
            })
        }
    }
}

/// One of the three parallel value tracks carried by every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Series {
    Actual,
    Budget,
    PriorYear,
}

impl Series {
    pub const ALL: [Series; 3] = [Series::Actual, Series::Budget, Series::PriorYear];
}

/// The series actuals are compared against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Comparison {
    Budget,
    PriorYear,
}

impl Comparison {
    pub fn series(&self) -> Series {
        match self {
            Comparison::Budget => Series::Budget,
            Comparison::PriorYear => Series::PriorYear,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_type_parse_is_lenient_about_case_and_whitespace() {
        assert_eq!(" revenue ".parse::<RecordType>().unwrap(), RecordType::Revenue);
        assert_eq!("EXPENSE".parse::<RecordType>().unwrap(), RecordType::Expense);
    }

    #[test]
    fn test_record_type_parse_rejects_unknown() {
        let err = "Transfer".parse::<RecordType>().unwrap_err();
        assert!(err.to_string().contains("Transfer"));
    }

    #[test]
    fn test_comparison_maps_to_series() {
        assert_eq!(Comparison::Budget.series(), Series::Budget);
        assert_eq!(Comparison::PriorYear.series(), Series::PriorYear);
    }
}
