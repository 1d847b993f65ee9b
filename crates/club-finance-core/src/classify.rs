//! Favorable / unfavorable judgment of a signed variance.
//!
//! Variances are always `actual - comparison`. For revenue (and net profit)
//! a positive variance is good; for expenses the convention inverts. Every
//! surface that shows a variance goes through [`classify`] or
//! [`classify_with`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{Money, RecordType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarianceClass {
    Favorable,
    Unfavorable,
    Neutral,
}

impl VarianceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarianceClass::Favorable => "Favorable",
            VarianceClass::Unfavorable => "Unfavorable",
            VarianceClass::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for VarianceClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Direction in which a line is better.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Polarity {
    HigherIsBetter,
    LowerIsBetter,
}

impl From<RecordType> for Polarity {
    fn from(record_type: RecordType) -> Self {
        match record_type {
            RecordType::Revenue => Polarity::HigherIsBetter,
            RecordType::Expense => Polarity::LowerIsBetter,
        }
    }
}

pub fn classify(variance: Money, record_type: RecordType) -> VarianceClass {
    classify_with(variance, record_type.into())
}

pub fn classify_with(variance: Money, polarity: Polarity) -> VarianceClass {
    if variance.is_zero() {
        return VarianceClass::Neutral;
    }
    let increased = variance.is_sign_positive();
    match (polarity, increased) {
        (Polarity::HigherIsBetter, true) | (Polarity::LowerIsBetter, false) => {
            VarianceClass::Favorable
        }
        _ => VarianceClass::Unfavorable,
    }
}
