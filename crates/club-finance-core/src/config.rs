//! Report settings shared by every surface.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::format::DEFAULT_CURRENCY_SYMBOL;
use crate::ingest::IngestOptions;
use crate::types::Money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Cash at bank at the start of the season.
    #[serde(default)]
    pub opening_balance: Money,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    /// Categories shown individually in a mix before folding into "Other".
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,
    /// Reject rows whose Type is neither Revenue nor Expense.
    #[serde(default)]
    pub strict_types: bool,
}

fn default_currency_symbol() -> String {
    DEFAULT_CURRENCY_SYMBOL.to_string()
}

fn default_top_categories() -> usize {
    5
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            opening_balance: Decimal::ZERO,
            currency_symbol: default_currency_symbol(),
            top_categories: default_top_categories(),
            strict_types: false,
        }
    }
}

impl ReportConfig {
    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            strict_types: self.strict_types,
        }
    }
}
