pub mod analytics;
pub mod classify;
pub mod report;

use clap::{Args, ValueEnum};
use club_finance_core::{RecordType, Series};

/// Where the season table comes from and which season to report.
#[derive(Args)]
pub struct SourceArgs {
    /// Path to the season table CSV (reads stdin when omitted)
    #[arg(long)]
    pub input: Option<String>,

    /// Season label, e.g. 2024/25 (defaults to the first season in the table)
    #[arg(long)]
    pub season: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TypeArg {
    Revenue,
    Expense,
}

impl From<TypeArg> for RecordType {
    fn from(t: TypeArg) -> Self {
        match t {
            TypeArg::Revenue => RecordType::Revenue,
            TypeArg::Expense => RecordType::Expense,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SeriesArg {
    Actual,
    Budget,
    Prior,
}

impl From<SeriesArg> for Series {
    fn from(s: SeriesArg) -> Self {
        match s {
            SeriesArg::Actual => Series::Actual,
            SeriesArg::Budget => Series::Budget,
            SeriesArg::Prior => Series::PriorYear,
        }
    }
}
