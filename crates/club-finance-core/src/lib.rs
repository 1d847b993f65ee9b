pub mod classify;
pub mod config;
pub mod error;
pub mod format;
pub mod grouping;
pub mod ingest;
pub mod records;
pub mod rollup;
pub mod types;

#[cfg(feature = "report")]
pub mod report;

#[cfg(feature = "analytics")]
pub mod analytics;

pub use error::ClubFinanceError;
pub use types::*;

/// Standard result type for all club-finance operations
pub type ClubFinanceResult<T> = Result<T, ClubFinanceError>;
