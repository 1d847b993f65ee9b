use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClubFinanceError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Unknown record type '{value}' on row {row} (expected Revenue or Expense)")]
    UnknownRecordType { row: usize, value: String },

    #[error("Season not found: {0}")]
    SeasonNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for ClubFinanceError {
    fn from(e: serde_json::Error) -> Self {
        ClubFinanceError::SerializationError(e.to_string())
    }
}
