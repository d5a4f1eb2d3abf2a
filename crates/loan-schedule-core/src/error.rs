use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanScheduleError {
    #[error("Invalid loan terms: {field} — {reason}")]
    InvalidTerms { field: String, reason: String },

    #[error("Missing penalty configuration: {field} is not set for this loan type")]
    MissingPenaltyConfig { field: String },

    #[error("Invalid penalty configuration: {field} — {reason}")]
    InvalidPenaltyConfig { field: String, reason: String },

    #[error("Invalid payment: {reason}")]
    InvalidPayment { reason: String },

    #[error("Date out of range: {0}")]
    DateOverflow(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl LoanScheduleError {
    pub(crate) fn invalid_terms(field: &str, reason: impl Into<String>) -> Self {
        LoanScheduleError::InvalidTerms {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for LoanScheduleError {
    fn from(e: serde_json::Error) -> Self {
        LoanScheduleError::SerializationError(e.to_string())
    }
}
