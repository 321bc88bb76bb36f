use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RehabError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid region pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Invalid input '{field}': {reason}")]
    InvalidInput { field: &'static str, reason: String },

    #[error("Invalid policy: {reason}")]
    InvalidPolicy { reason: String },

    #[error("No policy snapshot available for {date}")]
    PolicyNotFound { date: NaiveDate },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl RehabError {
    pub fn invalid_input(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput { field, reason: reason.into() }
    }

    pub fn invalid_policy(reason: impl Into<String>) -> Self {
        Self::InvalidPolicy { reason: reason.into() }
    }
}

pub type RehabResult<T> = Result<T, RehabError>;
