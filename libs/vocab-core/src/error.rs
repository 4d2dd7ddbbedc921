//! Error types for vocab-core.

use thiserror::Error;

/// Result type alias using CoreError.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors raised by the scheduling and quiz logic.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("no words available to build a quiz")]
    NoWords,

    #[error("at least one question must be requested")]
    NoQuestionsRequested,

    #[error("invalid date for {field}: {value}")]
    InvalidDate { field: &'static str, value: String },

    #[error("memory level {0} is outside 1-5")]
    MemoryLevelOutOfRange(i32),

    #[error("review count {0} must not be negative")]
    NegativeReviewCount(i32),

    #[error("unknown progress status: {0}")]
    UnknownStatus(String),

    #[error("next review must be later than last reviewed")]
    ReviewOrder,

    #[error("quiz score {0} must not be negative")]
    NegativeScore(i32),
}

impl CoreError {
    /// Whether the error comes from an unusable quiz request rather than
    /// malformed progress input.
    pub fn is_quiz_input(&self) -> bool {
        matches!(self, Self::NoWords | Self::NoQuestionsRequested)
    }
}
