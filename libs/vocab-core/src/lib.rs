//! Core vocabulary-learning library shared by the backend service.
//!
//! Provides:
//! - Progress record model and the fixed-interval review schedule
//! - Multiple-choice quiz generation from a word set
//! - Learner progress and quiz score statistics
//! - Lenient ISO-8601 date parsing for caller-supplied progress fields

pub mod dates;
pub mod error;
pub mod quiz;
pub mod scheduler;
pub mod stats;
pub mod types;

pub use error::{CoreError, Result};
pub use quiz::{generate_questions, DEFAULT_MAX_QUESTIONS};
pub use scheduler::{apply_review, review_interval, status_for, ProgressFields};
pub use stats::{progress_statistics, ProgressStatistics};
pub use types::{
    ProgressRecord, ProgressStatus, QuizQuestion, QuizResult, Translation, WordCandidate,
    MAX_MEMORY_LEVEL, MIN_MEMORY_LEVEL,
};
