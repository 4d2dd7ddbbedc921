//! Record store consumed by the progress and quiz services.
//!
//! Words, lessons and learners are owned elsewhere; the services only read
//! them. Progress records and quiz results are written here, and
//! [`Store::save_progress`] must apply the whole record atomically.

pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use vocab_core::{ProgressRecord, ProgressStatus, QuizResult, WordCandidate};

use crate::error::Result;
use crate::models::Learner;

pub use memory::MemoryStore;

#[async_trait]
pub trait Store: Send + Sync {
    // === Progress ===

    async fn get_progress(&self, id: i64) -> Result<Option<ProgressRecord>>;

    async fn find_progress(&self, learner_id: i64, word_id: i64) -> Result<Option<ProgressRecord>>;

    /// Insert or replace the record for its (learner, word) pair and return
    /// it as stored, with its id assigned.
    async fn save_progress(&self, record: &ProgressRecord) -> Result<ProgressRecord>;

    /// Records whose next review is at or before `now`, soonest first,
    /// optionally restricted to the words of one lesson.
    async fn due_progress(
        &self,
        learner_id: i64,
        now: DateTime<Utc>,
        lesson_id: Option<i64>,
    ) -> Result<Vec<ProgressRecord>>;

    async fn progress_by_status(
        &self,
        learner_id: i64,
        status: ProgressStatus,
    ) -> Result<Vec<ProgressRecord>>;

    async fn progress_for_lesson(&self, learner_id: i64, lesson_id: i64)
        -> Result<Vec<ProgressRecord>>;

    async fn learner_progress(&self, learner_id: i64) -> Result<Vec<ProgressRecord>>;

    // === Words & lessons ===

    async fn word_exists(&self, word_id: i64) -> Result<bool>;

    /// Words with the given ids; unknown ids are skipped.
    async fn get_words(&self, word_ids: &[i64]) -> Result<Vec<WordCandidate>>;

    async fn lesson_exists(&self, lesson_id: i64) -> Result<bool>;

    async fn words_for_lesson(&self, lesson_id: i64) -> Result<Vec<WordCandidate>>;

    /// Words the learner has moved past `NotLearned`.
    async fn started_words(&self, learner_id: i64) -> Result<Vec<WordCandidate>>;

    // === Quiz results ===

    /// Append a result and return it with its id assigned.
    async fn save_quiz_result(&self, result: &QuizResult) -> Result<QuizResult>;

    /// The learner's results, most recently completed first.
    async fn quiz_results(&self, learner_id: i64) -> Result<Vec<QuizResult>>;

    // === Learners ===

    async fn find_learner_by_token(&self, token: &str) -> Result<Option<Learner>>;
}
