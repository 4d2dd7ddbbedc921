//! Database models and API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// Re-export shared types from vocab-core
pub use vocab_core::{
    ProgressFields, ProgressRecord, ProgressStatistics, ProgressStatus, QuizQuestion, QuizResult,
    Translation, WordCandidate,
};

// === Database Entity Types ===

/// Learner resolved from a bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Learner {
    pub id: i64,
    pub username: String,
}

/// Progress row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbProgress {
    pub id: i64,
    pub learner_id: i64,
    pub word_id: i64,
    pub memory_level: i32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
    pub review_count: i32,
    pub status: String,
}

impl DbProgress {
    /// Convert to vocab-core ProgressRecord
    pub fn into_record(self) -> ProgressRecord {
        ProgressRecord {
            id: self.id,
            learner_id: self.learner_id,
            word_id: self.word_id,
            memory_level: self.memory_level,
            last_reviewed: self.last_reviewed,
            next_review: self.next_review,
            review_count: self.review_count,
            status: self.status.parse().unwrap_or_default(),
        }
    }
}

/// Quiz result row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbQuizResult {
    pub id: i64,
    pub learner_id: i64,
    pub lesson_id: Option<i64>,
    pub title: String,
    pub score: i32,
    pub completed_at: DateTime<Utc>,
}

impl DbQuizResult {
    /// Convert to vocab-core QuizResult
    pub fn into_result(self) -> QuizResult {
        QuizResult {
            id: self.id,
            learner_id: self.learner_id,
            lesson_id: self.lesson_id,
            title: self.title,
            score: self.score,
            completed_at: self.completed_at,
        }
    }
}

/// Word row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbWord {
    pub id: i64,
    pub word_text: String,
}

/// Translation row in PostgreSQL
#[derive(Debug, Clone, FromRow)]
pub struct DbTranslation {
    pub word_id: i64,
    pub language: String,
    pub meaning: String,
}

// === API Request/Response Types ===

/// POST /api/progress request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertProgressRequest {
    pub word_id: i64,
    #[serde(flatten)]
    pub fields: ProgressFields,
}

/// POST /api/progress/track request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackWordRequest {
    pub word_id: i64,
}

/// GET /api/progress/due query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DueQuery {
    pub lesson_id: Option<i64>,
}

/// Progress record together with the word it tracks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressWithWord {
    #[serde(flatten)]
    pub progress: ProgressRecord,
    pub word: Option<WordCandidate>,
}

/// POST /api/quizzes/random request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomQuizRequest {
    pub question_count: usize,
}

/// POST /api/quiz-results request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitQuizResultRequest {
    #[serde(default)]
    pub lesson_id: Option<i64>,
    pub title: String,
    pub score: i32,
}

/// Generated quiz response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizResponse {
    pub title: String,
    pub questions: Vec<QuizQuestion>,
}
