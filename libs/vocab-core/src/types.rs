//! Core types for vocabulary progress tracking and quizzes.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Weakest retention strength; every record starts here.
pub const MIN_MEMORY_LEVEL: i32 = 1;

/// Strongest retention strength; a word at this level is mastered.
pub const MAX_MEMORY_LEVEL: i32 = 5;

/// Learning status of a progress record.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProgressStatus {
    #[default]
    NotLearned,
    Learning,
    Mastered,
    /// Only ever set through a direct progress upsert.
    Learned,
}

impl ProgressStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotLearned => "NotLearned",
            Self::Learning => "Learning",
            Self::Mastered => "Mastered",
            Self::Learned => "Learned",
        }
    }
}

impl fmt::Display for ProgressStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProgressStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NotLearned" => Ok(Self::NotLearned),
            "Learning" => Ok(Self::Learning),
            "Mastered" => Ok(Self::Mastered),
            "Learned" => Ok(Self::Learned),
            other => Err(CoreError::UnknownStatus(other.to_string())),
        }
    }
}

/// Memorization state of one learner for one word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    pub id: i64,
    pub learner_id: i64,
    pub word_id: i64,
    pub memory_level: i32,
    pub last_reviewed: Option<DateTime<Utc>>,
    pub next_review: Option<DateTime<Utc>>,
    pub review_count: i32,
    pub status: ProgressStatus,
}

impl ProgressRecord {
    /// Fresh record for a word the learner has just started.
    ///
    /// The id is 0 until the store assigns one on first save.
    pub fn new(learner_id: i64, word_id: i64) -> Self {
        Self {
            id: 0,
            learner_id,
            word_id,
            memory_level: MIN_MEMORY_LEVEL,
            last_reviewed: None,
            next_review: None,
            review_count: 0,
            status: ProgressStatus::NotLearned,
        }
    }

    /// Whether the record has been persisted yet.
    pub fn is_new(&self) -> bool {
        self.id == 0
    }

    /// A record is due once its next review time has been reached.
    /// Records that were never scheduled are not due.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review.is_some_and(|next| next <= now)
    }
}

/// A meaning of a word in some language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Translation {
    pub language: String,
    pub meaning: String,
}

/// Read-only view of a word used to build quiz questions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordCandidate {
    pub id: i64,
    pub text: String,
    #[serde(default)]
    pub translations: Vec<Translation>,
}

impl WordCandidate {
    pub fn has_translation(&self) -> bool {
        !self.translations.is_empty()
    }

    /// The string a learner is expected to pick for this word: its first
    /// translation's meaning, or the word itself when untranslated.
    pub fn answer(&self) -> &str {
        self.translations
            .first()
            .map(|t| t.meaning.as_str())
            .unwrap_or(&self.text)
    }
}

/// A single multiple-choice question. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
}

/// Score a learner reported for one completed quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizResult {
    pub id: i64,
    pub learner_id: i64,
    /// Lesson the quiz was drawn from; `None` for random quizzes.
    pub lesson_id: Option<i64>,
    pub title: String,
    pub score: i32,
    pub completed_at: DateTime<Utc>,
}

impl QuizResult {
    /// Unsaved result; the id is assigned by the store.
    pub fn new(
        learner_id: i64,
        lesson_id: Option<i64>,
        title: String,
        score: i32,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, CoreError> {
        if score < 0 {
            return Err(CoreError::NegativeScore(score));
        }
        Ok(Self {
            id: 0,
            learner_id,
            lesson_id,
            title,
            score,
            completed_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn status_round_trips_through_str() {
        for status in [
            ProgressStatus::NotLearned,
            ProgressStatus::Learning,
            ProgressStatus::Mastered,
            ProgressStatus::Learned,
        ] {
            assert_eq!(status.as_str().parse::<ProgressStatus>(), Ok(status));
        }
    }

    #[test]
    fn status_rejects_unknown_value() {
        let err = "learning".parse::<ProgressStatus>().unwrap_err();
        assert_eq!(err, CoreError::UnknownStatus("learning".to_string()));
    }

    #[test]
    fn default_status_is_not_learned() {
        assert_eq!(ProgressStatus::default(), ProgressStatus::NotLearned);
    }

    #[test]
    fn new_record_starts_not_learned() {
        let record = ProgressRecord::new(7, 42);
        assert_eq!(record.memory_level, 1);
        assert_eq!(record.review_count, 0);
        assert_eq!(record.status, ProgressStatus::NotLearned);
        assert!(record.is_new());
    }

    #[test]
    fn unscheduled_record_is_never_due() {
        let record = ProgressRecord::new(1, 1);
        assert!(!record.is_due(Utc::now()));
    }

    #[test]
    fn record_due_at_exact_next_review() {
        let at = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();
        let record = ProgressRecord {
            next_review: Some(at),
            ..ProgressRecord::new(1, 1)
        };
        assert!(record.is_due(at));
        assert!(!record.is_due(at - chrono::Duration::seconds(1)));
    }

    #[test]
    fn quiz_result_rejects_negative_score() {
        let at = Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap();
        let err = QuizResult::new(1, None, "Random Quiz".to_string(), -2, at).unwrap_err();
        assert_eq!(err, CoreError::NegativeScore(-2));

        let ok = QuizResult::new(1, Some(3), "Lesson 3 Quiz".to_string(), 0, at).unwrap();
        assert_eq!(ok.id, 0);
        assert_eq!(ok.lesson_id, Some(3));
    }

    #[test]
    fn answer_prefers_first_translation() {
        let word = WordCandidate {
            id: 1,
            text: "apple".to_string(),
            translations: vec![
                Translation {
                    language: "vi".to_string(),
                    meaning: "quả táo".to_string(),
                },
                Translation {
                    language: "fr".to_string(),
                    meaning: "pomme".to_string(),
                },
            ],
        };
        assert_eq!(word.answer(), "quả táo");
    }

    #[test]
    fn answer_falls_back_to_text() {
        let word = WordCandidate {
            id: 1,
            text: "apple".to_string(),
            translations: vec![],
        };
        assert_eq!(word.answer(), "apple");
    }
}
