//! Learner progress and quiz score statistics.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProgressRecord, ProgressStatus, QuizResult, MAX_MEMORY_LEVEL};

/// Summary of a learner's progress across all tracked words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressStatistics {
    /// Words the learner has started in any way.
    pub total_words_learned: usize,
    pub mastered_words: usize,
    /// Percentage of learned words that are mastered, two decimals.
    pub mastery_rate: f64,
    pub words_due: usize,
    pub quizzes_completed: usize,
    /// Mean reported score, two decimals; 0 before any quiz.
    pub average_quiz_score: f64,
}

pub fn progress_statistics(
    records: &[ProgressRecord],
    quiz_results: &[QuizResult],
    now: DateTime<Utc>,
) -> ProgressStatistics {
    let total_words_learned = records
        .iter()
        .filter(|r| r.status != ProgressStatus::NotLearned)
        .count();
    let mastered_words = records
        .iter()
        .filter(|r| r.memory_level == MAX_MEMORY_LEVEL)
        .count();
    let words_due = records.iter().filter(|r| r.is_due(now)).count();

    let mastery_rate = if total_words_learned > 0 {
        round2(mastered_words as f64 / total_words_learned as f64 * 100.0)
    } else {
        0.0
    };

    let quizzes_completed = quiz_results.len();
    let average_quiz_score = if quizzes_completed > 0 {
        let total: i64 = quiz_results.iter().map(|r| i64::from(r.score)).sum();
        round2(total as f64 / quizzes_completed as f64)
    } else {
        0.0
    };

    ProgressStatistics {
        total_words_learned,
        mastered_words,
        mastery_rate,
        words_due,
        quizzes_completed,
        average_quiz_score,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
