//! Quiz building on top of the store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use vocab_core::{
    generate_questions, QuizQuestion, QuizResult, WordCandidate, DEFAULT_MAX_QUESTIONS,
};

use crate::error::{ApiError, Result};
use crate::models::{QuizResponse, SubmitQuizResultRequest};
use crate::store::Store;

/// Largest random quiz a learner may request.
pub const MAX_RANDOM_QUESTIONS: usize = 50;

pub struct QuizService {
    store: Arc<dyn Store>,
}

impl QuizService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Quiz over the words of one lesson.
    pub async fn lesson_quiz(&self, lesson_id: i64, now: DateTime<Utc>) -> Result<QuizResponse> {
        if !self.store.lesson_exists(lesson_id).await? {
            tracing::warn!("Lesson {} not found", lesson_id);
            return Err(ApiError::NotFound(format!("Lesson {lesson_id}")));
        }

        let words = self.store.words_for_lesson(lesson_id).await?;
        let questions = build(&words, DEFAULT_MAX_QUESTIONS)?;

        tracing::info!(
            "Generated {} questions for lesson {}",
            questions.len(),
            lesson_id
        );
        Ok(QuizResponse {
            title: format!("Lesson {} Quiz - {}", lesson_id, now.format("%Y%m%d%H%M%S")),
            questions,
        })
    }

    /// Quiz over words the learner has already started.
    pub async fn random_quiz(
        &self,
        learner_id: i64,
        question_count: usize,
        now: DateTime<Utc>,
    ) -> Result<QuizResponse> {
        if !(1..=MAX_RANDOM_QUESTIONS).contains(&question_count) {
            return Err(ApiError::Validation(format!(
                "question count must be between 1 and {MAX_RANDOM_QUESTIONS}"
            )));
        }

        let words = self.store.started_words(learner_id).await?;
        let questions = build(&words, question_count)?;

        tracing::info!(
            "Generated random quiz of {} questions for learner {}",
            questions.len(),
            learner_id
        );
        Ok(QuizResponse {
            title: format!("Random Quiz - {}", now.format("%Y%m%d%H%M%S")),
            questions,
        })
    }

    /// Record the score a learner reports for a finished quiz.
    pub async fn submit_result(
        &self,
        learner_id: i64,
        request: SubmitQuizResultRequest,
        now: DateTime<Utc>,
    ) -> Result<QuizResult> {
        if let Some(lesson_id) = request.lesson_id {
            if !self.store.lesson_exists(lesson_id).await? {
                tracing::warn!("Lesson {} not found", lesson_id);
                return Err(ApiError::NotFound(format!("Lesson {lesson_id}")));
            }
        }

        let result = QuizResult::new(
            learner_id,
            request.lesson_id,
            request.title,
            request.score,
            now,
        )
        .map_err(|e| {
            tracing::warn!("Rejected quiz result for learner {}: {}", learner_id, e);
            ApiError::from(e)
        })?;

        let saved = self.store.save_quiz_result(&result).await?;
        tracing::info!(
            "Recorded quiz result {} for learner {}: score {}",
            saved.id,
            learner_id,
            saved.score
        );
        Ok(saved)
    }

    pub async fn results(&self, learner_id: i64) -> Result<Vec<QuizResult>> {
        self.store.quiz_results(learner_id).await
    }
}

/// Generate with a generator seeded for this call only.
fn build(words: &[WordCandidate], max_questions: usize) -> Result<Vec<QuizQuestion>> {
    let mut rng = StdRng::from_os_rng();
    generate_questions(words, max_questions, &mut rng).map_err(|e| {
        tracing::warn!("Quiz generation rejected: {}", e);
        ApiError::from(e)
    })
}
