//! PostgreSQL database operations

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, PgPool};
use vocab_core::{ProgressRecord, ProgressStatus, QuizResult, Translation, WordCandidate};

use crate::error::{ApiError, Result};
use crate::models::*;
use crate::store::Store;

const PROGRESS_COLUMNS: &str = "p.id, p.learner_id, p.word_id, p.memory_level, p.last_reviewed, \
                                p.next_review, p.review_count, p.status";

/// Database wrapper with connection pool
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL and create connection pool
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    /// Run database migrations
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| ApiError::Migration(e.to_string()))?;
        Ok(())
    }

    /// Get the connection pool
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Load words by id, each with its translations in insertion order
    async fn words_with_translations(&self, words: Vec<DbWord>) -> Result<Vec<WordCandidate>> {
        if words.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = words.iter().map(|w| w.id).collect();
        let translations = sqlx::query_as::<_, DbTranslation>(
            r#"
            SELECT word_id, language, meaning
            FROM word_translations
            WHERE word_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&ids[..])
        .fetch_all(&self.pool)
        .await?;

        let mut by_word: HashMap<i64, Vec<Translation>> = HashMap::new();
        for t in translations {
            by_word.entry(t.word_id).or_default().push(Translation {
                language: t.language,
                meaning: t.meaning,
            });
        }

        Ok(words
            .into_iter()
            .map(|w| WordCandidate {
                id: w.id,
                translations: by_word.remove(&w.id).unwrap_or_default(),
                text: w.word_text,
            })
            .collect())
    }
}

#[async_trait]
impl Store for Database {
    // === Progress Repository ===

    async fn get_progress(&self, id: i64) -> Result<Option<ProgressRecord>> {
        let row = sqlx::query_as::<_, DbProgress>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM user_progress p WHERE p.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DbProgress::into_record))
    }

    async fn find_progress(&self, learner_id: i64, word_id: i64) -> Result<Option<ProgressRecord>> {
        let row = sqlx::query_as::<_, DbProgress>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM user_progress p \
             WHERE p.learner_id = $1 AND p.word_id = $2"
        ))
        .bind(learner_id)
        .bind(word_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(DbProgress::into_record))
    }

    async fn save_progress(&self, record: &ProgressRecord) -> Result<ProgressRecord> {
        let row = sqlx::query_as::<_, DbProgress>(
            r#"
            INSERT INTO user_progress AS p (learner_id, word_id, memory_level, last_reviewed,
                                            next_review, review_count, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (learner_id, word_id) DO UPDATE SET
                memory_level = EXCLUDED.memory_level,
                last_reviewed = EXCLUDED.last_reviewed,
                next_review = EXCLUDED.next_review,
                review_count = EXCLUDED.review_count,
                status = EXCLUDED.status,
                updated_at = NOW()
            RETURNING p.id, p.learner_id, p.word_id, p.memory_level, p.last_reviewed,
                      p.next_review, p.review_count, p.status
            "#,
        )
        .bind(record.learner_id)
        .bind(record.word_id)
        .bind(record.memory_level)
        .bind(record.last_reviewed)
        .bind(record.next_review)
        .bind(record.review_count)
        .bind(record.status.as_str())
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_record())
    }

    async fn due_progress(
        &self,
        learner_id: i64,
        now: DateTime<Utc>,
        lesson_id: Option<i64>,
    ) -> Result<Vec<ProgressRecord>> {
        let rows = match lesson_id {
            Some(lesson) => {
                sqlx::query_as::<_, DbProgress>(&format!(
                    r#"
                    SELECT {PROGRESS_COLUMNS}
                    FROM user_progress p
                    JOIN lesson_words lw ON lw.word_id = p.word_id AND lw.lesson_id = $3
                    WHERE p.learner_id = $1 AND p.next_review <= $2
                    ORDER BY p.next_review, p.id
                    "#
                ))
                .bind(learner_id)
                .bind(now)
                .bind(lesson)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as::<_, DbProgress>(&format!(
                    r#"
                    SELECT {PROGRESS_COLUMNS}
                    FROM user_progress p
                    WHERE p.learner_id = $1 AND p.next_review <= $2
                    ORDER BY p.next_review, p.id
                    "#
                ))
                .bind(learner_id)
                .bind(now)
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(DbProgress::into_record).collect())
    }

    async fn progress_by_status(
        &self,
        learner_id: i64,
        status: ProgressStatus,
    ) -> Result<Vec<ProgressRecord>> {
        let rows = sqlx::query_as::<_, DbProgress>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM user_progress p \
             WHERE p.learner_id = $1 AND p.status = $2 ORDER BY p.id"
        ))
        .bind(learner_id)
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DbProgress::into_record).collect())
    }

    async fn progress_for_lesson(
        &self,
        learner_id: i64,
        lesson_id: i64,
    ) -> Result<Vec<ProgressRecord>> {
        let rows = sqlx::query_as::<_, DbProgress>(&format!(
            r#"
            SELECT {PROGRESS_COLUMNS}
            FROM user_progress p
            JOIN lesson_words lw ON lw.word_id = p.word_id AND lw.lesson_id = $2
            WHERE p.learner_id = $1
            ORDER BY p.id
            "#
        ))
        .bind(learner_id)
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DbProgress::into_record).collect())
    }

    async fn learner_progress(&self, learner_id: i64) -> Result<Vec<ProgressRecord>> {
        let rows = sqlx::query_as::<_, DbProgress>(&format!(
            "SELECT {PROGRESS_COLUMNS} FROM user_progress p WHERE p.learner_id = $1 ORDER BY p.id"
        ))
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DbProgress::into_record).collect())
    }

    // === Word Repository ===

    async fn word_exists(&self, word_id: i64) -> Result<bool> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM words WHERE id = $1)")
            .bind(word_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn get_words(&self, word_ids: &[i64]) -> Result<Vec<WordCandidate>> {
        if word_ids.is_empty() {
            return Ok(Vec::new());
        }

        let words = sqlx::query_as::<_, DbWord>(
            "SELECT id, word_text FROM words WHERE id = ANY($1) ORDER BY id",
        )
        .bind(word_ids)
        .fetch_all(&self.pool)
        .await?;

        self.words_with_translations(words).await
    }

    async fn lesson_exists(&self, lesson_id: i64) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM lessons WHERE id = $1)")
                .bind(lesson_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(exists)
    }

    async fn words_for_lesson(&self, lesson_id: i64) -> Result<Vec<WordCandidate>> {
        let words = sqlx::query_as::<_, DbWord>(
            r#"
            SELECT w.id, w.word_text
            FROM words w
            JOIN lesson_words lw ON lw.word_id = w.id
            WHERE lw.lesson_id = $1
            ORDER BY lw.id
            "#,
        )
        .bind(lesson_id)
        .fetch_all(&self.pool)
        .await?;

        self.words_with_translations(words).await
    }

    async fn started_words(&self, learner_id: i64) -> Result<Vec<WordCandidate>> {
        let words = sqlx::query_as::<_, DbWord>(
            r#"
            SELECT w.id, w.word_text
            FROM words w
            JOIN user_progress p ON p.word_id = w.id
            WHERE p.learner_id = $1 AND p.status <> 'NotLearned'
            ORDER BY p.id
            "#,
        )
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await?;

        self.words_with_translations(words).await
    }

    // === Quiz Result Repository ===

    async fn save_quiz_result(&self, result: &QuizResult) -> Result<QuizResult> {
        let row = sqlx::query_as::<_, DbQuizResult>(
            r#"
            INSERT INTO quiz_results (learner_id, lesson_id, title, score, completed_at)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, learner_id, lesson_id, title, score, completed_at
            "#,
        )
        .bind(result.learner_id)
        .bind(result.lesson_id)
        .bind(&result.title)
        .bind(result.score)
        .bind(result.completed_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_result())
    }

    async fn quiz_results(&self, learner_id: i64) -> Result<Vec<QuizResult>> {
        let rows = sqlx::query_as::<_, DbQuizResult>(
            r#"
            SELECT id, learner_id, lesson_id, title, score, completed_at
            FROM quiz_results
            WHERE learner_id = $1
            ORDER BY completed_at DESC, id DESC
            "#,
        )
        .bind(learner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(DbQuizResult::into_result).collect())
    }

    // === Learner Repository ===

    async fn find_learner_by_token(&self, token: &str) -> Result<Option<Learner>> {
        let learner = sqlx::query_as::<_, Learner>(
            r#"
            SELECT id, username
            FROM learners
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await?;

        Ok(learner)
    }
}
