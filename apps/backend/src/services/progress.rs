//! Review scheduling service.
//!
//! Mutations of one (learner, word) pair are serialized through
//! [`KeyedLocks`]: the record is re-read under the lock so a concurrent
//! review always builds on the previous one's result.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use vocab_core::{
    apply_review, progress_statistics, ProgressFields, ProgressRecord, ProgressStatistics,
    ProgressStatus,
};

use crate::error::{ApiError, Result};
use crate::models::ProgressWithWord;
use crate::services::locks::KeyedLocks;
use crate::store::Store;

pub struct ProgressService {
    store: Arc<dyn Store>,
    locks: KeyedLocks<(i64, i64)>,
}

impl ProgressService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            locks: KeyedLocks::new(),
        }
    }

    /// Record a successful review of `progress_id` by `learner_id`.
    pub async fn review_word(
        &self,
        progress_id: i64,
        learner_id: i64,
        now: DateTime<Utc>,
    ) -> Result<ProgressRecord> {
        let located = self.owned_progress(progress_id, learner_id).await?;
        let _guard = self.locks.lock((located.learner_id, located.word_id)).await;

        // Re-read under the lock; the copy above may be stale.
        let current = self.owned_progress(progress_id, learner_id).await?;
        let reviewed = apply_review(&current, now);
        let saved = self.store.save_progress(&reviewed).await?;

        tracing::info!(
            "Reviewed progress {} for learner {}: level {} -> {}, next review {:?}",
            saved.id,
            learner_id,
            current.memory_level,
            saved.memory_level,
            saved.next_review
        );
        Ok(saved)
    }

    /// Set progress fields directly, creating the record if needed.
    pub async fn upsert_progress(
        &self,
        learner_id: i64,
        word_id: i64,
        fields: &ProgressFields,
    ) -> Result<ProgressRecord> {
        self.require_word(word_id).await?;

        let _guard = self.locks.lock((learner_id, word_id)).await;
        let existing = self.store.find_progress(learner_id, word_id).await?;
        let created = existing.is_none();

        let mut record = existing.unwrap_or_else(|| ProgressRecord::new(learner_id, word_id));
        fields.apply_to(&mut record).map_err(|e| {
            tracing::warn!(
                "Rejected progress update for learner {}, word {}: {}",
                learner_id,
                word_id,
                e
            );
            ApiError::from(e)
        })?;

        let saved = self.store.save_progress(&record).await?;
        if created {
            tracing::info!("Created progress for learner {}, word {}", learner_id, word_id);
        } else {
            tracing::info!("Updated progress for learner {}, word {}", learner_id, word_id);
        }
        Ok(saved)
    }

    /// Start tracking a word, or return the record that already tracks it.
    pub async fn track_word(&self, learner_id: i64, word_id: i64) -> Result<ProgressRecord> {
        self.require_word(word_id).await?;

        let _guard = self.locks.lock((learner_id, word_id)).await;
        if let Some(existing) = self.store.find_progress(learner_id, word_id).await? {
            return Ok(existing);
        }

        let saved = self
            .store
            .save_progress(&ProgressRecord::new(learner_id, word_id))
            .await?;
        tracing::info!("Started tracking word {} for learner {}", word_id, learner_id);
        Ok(saved)
    }

    /// Records due for review at `now`, optionally limited to one lesson.
    pub async fn list_due(
        &self,
        learner_id: i64,
        now: DateTime<Utc>,
        lesson_id: Option<i64>,
    ) -> Result<Vec<ProgressRecord>> {
        if let Some(lesson) = lesson_id {
            self.require_lesson(lesson).await?;
        }
        self.store.due_progress(learner_id, now, lesson_id).await
    }

    pub async fn list_by_status(
        &self,
        learner_id: i64,
        status: ProgressStatus,
    ) -> Result<Vec<ProgressRecord>> {
        self.store.progress_by_status(learner_id, status).await
    }

    pub async fn list_for_lesson(
        &self,
        learner_id: i64,
        lesson_id: i64,
    ) -> Result<Vec<ProgressRecord>> {
        self.require_lesson(lesson_id).await?;
        self.store.progress_for_lesson(learner_id, lesson_id).await
    }

    pub async fn statistics(
        &self,
        learner_id: i64,
        now: DateTime<Utc>,
    ) -> Result<ProgressStatistics> {
        let records = self.store.learner_progress(learner_id).await?;
        let quiz_results = self.store.quiz_results(learner_id).await?;
        Ok(progress_statistics(&records, &quiz_results, now))
    }

    /// Attach the tracked word to each record, loading all words at once.
    pub async fn with_words(&self, records: Vec<ProgressRecord>) -> Result<Vec<ProgressWithWord>> {
        let mut ids: Vec<i64> = records.iter().map(|p| p.word_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let words: HashMap<i64, _> = self
            .store
            .get_words(&ids)
            .await?
            .into_iter()
            .map(|w| (w.id, w))
            .collect();

        Ok(records
            .into_iter()
            .map(|progress| {
                let word = words.get(&progress.word_id).cloned();
                ProgressWithWord { progress, word }
            })
            .collect())
    }

    /// Single-record form of [`Self::with_words`].
    pub async fn with_word(&self, record: ProgressRecord) -> Result<ProgressWithWord> {
        let word = self.store.get_words(&[record.word_id]).await?.pop();
        Ok(ProgressWithWord {
            progress: record,
            word,
        })
    }

    async fn owned_progress(&self, progress_id: i64, learner_id: i64) -> Result<ProgressRecord> {
        let record = self.store.get_progress(progress_id).await?.ok_or_else(|| {
            tracing::warn!("Progress {} not found", progress_id);
            ApiError::NotFound(format!("Progress {progress_id}"))
        })?;

        if record.learner_id != learner_id {
            tracing::warn!(
                "Learner {} attempted to review progress {} owned by learner {}",
                learner_id,
                progress_id,
                record.learner_id
            );
            return Err(ApiError::Forbidden(format!("Progress {progress_id}")));
        }
        Ok(record)
    }

    async fn require_word(&self, word_id: i64) -> Result<()> {
        if self.store.word_exists(word_id).await? {
            Ok(())
        } else {
            tracing::warn!("Word {} not found", word_id);
            Err(ApiError::NotFound(format!("Word {word_id}")))
        }
    }

    async fn require_lesson(&self, lesson_id: i64) -> Result<()> {
        if self.store.lesson_exists(lesson_id).await? {
            Ok(())
        } else {
            tracing::warn!("Lesson {} not found", lesson_id);
            Err(ApiError::NotFound(format!("Lesson {lesson_id}")))
        }
    }
}
