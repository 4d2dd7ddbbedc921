//! In-memory store, used by tests and `STORE=memory` runs.

use std::collections::{BTreeMap, HashMap};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use vocab_core::{ProgressRecord, ProgressStatus, QuizResult, WordCandidate};

use super::Store;
use crate::error::Result;
use crate::models::Learner;

#[derive(Default)]
struct Tables {
    last_progress_id: i64,
    progress: BTreeMap<i64, ProgressRecord>,
    quiz_results: Vec<QuizResult>,
    words: BTreeMap<i64, WordCandidate>,
    lessons: HashMap<i64, Vec<i64>>,
    learners: HashMap<String, Learner>,
}

impl Tables {
    fn lesson_has_word(&self, lesson_id: i64, word_id: i64) -> bool {
        self.lessons
            .get(&lesson_id)
            .is_some_and(|words| words.contains(&word_id))
    }

    fn learner_records(&self, learner_id: i64) -> impl Iterator<Item = &ProgressRecord> + '_ {
        self.progress.values().filter(move |p| p.learner_id == learner_id)
    }
}

/// Store backed by process memory.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_word(&self, word: WordCandidate) {
        self.tables.write().await.words.insert(word.id, word);
    }

    pub async fn insert_lesson(&self, lesson_id: i64, word_ids: Vec<i64>) {
        self.tables.write().await.lessons.insert(lesson_id, word_ids);
    }

    pub async fn insert_learner(&self, learner: Learner, token: &str) {
        self.tables
            .write()
            .await
            .learners
            .insert(token.to_string(), learner);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_progress(&self, id: i64) -> Result<Option<ProgressRecord>> {
        let record = self.tables.read().await.progress.get(&id).cloned();
        // Give other tasks a chance to run, as a real round-trip would.
        tokio::task::yield_now().await;
        Ok(record)
    }

    async fn find_progress(&self, learner_id: i64, word_id: i64) -> Result<Option<ProgressRecord>> {
        let record = self
            .tables
            .read()
            .await
            .learner_records(learner_id)
            .find(|p| p.word_id == word_id)
            .cloned();
        tokio::task::yield_now().await;
        Ok(record)
    }

    async fn save_progress(&self, record: &ProgressRecord) -> Result<ProgressRecord> {
        let mut tables = self.tables.write().await;

        let existing_id = tables
            .learner_records(record.learner_id)
            .find(|p| p.word_id == record.word_id)
            .map(|p| p.id);

        let id = match existing_id {
            Some(id) => id,
            None => {
                tables.last_progress_id += 1;
                tables.last_progress_id
            }
        };

        let stored = ProgressRecord {
            id,
            ..record.clone()
        };
        tables.progress.insert(id, stored.clone());
        Ok(stored)
    }

    async fn due_progress(
        &self,
        learner_id: i64,
        now: DateTime<Utc>,
        lesson_id: Option<i64>,
    ) -> Result<Vec<ProgressRecord>> {
        let tables = self.tables.read().await;
        let mut due: Vec<ProgressRecord> = tables
            .learner_records(learner_id)
            .filter(|p| p.is_due(now))
            .filter(|p| lesson_id.is_none_or(|lesson| tables.lesson_has_word(lesson, p.word_id)))
            .cloned()
            .collect();
        due.sort_by_key(|p| (p.next_review, p.id));
        Ok(due)
    }

    async fn progress_by_status(
        &self,
        learner_id: i64,
        status: ProgressStatus,
    ) -> Result<Vec<ProgressRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .learner_records(learner_id)
            .filter(|p| p.status == status)
            .cloned()
            .collect())
    }

    async fn progress_for_lesson(
        &self,
        learner_id: i64,
        lesson_id: i64,
    ) -> Result<Vec<ProgressRecord>> {
        let tables = self.tables.read().await;
        Ok(tables
            .learner_records(learner_id)
            .filter(|p| tables.lesson_has_word(lesson_id, p.word_id))
            .cloned()
            .collect())
    }

    async fn learner_progress(&self, learner_id: i64) -> Result<Vec<ProgressRecord>> {
        let tables = self.tables.read().await;
        Ok(tables.learner_records(learner_id).cloned().collect())
    }

    async fn word_exists(&self, word_id: i64) -> Result<bool> {
        Ok(self.tables.read().await.words.contains_key(&word_id))
    }

    async fn get_words(&self, word_ids: &[i64]) -> Result<Vec<WordCandidate>> {
        let tables = self.tables.read().await;
        Ok(word_ids
            .iter()
            .filter_map(|id| tables.words.get(id).cloned())
            .collect())
    }

    async fn lesson_exists(&self, lesson_id: i64) -> Result<bool> {
        Ok(self.tables.read().await.lessons.contains_key(&lesson_id))
    }

    async fn words_for_lesson(&self, lesson_id: i64) -> Result<Vec<WordCandidate>> {
        let tables = self.tables.read().await;
        Ok(tables
            .lessons
            .get(&lesson_id)
            .map(|ids| ids.iter().filter_map(|id| tables.words.get(id).cloned()).collect())
            .unwrap_or_default())
    }

    async fn started_words(&self, learner_id: i64) -> Result<Vec<WordCandidate>> {
        let tables = self.tables.read().await;
        Ok(tables
            .learner_records(learner_id)
            .filter(|p| p.status != ProgressStatus::NotLearned)
            .filter_map(|p| tables.words.get(&p.word_id).cloned())
            .collect())
    }

    async fn save_quiz_result(&self, result: &QuizResult) -> Result<QuizResult> {
        let mut tables = self.tables.write().await;
        let stored = QuizResult {
            id: tables.quiz_results.len() as i64 + 1,
            ..result.clone()
        };
        tables.quiz_results.push(stored.clone());
        Ok(stored)
    }

    async fn quiz_results(&self, learner_id: i64) -> Result<Vec<QuizResult>> {
        let tables = self.tables.read().await;
        let mut results: Vec<QuizResult> = tables
            .quiz_results
            .iter()
            .filter(|r| r.learner_id == learner_id)
            .cloned()
            .collect();
        results.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        Ok(results)
    }

    async fn find_learner_by_token(&self, token: &str) -> Result<Option<Learner>> {
        Ok(self.tables.read().await.learners.get(token).cloned())
    }
}
