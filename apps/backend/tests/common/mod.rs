//! Common test utilities and fixtures for integration tests.
//!
//! This module provides shared test infrastructure including:
//! - TestContext backed by the in-memory store
//! - Helpers for seeding learners, words and lessons
//! - Authentication helpers

#![allow(dead_code)]

pub mod fixtures;

use std::sync::Arc;

use axum::http::header::{HeaderName, HeaderValue, AUTHORIZATION};
use axum::Router;
use axum_test::TestServer;

use vocab_backend::models::{Learner, WordCandidate};
use vocab_backend::store::MemoryStore;
use vocab_backend::{router, AppState};

/// Test context holding the store and the router built over it.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub state: AppState,
    app: Router,
}

impl TestContext {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone());
        let app = router(state.clone());
        Self { store, state, app }
    }

    /// Get the router for use with axum-test.
    pub fn router(&self) -> Router {
        self.app.clone()
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router()).unwrap()
    }

    /// Register a learner and return its bearer token.
    pub async fn create_learner(&self, id: i64) -> String {
        let token = format!("token-{id}");
        self.store
            .insert_learner(
                Learner {
                    id,
                    username: format!("learner{id}"),
                },
                &token,
            )
            .await;
        token
    }

    pub async fn add_words(&self, words: Vec<WordCandidate>) {
        for word in words {
            self.store.insert_word(word).await;
        }
    }

    pub async fn add_lesson(&self, lesson_id: i64, word_ids: Vec<i64>) {
        self.store.insert_lesson(lesson_id, word_ids).await;
    }

    /// Authorization header for a learner token.
    pub fn auth_header(token: &str) -> (HeaderName, HeaderValue) {
        let value = HeaderValue::from_str(&format!("Bearer {}", token)).unwrap();
        (AUTHORIZATION, value)
    }
}
