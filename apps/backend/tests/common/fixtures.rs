//! Test fixtures and factory functions for creating test data.

use serde_json::json;

use vocab_backend::models::{Translation, WordCandidate};

/// A word with a single Vietnamese translation.
pub fn translated_word(id: i64) -> WordCandidate {
    WordCandidate {
        id,
        text: format!("word{id}"),
        translations: vec![Translation {
            language: "vi".to_string(),
            meaning: format!("nghĩa {id}"),
        }],
    }
}

/// A word with no translations.
pub fn bare_word(id: i64) -> WordCandidate {
    WordCandidate {
        id,
        text: format!("word{id}"),
        translations: vec![],
    }
}

/// Words with ids `1..=count`, all translated.
pub fn translated_words(count: i64) -> Vec<WordCandidate> {
    (1..=count).map(translated_word).collect()
}

/// Create an upsert progress request body.
pub fn upsert_progress_request(
    word_id: i64,
    memory_level: i32,
    last_reviewed: Option<&str>,
    next_review: Option<&str>,
    status: &str,
) -> serde_json::Value {
    json!({
        "word_id": word_id,
        "memory_level": memory_level,
        "last_reviewed": last_reviewed,
        "next_review": next_review,
        "review_count": 1,
        "status": status
    })
}

/// Create a track word request body.
pub fn track_word_request(word_id: i64) -> serde_json::Value {
    json!({ "word_id": word_id })
}

/// Create a random quiz request body.
pub fn random_quiz_request(question_count: i64) -> serde_json::Value {
    json!({ "question_count": question_count })
}

/// Create a quiz result submission body.
pub fn quiz_result_request(lesson_id: Option<i64>, title: &str, score: i32) -> serde_json::Value {
    json!({
        "lesson_id": lesson_id,
        "title": title,
        "score": score
    })
}
