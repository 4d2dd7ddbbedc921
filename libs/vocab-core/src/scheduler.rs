//! Fixed-interval review scheduling.
//!
//! Each successful review strengthens a word by one memory level (capped at
//! 5) and pushes its next review out according to a fixed table:
//!
//! | level | next review |
//! |-------|-------------|
//! | 1     | +1 day      |
//! | 2     | +3 days     |
//! | 3     | +7 days     |
//! | 4     | +14 days    |
//! | 5     | +30 days    |
//!
//! There is no lapse path: a review never lowers the memory level.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::dates::parse_optional_timestamp;
use crate::error::{CoreError, Result};
use crate::types::{ProgressRecord, ProgressStatus, MAX_MEMORY_LEVEL, MIN_MEMORY_LEVEL};

/// Time until the next review for a word at `memory_level`.
///
/// Levels outside the table get the longest interval.
pub fn review_interval(memory_level: i32) -> Duration {
    match memory_level {
        1 => Duration::days(1),
        2 => Duration::days(3),
        3 => Duration::days(7),
        4 => Duration::days(14),
        _ => Duration::days(30),
    }
}

/// Learning status implied by a memory level and review history.
pub fn status_for(memory_level: i32, review_count: i32) -> ProgressStatus {
    if memory_level >= MAX_MEMORY_LEVEL {
        ProgressStatus::Mastered
    } else if memory_level <= MIN_MEMORY_LEVEL && review_count == 0 {
        ProgressStatus::NotLearned
    } else {
        ProgressStatus::Learning
    }
}

/// Record one successful review of `record` at `now`.
pub fn apply_review(record: &ProgressRecord, now: DateTime<Utc>) -> ProgressRecord {
    let memory_level = (record.memory_level + 1).clamp(MIN_MEMORY_LEVEL, MAX_MEMORY_LEVEL);
    let review_count = record.review_count.saturating_add(1);

    ProgressRecord {
        memory_level,
        last_reviewed: Some(now),
        next_review: Some(now + review_interval(memory_level)),
        review_count,
        status: status_for(memory_level, review_count),
        ..record.clone()
    }
}

/// Progress values set directly by a caller instead of through a review.
///
/// These are stored as given; the interval table is not consulted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressFields {
    pub memory_level: i32,
    #[serde(default)]
    pub last_reviewed: Option<String>,
    #[serde(default)]
    pub next_review: Option<String>,
    #[serde(default)]
    pub review_count: i32,
    #[serde(default = "default_status")]
    pub status: String,
}

fn default_status() -> String {
    ProgressStatus::NotLearned.as_str().to_string()
}

impl ProgressFields {
    /// Validate every field, then overwrite them on `record`.
    ///
    /// On error `record` is left untouched.
    pub fn apply_to(&self, record: &mut ProgressRecord) -> Result<()> {
        if !(MIN_MEMORY_LEVEL..=MAX_MEMORY_LEVEL).contains(&self.memory_level) {
            return Err(CoreError::MemoryLevelOutOfRange(self.memory_level));
        }
        if self.review_count < 0 {
            return Err(CoreError::NegativeReviewCount(self.review_count));
        }
        let status: ProgressStatus = self.status.parse()?;
        let last_reviewed =
            parse_optional_timestamp("last_reviewed", self.last_reviewed.as_deref())?;
        let next_review = parse_optional_timestamp("next_review", self.next_review.as_deref())?;

        if let (Some(last), Some(next)) = (last_reviewed, next_review) {
            if next <= last {
                return Err(CoreError::ReviewOrder);
            }
        }

        record.memory_level = self.memory_level;
        record.last_reviewed = last_reviewed;
        record.next_review = next_review;
        record.review_count = self.review_count;
        record.status = status;
        Ok(())
    }
}
