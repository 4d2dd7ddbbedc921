//! Progress endpoints

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::Utc;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedLearner;
use crate::AppState;

/// POST /api/progress/review/:progress_id
pub async fn review(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Path(progress_id): Path<i64>,
) -> Result<Json<ProgressWithWord>> {
    let progress = state
        .progress
        .review_word(progress_id, auth.learner_id, Utc::now())
        .await?;
    Ok(Json(state.progress.with_word(progress).await?))
}

/// POST /api/progress
pub async fn upsert(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Json(payload): Json<UpsertProgressRequest>,
) -> Result<Json<ProgressWithWord>> {
    let progress = state
        .progress
        .upsert_progress(auth.learner_id, payload.word_id, &payload.fields)
        .await?;

    Ok(Json(state.progress.with_word(progress).await?))
}

/// POST /api/progress/track
pub async fn track(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Json(payload): Json<TrackWordRequest>,
) -> Result<Json<ProgressWithWord>> {
    let progress = state
        .progress
        .track_word(auth.learner_id, payload.word_id)
        .await?;
    Ok(Json(state.progress.with_word(progress).await?))
}

/// GET /api/progress/due
pub async fn due(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Query(query): Query<DueQuery>,
) -> Result<Json<Vec<ProgressWithWord>>> {
    let due = state
        .progress
        .list_due(auth.learner_id, Utc::now(), query.lesson_id)
        .await?;
    Ok(Json(state.progress.with_words(due).await?))
}

/// GET /api/progress/status/:status
pub async fn by_status(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Path(status): Path<String>,
) -> Result<Json<Vec<ProgressWithWord>>> {
    let status: ProgressStatus = status.parse()?;
    let records = state.progress.list_by_status(auth.learner_id, status).await?;
    Ok(Json(state.progress.with_words(records).await?))
}

/// GET /api/progress/learned
pub async fn learned(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
) -> Result<Json<Vec<ProgressWithWord>>> {
    let records = state
        .progress
        .list_by_status(auth.learner_id, ProgressStatus::Learned)
        .await?;
    Ok(Json(state.progress.with_words(records).await?))
}

/// GET /api/progress/lesson/:lesson_id
pub async fn for_lesson(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Path(lesson_id): Path<i64>,
) -> Result<Json<Vec<ProgressWithWord>>> {
    let records = state
        .progress
        .list_for_lesson(auth.learner_id, lesson_id)
        .await?;
    Ok(Json(state.progress.with_words(records).await?))
}
