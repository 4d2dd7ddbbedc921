//! Quiz endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::Utc;

use crate::error::Result;
use crate::models::*;
use crate::routes::auth::AuthenticatedLearner;
use crate::AppState;

/// POST /api/quizzes/lesson/:lesson_id
pub async fn lesson(
    State(state): State<AppState>,
    Extension(_auth): Extension<AuthenticatedLearner>,
    Path(lesson_id): Path<i64>,
) -> Result<Json<QuizResponse>> {
    let quiz = state.quizzes.lesson_quiz(lesson_id, Utc::now()).await?;
    Ok(Json(quiz))
}

/// POST /api/quizzes/random
pub async fn random(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Json(payload): Json<RandomQuizRequest>,
) -> Result<Json<QuizResponse>> {
    let quiz = state
        .quizzes
        .random_quiz(auth.learner_id, payload.question_count, Utc::now())
        .await?;
    Ok(Json(quiz))
}

/// POST /api/quiz-results
pub async fn submit_result(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
    Json(payload): Json<SubmitQuizResultRequest>,
) -> Result<(StatusCode, Json<QuizResult>)> {
    let result = state
        .quizzes
        .submit_result(auth.learner_id, payload, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(result)))
}

/// GET /api/quiz-results
pub async fn results(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
) -> Result<Json<Vec<QuizResult>>> {
    let results = state.quizzes.results(auth.learner_id).await?;
    Ok(Json(results))
}
