//! Statistics endpoint

use axum::{extract::State, Extension, Json};
use chrono::Utc;

use crate::error::Result;
use crate::models::ProgressStatistics;
use crate::routes::auth::AuthenticatedLearner;
use crate::AppState;

/// GET /api/statistics
pub async fn get(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthenticatedLearner>,
) -> Result<Json<ProgressStatistics>> {
    let stats = state.progress.statistics(auth.learner_id, Utc::now()).await?;
    Ok(Json(stats))
}
