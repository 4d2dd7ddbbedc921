//! Authentication middleware

use axum::{
    body::Body,
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::error::{ApiError, Result};
use crate::AppState;

/// Authenticated learner info stored in request extensions
#[derive(Clone, Debug)]
pub struct AuthenticatedLearner {
    pub learner_id: i64,
}

/// Auth middleware - resolves the bearer token to a learner
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("Missing Authorization header".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("Invalid Authorization format".to_string()))?;

    let learner = state
        .store
        .find_learner_by_token(token)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid learner token".to_string()))?;

    tracing::debug!("Authenticated learner {} ({})", learner.id, learner.username);
    request.extensions_mut().insert(AuthenticatedLearner {
        learner_id: learner.id,
    });

    Ok(next.run(request).await)
}
