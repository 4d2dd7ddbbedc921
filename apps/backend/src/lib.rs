pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, StoreBackend};
use crate::db::Database;
use crate::services::{ProgressService, QuizService};
use crate::store::{MemoryStore, Store};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub progress: Arc<ProgressService>,
    pub quizzes: Arc<QuizService>,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            progress: Arc::new(ProgressService::new(store.clone())),
            quizzes: Arc::new(QuizService::new(store.clone())),
            store,
        }
    }
}

pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match &config.store {
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            tracing::info!("Connecting to database...");
            let db = Database::connect(database_url, *max_connections).await?;

            tracing::info!("Running migrations...");
            db.run_migrations().await?;
            Arc::new(db)
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; progress is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let app = router(AppState::new(store)).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr = config.bind_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    let protected_routes = Router::new()
        // Progress routes
        .route("/api/progress", post(routes::progress::upsert))
        .route("/api/progress/track", post(routes::progress::track))
        .route(
            "/api/progress/review/:progress_id",
            post(routes::progress::review),
        )
        .route("/api/progress/due", get(routes::progress::due))
        .route("/api/progress/status/:status", get(routes::progress::by_status))
        .route("/api/progress/learned", get(routes::progress::learned))
        .route("/api/progress/lesson/:lesson_id", get(routes::progress::for_lesson))
        .route("/api/statistics", get(routes::stats::get))
        // Quiz routes
        .route("/api/quizzes/lesson/:lesson_id", post(routes::quiz::lesson))
        .route("/api/quizzes/random", post(routes::quiz::random))
        .route(
            "/api/quiz-results",
            get(routes::quiz::results).post(routes::quiz::submit_result),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            routes::auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .merge(protected_routes)
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
