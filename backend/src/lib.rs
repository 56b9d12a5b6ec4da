pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod use_cases;

use sqlx::PgPool;

/// Shared application state available to all handlers via axum's State extractor.
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
}

impl axum::extract::FromRef<AppState> for PgPool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}
