use crate::config::Config;
use crate::run::RunStore;
use axum::extract::FromRef;
use sqlx::SqlitePool;

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Config,
    /// In-memory registry of active test runs. Each run belongs to exactly
    /// one authenticated user and lives only for the duration of the attempt.
    pub runs: RunStore,
}

impl FromRef<AppState> for SqlitePool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for RunStore {
    fn from_ref(state: &AppState) -> Self {
        state.runs.clone()
    }
}
