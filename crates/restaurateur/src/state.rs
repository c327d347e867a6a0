//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::services::CandidateAssigner;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pool: PgPool,
    assigner: CandidateAssigner,
}

impl AppState {
    #[must_use]
    pub fn new(pool: PgPool, assigner: CandidateAssigner) -> Self {
        Self {
            inner: Arc::new(AppStateInner { pool, assigner }),
        }
    }

    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn assigner(&self) -> &CandidateAssigner {
        &self.inner.assigner
    }
}
