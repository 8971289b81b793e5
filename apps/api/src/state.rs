use std::sync::Arc;

use sqlx::PgPool;

use crate::db::RetryPolicy;
use crate::insights::store::InsightStore;
use crate::llm_client::TextGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The one owned connection pool. Workflows borrow it, never open their own.
    pub db: PgPool,
    pub llm: Arc<dyn TextGenerator>,
    pub insights: Arc<dyn InsightStore>,
    /// Applied to every persistence write.
    pub retry: RetryPolicy,
}
