use std::future::Future;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::{info, warn};

/// Creates the PostgreSQL connection pool and applies pending migrations.
///
/// The pool is the only database handle in the process. It is owned by
/// `AppState` and passed by reference into every workflow.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .test_before_acquire(true)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    info!("PostgreSQL connection pool established");
    Ok(pool)
}

/// Bounded retry policy applied to every persistence write.
///
/// A retried write acquires a fresh connection from the pool, which drops
/// connections that failed the liveness check. That is the reconnect.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts including the first one. Values below 1 behave as 1.
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            base_delay: Duration::from_millis(500),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            base_delay: Duration::from_millis(base_delay_ms),
        }
    }

    /// Exponential backoff: base, 2×base, 4×base, ...
    fn delay_before(&self, attempt: u32) -> Duration {
        let exp = attempt.saturating_sub(1).min(16);
        self.base_delay.saturating_mul(1u32 << exp)
    }
}

/// Connection-level failures worth another attempt. Constraint violations,
/// missing rows and decode errors will fail the same way again.
pub fn is_transient(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Protocol(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

/// Runs `op` under `policy`, retrying transient errors with backoff.
pub async fn with_retry<T, F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < max_attempts && is_transient(&e) => {
                let delay = policy.delay_before(attempt);
                warn!(
                    "{label}: write attempt {attempt}/{max_attempts} failed ({e}), retrying after {}ms",
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Runs a delete under `policy` and reports whether the row is gone.
///
/// Zero rows on a retried attempt still counts as deleted: the failed
/// attempt may have committed before its acknowledgement was lost.
pub async fn delete_with_retry<F, Fut>(
    policy: &RetryPolicy,
    label: &str,
    mut op: F,
) -> Result<bool, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<u64, sqlx::Error>>,
{
    let attempts = AtomicU32::new(0);
    let rows = with_retry(policy, label, || {
        attempts.fetch_add(1, Ordering::SeqCst);
        op()
    })
    .await?;
    Ok(rows > 0 || attempts.load(Ordering::SeqCst) > 1)
}
