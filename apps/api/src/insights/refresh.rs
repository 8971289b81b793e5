//! Batch refresh of every stored industry insight.
//!
//! Industries are processed strictly one after another. A failed upsert is
//! logged and counted, and the loop moves on to the next industry.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

use crate::db::{with_retry, RetryPolicy};
use crate::extraction::generate;
use crate::insights::insight_request;
use crate::insights::schema::IndustryInsightData;
use crate::insights::store::InsightStore;
use crate::llm_client::TextGenerator;

#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct RefreshSummary {
    pub refreshed: usize,
    /// Industries stored with the fallback template.
    pub fallbacks: usize,
    /// Industries whose upsert failed after retries.
    pub failed: Vec<String>,
}

/// Regenerates and upserts the insight for every known industry.
///
/// Returns an error only when the industry list itself cannot be read.
pub async fn refresh_all_insights(
    store: &dyn InsightStore,
    llm: &dyn TextGenerator,
    policy: &RetryPolicy,
) -> Result<RefreshSummary, sqlx::Error> {
    let industries = with_retry(policy, "list industries", || store.list_industries()).await?;
    info!("Refreshing insights for {} industries", industries.len());

    let mut summary = RefreshSummary::default();

    for industry in industries {
        let generated = generate(
            llm,
            "insight refresh",
            &insight_request(&industry),
            IndustryInsightData::default,
        )
        .await;

        let label = format!("upsert insight '{industry}'");
        let stored =
            with_retry(policy, &label, || store.upsert_insight(&industry, &generated.value)).await;
        match stored {
            Ok(_) => {
                summary.refreshed += 1;
                if generated.is_fallback() {
                    summary.fallbacks += 1;
                    warn!("Stored fallback insight for '{industry}'");
                }
            }
            Err(e) => {
                error!("Giving up on insight for '{industry}': {e}");
                summary.failed.push(industry);
            }
        }
    }

    info!(
        "Insight refresh done: {} refreshed ({} fallback), {} failed",
        summary.refreshed,
        summary.fallbacks,
        summary.failed.len()
    );
    Ok(summary)
}

/// Spawns the periodic refresh. The first tick is skipped so startup does not
/// hit the model.
pub fn spawn_refresh_task(
    store: Arc<dyn InsightStore>,
    llm: Arc<dyn TextGenerator>,
    policy: RetryPolicy,
    every: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker.tick().await;

        loop {
            ticker.tick().await;
            if let Err(e) = refresh_all_insights(store.as_ref(), llm.as_ref(), &policy).await {
                error!("Insight refresh aborted: {e}");
            }
        }
    })
}
