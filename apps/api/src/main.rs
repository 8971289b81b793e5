mod auth;
mod config;
mod cover_letter;
mod db;
mod errors;
mod extraction;
mod insights;
mod interview;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, RetryPolicy};
use crate::insights::refresh::spawn_refresh_task;
use crate::insights::store::{InsightStore, PgInsightStore};
use crate::llm_client::{LlmClient, TextGenerator};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting SensAI API v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url).await?;

    let llm: Arc<dyn TextGenerator> = Arc::new(LlmClient::new(
        config.gemini_api_key.clone(),
        config.gemini_api_base.clone(),
    )?);
    info!("LLM client initialized (model: {})", llm_client::MODEL);

    let insights: Arc<dyn InsightStore> = Arc::new(PgInsightStore::new(db.clone()));
    let retry = RetryPolicy::new(config.db_write_attempts, config.db_retry_base_ms);

    if config.insights_refresh_interval_hours > 0 {
        let every = Duration::from_secs(config.insights_refresh_interval_hours * 3600);
        spawn_refresh_task(insights.clone(), llm.clone(), retry, every);
        info!(
            "Insight refresh scheduled every {}h",
            config.insights_refresh_interval_hours
        );
    } else {
        info!("Insight refresh disabled");
    }

    let state = AppState {
        db,
        llm,
        insights,
        retry,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
