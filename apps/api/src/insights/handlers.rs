//! Axum route handlers for industry insights.

use axum::{extract::State, Json};
use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::db::{with_retry, RetryPolicy};
use crate::errors::AppError;
use crate::insights::dashboard::{build_dashboard, DashboardView};
use crate::insights::resolve_insight;
use crate::models::insight::IndustryInsightRow;
use crate::models::user::User;
use crate::state::AppState;

async fn link_user(
    pool: &sqlx::PgPool,
    policy: &RetryPolicy,
    user_id: Uuid,
    insight_id: Uuid,
) -> Result<(), sqlx::Error> {
    with_retry(policy, "link user insight", || async move {
        sqlx::query("UPDATE users SET industry_insight_id = $1 WHERE id = $2")
            .bind(insight_id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok::<_, sqlx::Error>(())
    })
    .await
}

/// Resolves the caller's insight and links it to their profile if needed.
async fn insight_for(state: &AppState, user: &User) -> Result<IndustryInsightRow, AppError> {
    let resolved =
        resolve_insight(state.insights.as_ref(), state.llm.as_ref(), &state.retry, user).await?;

    let needs_link = resolved.needs_link();
    let row = resolved.into_row();
    if needs_link {
        link_user(&state.db, &state.retry, user.id, row.id).await?;
        info!("Linked user {} to insight {} ({})", user.id, row.id, row.industry);
    }
    Ok(row)
}

/// GET /api/v1/insights
pub async fn handle_get_insight(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<IndustryInsightRow>, AppError> {
    Ok(Json(insight_for(&state, &user).await?))
}

/// GET /api/v1/insights/dashboard
pub async fn handle_get_dashboard(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<DashboardView>, AppError> {
    let row = insight_for(&state, &user).await?;
    Ok(Json(build_dashboard(&row, Utc::now())))
}
