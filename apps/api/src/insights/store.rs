//! Persistence sink for industry insights.
//!
//! `AppState` and the refresh task hold an `Arc<dyn InsightStore>`; tests
//! swap in `MemoryInsightStore`.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::types::Json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::insights::schema::IndustryInsightData;
use crate::models::insight::IndustryInsightRow;

/// Days until an insight is due for its next refresh.
pub const INSIGHT_TTL_DAYS: i64 = 7;

#[async_trait]
pub trait InsightStore: Send + Sync {
    async fn list_industries(&self) -> Result<Vec<String>, sqlx::Error>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<IndustryInsightRow>, sqlx::Error>;

    async fn find_by_industry(
        &self,
        industry: &str,
    ) -> Result<Option<IndustryInsightRow>, sqlx::Error>;

    /// Inserts or replaces the insight for `industry`. Repeating the call with
    /// the same key never creates a second row.
    async fn upsert_insight(
        &self,
        industry: &str,
        data: &IndustryInsightData,
    ) -> Result<IndustryInsightRow, sqlx::Error>;
}

pub struct PgInsightStore {
    pool: PgPool,
}

impl PgInsightStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InsightStore for PgInsightStore {
    async fn list_industries(&self) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar("SELECT industry FROM industry_insights ORDER BY industry")
            .fetch_all(&self.pool)
            .await
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<IndustryInsightRow>, sqlx::Error> {
        sqlx::query_as::<_, IndustryInsightRow>("SELECT * FROM industry_insights WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
    }

    async fn find_by_industry(
        &self,
        industry: &str,
    ) -> Result<Option<IndustryInsightRow>, sqlx::Error> {
        sqlx::query_as::<_, IndustryInsightRow>(
            "SELECT * FROM industry_insights WHERE industry = $1",
        )
        .bind(industry)
        .fetch_optional(&self.pool)
        .await
    }

    async fn upsert_insight(
        &self,
        industry: &str,
        data: &IndustryInsightData,
    ) -> Result<IndustryInsightRow, sqlx::Error> {
        let next_update = Utc::now() + Duration::days(INSIGHT_TTL_DAYS);

        sqlx::query_as::<_, IndustryInsightRow>(
            r#"
            INSERT INTO industry_insights
                (industry, salary_ranges, growth_rate, demand_level, top_skills,
                 market_outlook, key_trends, recommended_skills, last_updated, next_update)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, now(), $9)
            ON CONFLICT (industry) DO UPDATE SET
                salary_ranges      = EXCLUDED.salary_ranges,
                growth_rate        = EXCLUDED.growth_rate,
                demand_level       = EXCLUDED.demand_level,
                top_skills         = EXCLUDED.top_skills,
                market_outlook     = EXCLUDED.market_outlook,
                key_trends         = EXCLUDED.key_trends,
                recommended_skills = EXCLUDED.recommended_skills,
                last_updated       = EXCLUDED.last_updated,
                next_update        = EXCLUDED.next_update
            RETURNING *
            "#,
        )
        .bind(industry)
        .bind(Json(&data.salary_ranges))
        .bind(data.growth_rate)
        .bind(data.demand_level.as_str())
        .bind(&data.top_skills)
        .bind(data.market_outlook.as_str())
        .bind(&data.key_trends)
        .bind(&data.recommended_skills)
        .bind(next_update)
        .fetch_one(&self.pool)
        .await
    }
}

#[cfg(test)]
pub use memory::MemoryInsightStore;
