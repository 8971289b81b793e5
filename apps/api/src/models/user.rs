use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A registered user. `external_id` is the identity issued by the auth provider.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub external_id: String,
    pub email: String,
    pub industry: Option<String>,
    /// Years of experience.
    pub experience: Option<i32>,
    pub skills: Vec<String>,
    pub bio: Option<String>,
    pub industry_insight_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
