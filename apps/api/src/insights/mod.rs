// Industry insights: schema, persistence sink, on-demand creation, weekly batch refresh.
// All LLM calls go through `extraction::generate`.

pub mod dashboard;
pub mod handlers;
pub mod prompts;
pub mod refresh;
pub mod schema;
pub mod store;

use tracing::info;

use crate::db::{with_retry, RetryPolicy};
use crate::errors::AppError;
use crate::extraction::{generate, GenerationRequest};
use crate::insights::prompts::INSIGHT_PROMPT_TEMPLATE;
use crate::insights::schema::IndustryInsightData;
use crate::insights::store::InsightStore;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::TextGenerator;
use crate::models::insight::IndustryInsightRow;
use crate::models::user::User;

/// Industry key used when the user has not picked one.
pub const DEFAULT_INDUSTRY: &str = "general";

pub fn insight_request(industry: &str) -> GenerationRequest {
    GenerationRequest::new(INSIGHT_PROMPT_TEMPLATE)
        .param("industry", industry)
        .param("json_only", JSON_ONLY_INSTRUCTION)
}

pub fn industry_key(user: &User) -> String {
    user.industry
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_INDUSTRY)
        .to_string()
}

/// What `resolve_insight` found or did.
#[derive(Debug)]
pub enum Resolved {
    /// The user's linked insight.
    Linked(IndustryInsightRow),
    /// An insight for the user's industry already existed; the user must be linked.
    Existing(IndustryInsightRow),
    /// A new insight was generated and stored; the user must be linked.
    Created(IndustryInsightRow),
}

impl Resolved {
    pub fn needs_link(&self) -> bool {
        !matches!(self, Resolved::Linked(_))
    }

    pub fn into_row(self) -> IndustryInsightRow {
        match self {
            Resolved::Linked(row) | Resolved::Existing(row) | Resolved::Created(row) => row,
        }
    }
}

/// Returns the user's insight, generating and storing one for their industry
/// when none exists yet. Only the persistence side can fail.
pub async fn resolve_insight(
    store: &dyn InsightStore,
    llm: &dyn TextGenerator,
    policy: &RetryPolicy,
    user: &User,
) -> Result<Resolved, AppError> {
    if let Some(id) = user.industry_insight_id {
        if let Some(row) = store.find_by_id(id).await? {
            return Ok(Resolved::Linked(row));
        }
    }

    let industry = industry_key(user);

    if let Some(row) = store.find_by_industry(&industry).await? {
        return Ok(Resolved::Existing(row));
    }

    let generated = generate(
        llm,
        "insights",
        &insight_request(&industry),
        IndustryInsightData::default,
    )
    .await;

    let label = format!("create insight '{industry}'");
    let row = with_retry(policy, &label, || {
        store.upsert_insight(&industry, &generated.value)
    })
    .await?;

    info!(
        "Created insight {} for industry '{}' ({})",
        row.id,
        industry,
        generated.status.as_str()
    );
    Ok(Resolved::Created(row))
}
