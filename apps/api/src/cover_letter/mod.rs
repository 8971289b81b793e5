//! Cover letters — generate from the caller's profile and a job posting, then
//! list, fetch and delete the stored letters.
//!
//! The reply is prose, so "parsing" is a trim. Any failure produces a
//! templated letter and the row is stored with status `fallback`.

pub mod handlers;
pub mod prompts;

use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::{delete_with_retry, with_retry, RetryPolicy};
use crate::errors::AppError;
use crate::extraction::{generate, ExtractionError, Generated, GenerationRequest, StructuredReply};
use crate::llm_client::prompts::NOT_AVAILABLE;
use crate::llm_client::TextGenerator;
use crate::models::cover_letter::CoverLetterRow;
use crate::models::user::User;

use self::prompts::COVER_LETTER_PROMPT_TEMPLATE;

/// Request body for `POST /api/v1/cover-letters`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterInput {
    pub job_title: String,
    pub company_name: String,
    pub job_description: String,
}

impl CoverLetterInput {
    pub fn validate(&self) -> Result<(), AppError> {
        for (field, value) in [
            ("jobTitle", &self.job_title),
            ("companyName", &self.company_name),
            ("jobDescription", &self.job_description),
        ] {
            if value.trim().is_empty() {
                return Err(AppError::Validation(format!("{field} cannot be empty")));
            }
        }
        Ok(())
    }
}

/// Markdown letter body.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverLetterBody(pub String);

impl StructuredReply for CoverLetterBody {
    fn from_reply(raw: &str) -> Result<Self, ExtractionError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(ExtractionError::NoPayload);
        }
        Ok(CoverLetterBody(text.to_string()))
    }
}

fn skills_or(user: &User, default: &str) -> String {
    if user.skills.is_empty() {
        default.to_string()
    } else {
        user.skills.join(", ")
    }
}

fn text_or(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(default)
        .to_string()
}

impl CoverLetterBody {
    /// Letter used when generation fails, filled from the profile.
    pub fn fallback(user: &User, input: &CoverLetterInput) -> Self {
        let experience = user
            .experience
            .map(|years| years.to_string())
            .unwrap_or_else(|| "X".to_string());
        let industry = text_or(user.industry.as_deref(), "your industry");
        let skills = skills_or(user, "key technologies");
        let signature = text_or(user.bio.as_deref(), "Your Name");
        let job_title = input.job_title.trim();
        let company = input.company_name.trim();

        CoverLetterBody(format!(
            "Dear Hiring Manager,\n\n\
             I am excited to apply for the {job_title} role at {company}. With {experience} years of \
             experience in {industry} and skills in {skills}, I am confident in my ability to \
             contribute effectively to your team.\n\n\
             I am particularly drawn to {company} because of your commitment to innovation and \
             excellence. I look forward to the opportunity to bring my expertise and enthusiasm to \
             your projects.\n\n\
             Thank you for your time and consideration.\n\n\
             Sincerely,\n\
             {signature}"
        ))
    }
}

pub fn cover_letter_request(user: &User, input: &CoverLetterInput) -> GenerationRequest {
    GenerationRequest::new(COVER_LETTER_PROMPT_TEMPLATE)
        .param("job_title", input.job_title.trim())
        .param("company_name", input.company_name.trim())
        .param("industry", text_or(user.industry.as_deref(), NOT_AVAILABLE))
        .param(
            "experience",
            user.experience
                .map(|years| years.to_string())
                .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        )
        .param("skills", skills_or(user, NOT_AVAILABLE))
        .param("bio", text_or(user.bio.as_deref(), NOT_AVAILABLE))
        .param("job_description", input.job_description.trim())
}

/// Generates a letter (or the fallback) and stores it.
pub async fn create_cover_letter(
    pool: &PgPool,
    llm: &dyn TextGenerator,
    policy: &RetryPolicy,
    user: &User,
    input: &CoverLetterInput,
) -> Result<CoverLetterRow, AppError> {
    input.validate()?;

    let generated = generate(
        llm,
        "cover letter",
        &cover_letter_request(user, input),
        || CoverLetterBody::fallback(user, input),
    )
    .await;

    // Id is fixed up front so a retried insert lands on the same row.
    let id = Uuid::new_v4();
    let row = with_retry(policy, "insert cover letter", || {
        insert_cover_letter(pool, id, user.id, input, &generated)
    })
    .await?;

    info!(
        "Stored cover letter {} for user {} ({})",
        row.id,
        user.id,
        row.status
    );
    Ok(row)
}

async fn insert_cover_letter(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    input: &CoverLetterInput,
    generated: &Generated<CoverLetterBody>,
) -> Result<CoverLetterRow, sqlx::Error> {
    sqlx::query_as::<_, CoverLetterRow>(
        r#"
        INSERT INTO cover_letters
            (id, user_id, content, job_description, company_name, job_title, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(&generated.value.0)
    .bind(input.job_description.trim())
    .bind(input.company_name.trim())
    .bind(input.job_title.trim())
    .bind(generated.status.as_str())
    .fetch_one(pool)
    .await
}

/// The user's letters, newest first.
pub async fn list_cover_letters(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<CoverLetterRow>, sqlx::Error> {
    sqlx::query_as::<_, CoverLetterRow>(
        "SELECT * FROM cover_letters WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}

pub async fn get_cover_letter(
    pool: &PgPool,
    user_id: Uuid,
    id: Uuid,
) -> Result<Option<CoverLetterRow>, sqlx::Error> {
    sqlx::query_as::<_, CoverLetterRow>(
        "SELECT * FROM cover_letters WHERE id = $1 AND user_id = $2",
    )
    .bind(id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
}

/// Returns whether the letter is gone; `false` when it never existed.
pub async fn delete_cover_letter(
    pool: &PgPool,
    policy: &RetryPolicy,
    user_id: Uuid,
    id: Uuid,
) -> Result<bool, sqlx::Error> {
    delete_with_retry(policy, "delete cover letter", || async move {
        let result = sqlx::query("DELETE FROM cover_letters WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok::<_, sqlx::Error>(result.rows_affected())
    })
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extraction::GenerationStatus;
    use crate::llm_client::fake::ScriptedGenerator;
    use chrono::Utc;

    fn user(full_profile: bool) -> User {
        User {
            id: Uuid::new_v4(),
            external_id: "user_1".to_string(),
            email: "ada@example.com".to_string(),
            industry: full_profile.then(|| "tech-software".to_string()),
            experience: full_profile.then_some(6),
            skills: if full_profile {
                vec!["Rust".to_string(), "PostgreSQL".to_string()]
            } else {
                vec![]
            },
            bio: full_profile.then(|| "Ada Lovelace".to_string()),
            industry_insight_id: None,
            created_at: Utc::now(),
        }
    }

    fn input() -> CoverLetterInput {
        CoverLetterInput {
            job_title: "Backend Engineer".to_string(),
            company_name: "Acme".to_string(),
            job_description: "Build APIs in Rust. Use {braces} freely.".to_string(),
        }
    }

    #[test]
    fn test_prompt_embeds_profile_and_description_verbatim() {
        let prompt = cover_letter_request(&user(true), &input()).render();
        assert!(prompt.contains("a Backend Engineer position at Acme"));
        assert!(prompt.contains("- Skills: Rust, PostgreSQL"));
        assert!(prompt.contains("- Experience: 6 years"));
        assert!(prompt.contains("Use {braces} freely."));
    }

    #[test]
    fn test_prompt_marks_missing_profile_fields() {
        let prompt = cover_letter_request(&user(false), &input()).render();
        assert!(prompt.contains("- Industry: N/A"));
        assert!(prompt.contains("- Experience: N/A years"));
        assert!(prompt.contains("- Bio: N/A"));
    }

    #[test]
    fn test_fallback_uses_profile_defaults() {
        let CoverLetterBody(text) = CoverLetterBody::fallback(&user(false), &input());
        assert!(text.starts_with("Dear Hiring Manager,"));
        assert!(text.contains("the Backend Engineer role at Acme"));
        assert!(text.contains("With X years of experience in your industry"));
        assert!(text.contains("skills in key technologies"));
        assert!(text.ends_with("Your Name"));
    }

    #[test]
    fn test_fallback_uses_profile_values() {
        let CoverLetterBody(text) = CoverLetterBody::fallback(&user(true), &input());
        assert!(text.contains("With 6 years of experience in tech-software"));
        assert!(text.contains("skills in Rust, PostgreSQL"));
        assert!(text.ends_with("Ada Lovelace"));
    }

    #[test]
    fn test_validation_rejects_blank_fields() {
        let mut bad = input();
        bad.company_name = "  ".to_string();
        assert!(matches!(
            bad.validate(),
            Err(AppError::Validation(msg)) if msg.contains("companyName")
        ));
        assert!(input().validate().is_ok());
    }

    #[test]
    fn test_input_uses_camel_case() {
        let parsed: CoverLetterInput = serde_json::from_str(
            r#"{"jobTitle": "SRE", "companyName": "Initech", "jobDescription": "Keep it up"}"#,
        )
        .unwrap();
        assert_eq!(parsed.job_title, "SRE");
    }

    #[tokio::test]
    async fn test_reply_is_trimmed() {
        let llm = ScriptedGenerator::replying(["\n\n# Dear Acme team\n\nHello.\n  "]);
        let profile = user(true);
        let request = cover_letter_request(&profile, &input());
        let result = generate(&llm, "cover letter", &request, || {
            CoverLetterBody::fallback(&profile, &input())
        })
        .await;
        assert_eq!(result.status, GenerationStatus::Completed);
        assert_eq!(result.value.0, "# Dear Acme team\n\nHello.");
    }

    #[tokio::test]
    async fn test_blank_reply_falls_back() {
        let profile = user(true);
        let llm = ScriptedGenerator::replying(["   "]);
        let request = cover_letter_request(&profile, &input());
        let result = generate(&llm, "cover letter", &request, || {
            CoverLetterBody::fallback(&profile, &input())
        })
        .await;
        assert_eq!(result.status, GenerationStatus::Fallback);
        assert!(result.value.0.contains("Dear Hiring Manager"));
    }
}
