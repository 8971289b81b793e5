// Interview preparation: quiz generation, assessment grading with an optional
// improvement tip, and assessment history.

pub mod handlers;
pub mod prompts;
pub mod quiz;

use serde::Deserialize;
use sqlx::types::Json;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::db::{with_retry, RetryPolicy};
use crate::errors::AppError;
use crate::extraction::{generate, ExtractionError, Generated, GenerationRequest, StructuredReply};
use crate::insights::industry_key;
use crate::llm_client::prompts::JSON_ONLY_INSTRUCTION;
use crate::llm_client::TextGenerator;
use crate::models::assessment::{AssessmentRow, QuestionResult};
use crate::models::user::User;

use self::prompts::{IMPROVEMENT_TIP_PROMPT_TEMPLATE, QUIZ_PROMPT_TEMPLATE};
use self::quiz::{Quiz, QuizQuestion};

pub const ASSESSMENT_CATEGORY: &str = "Technical";

pub fn quiz_request(user: &User) -> GenerationRequest {
    let skills_clause = if user.skills.is_empty() {
        String::new()
    } else {
        format!(" with expertise in {}", user.skills.join(", "))
    };

    GenerationRequest::new(QUIZ_PROMPT_TEMPLATE)
        .param("industry", industry_key(user))
        .param("skills_clause", skills_clause)
        .param("json_only", JSON_ONLY_INSTRUCTION)
}

/// Never fails; a model outage yields the static question set.
pub async fn generate_quiz(llm: &dyn TextGenerator, user: &User) -> Generated<Quiz> {
    generate(llm, "quiz", &quiz_request(user), Quiz::fallback).await
}

/// Request body for `POST /api/v1/interview/assessments`.
#[derive(Debug, Clone, Deserialize)]
pub struct AssessmentInput {
    pub questions: Vec<QuizQuestion>,
    #[serde(default)]
    pub answers: Vec<Option<String>>,
    pub score: f64,
}

impl AssessmentInput {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.questions.is_empty() {
            return Err(AppError::Validation("questions cannot be empty".to_string()));
        }
        if !self.score.is_finite() || !(0.0..=100.0).contains(&self.score) {
            return Err(AppError::Validation(format!(
                "score must be between 0 and 100, got {}",
                self.score
            )));
        }
        Ok(())
    }
}

/// Pairs each question with the answer at the same position. Unanswered
/// questions are graded wrong with an empty answer.
pub fn grade_answers(
    questions: &[QuizQuestion],
    answers: &[Option<String>],
) -> Vec<QuestionResult> {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let user_answer = answers.get(i).cloned().flatten().unwrap_or_default();
            QuestionResult {
                question: q.question.clone(),
                is_correct: user_answer == q.correct_answer,
                correct_answer: q.correct_answer.clone(),
                user_answer,
                explanation: q.explanation.clone(),
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImprovementTip(pub String);

impl StructuredReply for ImprovementTip {
    fn from_reply(raw: &str) -> Result<Self, ExtractionError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(ExtractionError::NoPayload);
        }
        Ok(ImprovementTip(text.to_string()))
    }
}

pub fn improvement_tip_request(user: &User, wrong: &[&QuestionResult]) -> GenerationRequest {
    let wrong_summary = wrong
        .iter()
        .map(|r| {
            format!(
                "Question: \"{}\"\nCorrect Answer: \"{}\"\nUser Answer: \"{}\"",
                r.question, r.correct_answer, r.user_answer
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n");

    GenerationRequest::new(IMPROVEMENT_TIP_PROMPT_TEMPLATE)
        .param("industry", industry_key(user))
        .param("wrong_summary", wrong_summary)
}

/// `None` when everything was answered correctly or the model gave nothing usable.
pub async fn improvement_tip(
    llm: &dyn TextGenerator,
    user: &User,
    results: &[QuestionResult],
) -> Option<String> {
    let wrong: Vec<&QuestionResult> = results.iter().filter(|r| !r.is_correct).collect();
    if wrong.is_empty() {
        return None;
    }

    let tip = generate(
        llm,
        "improvement tip",
        &improvement_tip_request(user, &wrong),
        || ImprovementTip(String::new()),
    )
    .await;

    (!tip.is_fallback()).then_some(tip.value.0)
}

/// Grades the answers, asks for a tip when needed and stores the result.
pub async fn save_assessment(
    pool: &PgPool,
    llm: &dyn TextGenerator,
    policy: &RetryPolicy,
    user: &User,
    input: &AssessmentInput,
) -> Result<AssessmentRow, AppError> {
    input.validate()?;

    let results = grade_answers(&input.questions, &input.answers);
    let tip = improvement_tip(llm, user, &results).await;

    let id = Uuid::new_v4();
    let row = with_retry(policy, "insert assessment", || {
        insert_assessment(pool, id, user.id, input.score, &results, tip.as_deref())
    })
    .await?;

    info!(
        "Stored assessment {} for user {} (score {:.1}, tip: {})",
        row.id,
        user.id,
        row.quiz_score,
        row.improvement_tip.is_some()
    );
    Ok(row)
}

async fn insert_assessment(
    pool: &PgPool,
    id: Uuid,
    user_id: Uuid,
    score: f64,
    results: &[QuestionResult],
    tip: Option<&str>,
) -> Result<AssessmentRow, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>(
        r#"
        INSERT INTO assessments (id, user_id, quiz_score, category, questions, improvement_tip)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (id) DO UPDATE SET id = EXCLUDED.id
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(score)
    .bind(ASSESSMENT_CATEGORY)
    .bind(Json(results))
    .bind(tip)
    .fetch_one(pool)
    .await
}

/// The user's assessments, newest first.
pub async fn list_assessments(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Vec<AssessmentRow>, sqlx::Error> {
    sqlx::query_as::<_, AssessmentRow>(
        "SELECT * FROM assessments WHERE user_id = $1 ORDER BY created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
}
