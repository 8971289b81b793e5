//! Axum route handlers for interview preparation.

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::auth::AuthUser;
use crate::errors::AppError;
use crate::extraction::GenerationStatus;
use crate::interview::quiz::QuizQuestion;
use crate::interview::{generate_quiz, list_assessments, save_assessment, AssessmentInput};
use crate::models::assessment::AssessmentRow;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct QuizResponse {
    pub questions: Vec<QuizQuestion>,
    pub status: GenerationStatus,
}

/// POST /api/v1/interview/quiz
pub async fn handle_generate_quiz(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Json<QuizResponse> {
    let quiz = generate_quiz(state.llm.as_ref(), &user).await;
    Json(QuizResponse {
        questions: quiz.value.questions,
        status: quiz.status,
    })
}

/// POST /api/v1/interview/assessments
pub async fn handle_save_assessment(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<AssessmentInput>,
) -> Result<(StatusCode, Json<AssessmentRow>), AppError> {
    let row = save_assessment(&state.db, state.llm.as_ref(), &state.retry, &user, &input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/interview/assessments
pub async fn handle_list_assessments(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<AssessmentRow>>, AppError> {
    Ok(Json(list_assessments(&state.db, user.id).await?))
}
