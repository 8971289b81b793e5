//! Axum route handlers for the Cover Letter API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::cover_letter::{
    create_cover_letter, delete_cover_letter, get_cover_letter, list_cover_letters,
    CoverLetterInput,
};
use crate::errors::AppError;
use crate::models::cover_letter::CoverLetterRow;
use crate::state::AppState;

/// POST /api/v1/cover-letters
///
/// Always returns a stored letter. `status` tells whether it was generated
/// or is the templated fallback.
pub async fn handle_create(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(input): Json<CoverLetterInput>,
) -> Result<(StatusCode, Json<CoverLetterRow>), AppError> {
    let row =
        create_cover_letter(&state.db, state.llm.as_ref(), &state.retry, &user, &input).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// GET /api/v1/cover-letters
pub async fn handle_list(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<CoverLetterRow>>, AppError> {
    Ok(Json(list_cover_letters(&state.db, user.id).await?))
}

/// GET /api/v1/cover-letters/:id
pub async fn handle_get(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<CoverLetterRow>, AppError> {
    get_cover_letter(&state.db, user.id, id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Cover letter {id} not found")))
}

/// DELETE /api/v1/cover-letters/:id
pub async fn handle_delete(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if delete_cover_letter(&state.db, &state.retry, user.id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Cover letter {id} not found")))
    }
}
