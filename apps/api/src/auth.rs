//! Caller identity.
//!
//! Sessions are resolved upstream; the proxy forwards the auth provider's user
//! id in `x-user-id`. A missing header or an unknown id is a hard failure and
//! is never papered over by a fallback.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};

use crate::errors::AppError;
use crate::models::user::User;
use crate::state::AppState;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The stored user behind the current request.
pub struct AuthUser(pub User);

pub fn external_id_from_headers(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(USER_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Authentication required".to_string()))
}

pub async fn find_user(
    pool: &sqlx::PgPool,
    external_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE external_id = $1")
        .bind(external_id)
        .fetch_optional(pool)
        .await
}

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let external_id = external_id_from_headers(&parts.headers)?;
        let user = find_user(&state.db, external_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;
        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_external_id_is_read_and_trimmed() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static(" user_2abc "));
        assert_eq!(external_id_from_headers(&headers).unwrap(), "user_2abc");
    }

    #[test]
    fn test_missing_or_blank_header_is_unauthorized() {
        let mut headers = HeaderMap::new();
        assert!(matches!(
            external_id_from_headers(&headers),
            Err(AppError::Unauthorized(_))
        ));

        headers.insert(USER_ID_HEADER, HeaderValue::from_static("   "));
        assert!(matches!(
            external_id_from_headers(&headers),
            Err(AppError::Unauthorized(_))
        ));
    }
}
