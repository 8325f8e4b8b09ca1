use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::CookieJar;

use super::cookies::SESSION_COOKIE_NAME;
use super::error::ApiError;
use super::state::AppState;
use crate::session::{Session, SessionId};

/// Authenticated session extracted from the signed session cookie.
///
/// Use as an Axum extractor in route handlers. Rejects with `401
/// Unauthorized` when the cookie is missing, fails signature verification,
/// or names a session the store no longer holds — the protected handler is
/// never invoked in those cases.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected(AuthSession(session): AuthSession) -> impl IntoResponse {
///     format!("Hello, {}", session.user.username)
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthSession(pub Session);

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Unauthenticated)?;

        let token = jar
            .get(SESSION_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .ok_or(ApiError::Unauthenticated)?;

        let session_id = state
            .signer
            .verify(&token)
            .map(|id| SessionId(id.to_string()))
            .ok_or(ApiError::Unauthenticated)?;

        state
            .sessions
            .get(&session_id)
            .await
            .map_err(|e| ApiError::Store(e.to_string()))?
            .map(AuthSession)
            .ok_or(ApiError::Unauthenticated)
    }
}
