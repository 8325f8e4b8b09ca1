use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::Error;

/// Route-level failures, translated exhaustively onto HTTP statuses.
///
/// Every handler returns `Result<_, ApiError>`; this is the single place
/// where failures become status codes, so no route sends ad hoc statuses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// OAuth callback code/state missing or mismatched.
    #[error("invalid OAuth state")]
    InvalidState,

    /// Missing, unverifiable, or unknown session.
    #[error("not authenticated")]
    Unauthenticated,

    /// Authenticated but lacking the required entitlement.
    #[error("insufficient entitlement")]
    Forbidden,

    /// Requested archive is not on disk.
    #[error("file not found")]
    NotFound,

    /// Provider call failed (surfaced with the provider's error text).
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Session store operation failed.
    #[error("session store error: {0}")]
    Store(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            Self::InvalidState => StatusCode::BAD_REQUEST,
            Self::Unauthenticated => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Upstream(_) | Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (status, self.to_string()).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(e: Error) -> Self {
        Self::Upstream(e.to_string())
    }
}
