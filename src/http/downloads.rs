use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use tokio_util::io::ReaderStream;

use super::error::ApiError;
use super::extractor::AuthSession;
use super::state::AppState;
use crate::access::AccessRights;
use crate::session::Session;

// The only two servable archives. Filenames are these literals, never
// user input, so no path traversal is possible.
const BASIC_FILE: &str = "basic.zip";
const PRO_FILE: &str = "pro.zip";

pub(super) async fn basic(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<Response, ApiError> {
    serve(state, session, BASIC_FILE, |a| a.has_basic).await
}

pub(super) async fn pro(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<Response, ApiError> {
    serve(state, session, PRO_FILE, |a| a.has_pro).await
}

/// Entitlement is re-resolved on every request; the filesystem is only
/// touched once the check passes.
async fn serve(
    state: AppState,
    session: Session,
    file_name: &'static str,
    entitled: fn(&AccessRights) -> bool,
) -> Result<Response, ApiError> {
    let access = state.access.get_access(&session.user.id).await?;
    if !entitled(&access) {
        tracing::info!(user_id = %session.user.id, file = file_name, "download denied");
        return Err(ApiError::Forbidden);
    }

    let path = state.files_dir.join(file_name);
    let file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::error!(error = %e, path = %path.display(), "archive open failed");
            }
            return Err(ApiError::NotFound);
        }
    };

    tracing::info!(user_id = %session.user.id, file = file_name, "download granted");

    let headers = [
        (header::CONTENT_TYPE, "application/zip".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{file_name}\""),
        ),
    ];
    Ok((headers, Body::from_stream(ReaderStream::new(file))).into_response())
}
