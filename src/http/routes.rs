use std::path::Path;

use axum::Router;
use axum::extract::{Query, State};
use axum::response::Redirect;
use axum::routing::{get, post};
use axum::Json;
use axum_extra::extract::CookieJar;
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::cookies;
use super::downloads;
use super::error::ApiError;
use super::extractor::AuthSession;
use super::state::AppState;

/// Build the full application router.
///
/// Auth and download routes are state-backed; everything else falls back to
/// the public asset directory.
pub fn router(state: AppState, public_dir: &Path) -> Router {
    Router::new()
        .route("/login", get(login))
        .route("/callback", get(callback))
        .route("/api/me", get(me))
        .route("/logout", post(logout))
        .route("/premium/files/basic.zip", get(downloads::basic))
        .route("/premium/files/pro.zip", get(downloads::pro))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ── Login ──────────────────────────────────────────────────────────

async fn login(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let auth_req = state.auth.authorization_url();
    let jar = jar.add(cookies::state_cookie(&auth_req.state, state.secure_cookies));
    (jar, Redirect::to(&auth_req.url))
}

// ── Callback ───────────────────────────────────────────────────────

#[derive(Deserialize)]
struct CallbackParams {
    code: Option<String>,
    state: Option<String>,
}

async fn callback(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let code = params.code.ok_or(ApiError::InvalidState)?;
    let received_state = params.state.ok_or(ApiError::InvalidState)?;
    let issued_state = jar
        .get(cookies::STATE_COOKIE_NAME)
        .map(|c| c.value().to_string())
        .ok_or(ApiError::InvalidState)?;

    // An attacker cannot forge a callback without the victim's nonce cookie.
    if received_state != issued_state {
        tracing::warn!("OAuth state mismatch");
        return Err(ApiError::InvalidState);
    }

    let token = state.auth.exchange_code(&code).await?;
    let user = state.auth.current_user(&token.access_token).await?;

    tracing::info!(user_id = %user.id, username = %user.username, "OAuth login successful");

    let session_id = state
        .sessions
        .create(user)
        .await
        .map_err(|e| ApiError::Store(e.to_string()))?;

    let signed = state.signer.sign(session_id.as_str());
    let jar = jar
        .add(cookies::clear_state_cookie())
        .add(cookies::session_cookie(&signed, state.secure_cookies));

    Ok((jar, Redirect::to("/")))
}

// ── Identity ───────────────────────────────────────────────────────

#[derive(Serialize)]
struct MeResponse {
    discord_user_id: String,
    username: String,
    has_basic: bool,
    has_pro: bool,
}

async fn me(
    State(state): State<AppState>,
    AuthSession(session): AuthSession,
) -> Result<Json<MeResponse>, ApiError> {
    let access = state.access.get_access(&session.user.id).await?;
    Ok(Json(MeResponse {
        discord_user_id: session.user.id.to_string(),
        username: session.user.username,
        has_basic: access.has_basic,
        has_pro: access.has_pro,
    }))
}

// ── Logout ─────────────────────────────────────────────────────────

async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
    AuthSession(session): AuthSession,
) -> Result<(CookieJar, Json<serde_json::Value>), ApiError> {
    state
        .sessions
        .delete(&session.id)
        .await
        .map_err(|e| ApiError::Store(e.to_string()))?;

    let jar = jar.remove(cookies::clear_session_cookie());
    Ok((jar, Json(serde_json::json!({ "ok": true }))))
}
