use axum_extra::extract::cookie::{Cookie, SameSite};
use time::Duration;

pub(super) const STATE_COOKIE_NAME: &str = "guildgate_oauth_state";
pub(super) const SESSION_COOKIE_NAME: &str = "guildgate_session";

/// State nonce cookie for the authorization request. Short-lived: it only
/// needs to survive the round trip to the provider's consent screen.
pub(super) fn state_cookie(nonce: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((STATE_COOKIE_NAME, nonce.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(Duration::minutes(5))
        .build()
}

/// Removal cookie for the state nonce.
pub(super) fn clear_state_cookie() -> Cookie<'static> {
    Cookie::build((STATE_COOKIE_NAME, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}

/// Session cookie holding the signed session id. No `Max-Age`: the browser
/// keeps it for the session while the store enforces idle expiry.
pub(super) fn session_cookie(signed_id: &str, secure: bool) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, signed_id.to_string()))
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Lax)
        .path("/")
        .build()
}

/// Removal cookie for the session.
pub(super) fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .max_age(Duration::ZERO)
        .build()
}
