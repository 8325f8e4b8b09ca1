use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use serde::Deserialize;
use url::Url;

use crate::error::Error;
use crate::session::DiscordUser;

/// Upper bound on every outbound provider call, so a hung upstream cannot
/// pin request handlers indefinitely.
pub const OUTBOUND_TIMEOUT: Duration = Duration::from_secs(10);

/// Discord `OAuth2` configuration.
///
/// Required fields are constructor parameters — no runtime "missing field"
/// errors.
///
/// ```rust,ignore
/// use guildgate::OAuthConfig;
///
/// let config = OAuthConfig::new("client-id", "client-secret", "https://my-app.com/callback".parse()?);
/// // Endpoint overrides (used by the test suite to point at a mock server):
/// let config = config.with_token_url("https://custom.example.com/oauth2/token".parse()?);
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct OAuthConfig {
    pub(crate) client_id: String,
    pub(crate) client_secret: String,
    pub(crate) redirect_uri: Url,
    pub(crate) authorize_url: Url,
    pub(crate) token_url: Url,
    pub(crate) user_url: Url,
    pub(crate) scopes: Vec<String>,
}

impl OAuthConfig {
    #[must_use]
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        redirect_uri: Url,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            redirect_uri,
            authorize_url: "https://discord.com/oauth2/authorize"
                .parse()
                .expect("valid default URL"),
            token_url: "https://discord.com/api/oauth2/token"
                .parse()
                .expect("valid default URL"),
            user_url: "https://discord.com/api/users/@me"
                .parse()
                .expect("valid default URL"),
            scopes: vec!["identify".into()],
        }
    }

    /// Override the authorization endpoint.
    #[must_use]
    pub fn with_authorize_url(mut self, url: Url) -> Self {
        self.authorize_url = url;
        self
    }

    /// Override the token exchange endpoint.
    #[must_use]
    pub fn with_token_url(mut self, url: Url) -> Self {
        self.token_url = url;
        self
    }

    /// Override the current-user endpoint.
    #[must_use]
    pub fn with_user_url(mut self, url: Url) -> Self {
        self.user_url = url;
        self
    }

    /// Override the `OAuth2` scopes (default: `["identify"]`).
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }
}

/// `OAuth2` authorization client for Discord.
pub struct AuthClient {
    config: OAuthConfig,
    http: reqwest::Client,
}

/// Authorization URL plus the state nonce to bind into a cookie.
#[non_exhaustive]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

/// Token response from the provider's token endpoint.
#[derive(Debug, Clone, Deserialize)]
#[non_exhaustive]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    #[serde(default)]
    pub expires_in: Option<u64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl AuthClient {
    #[must_use]
    pub fn new(config: OAuthConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()
            .expect("reqwest client with static configuration");
        Self { config, http }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Generate an authorization URL with a fresh anti-forgery state nonce.
    #[must_use]
    pub fn authorization_url(&self) -> AuthorizationRequest {
        let state = generate_state();
        let scope = self.config.scopes.join(" ");

        let mut url = self.config.authorize_url.clone();
        url.query_pairs_mut()
            .append_pair("response_type", "code")
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", self.config.redirect_uri.as_str())
            .append_pair("state", &state)
            .append_pair("scope", &scope);

        AuthorizationRequest {
            url: url.into(),
            state,
        }
    }

    /// Exchange an authorization code for tokens.
    ///
    /// Never retried: authorization codes are single-use, so a retry would
    /// fail at the provider anyway.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or [`Error::Upstream`]
    /// with the provider's error body on a non-success status.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenResponse, Error> {
        let params = [
            ("grant_type", "authorization_code"),
            ("code", code),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
        ];

        let response = self
            .http
            .post(self.config.token_url.clone())
            .form(&params)
            .send()
            .await?;

        let response = Error::ensure_success(response, "token exchange").await?;
        response.json::<TokenResponse>().await.map_err(Into::into)
    }

    /// Fetch the authenticated user using an access token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or [`Error::Upstream`]
    /// if the current-user endpoint answers with a non-success status.
    pub async fn current_user(&self, access_token: &str) -> Result<DiscordUser, Error> {
        let response = self
            .http
            .get(self.config.user_url.clone())
            .bearer_auth(access_token)
            .send()
            .await?;

        let response = Error::ensure_success(response, "current-user request").await?;
        response.json::<DiscordUser>().await.map_err(Into::into)
    }
}

/// Generates a cryptographically random state nonce for `OAuth2`.
///
/// Returns a 22-character URL-safe string (16 random bytes → base64url).
#[must_use]
pub fn generate_state() -> String {
    let random_bytes: [u8; 16] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> OAuthConfig {
        OAuthConfig::new(
            "test-client",
            "test-secret",
            "https://example.com/callback".parse().unwrap(),
        )
    }

    #[test]
    fn test_authorization_url_parameters() {
        let client = AuthClient::new(test_config());
        let req = client.authorization_url();

        assert!(req.url.starts_with("https://discord.com/oauth2/authorize?"));
        assert!(req.url.contains("response_type=code"));
        assert!(req.url.contains("client_id=test-client"));
        assert!(req.url.contains("scope=identify"));
        assert!(req.url.contains(&format!("state={}", req.state)));
        assert!(!req.state.is_empty());
    }

    #[test]
    fn test_authorization_url_never_leaks_client_secret() {
        let client = AuthClient::new(test_config());
        let req = client.authorization_url();
        assert!(!req.url.contains("test-secret"));
    }

    #[test]
    fn test_state_unique_per_call() {
        let client = AuthClient::new(test_config());
        let req1 = client.authorization_url();
        let req2 = client.authorization_url();
        assert_ne!(req1.state, req2.state);
    }

    #[test]
    fn test_state_length_and_alphabet() {
        let state = generate_state();
        assert_eq!(state.len(), 22);
        assert!(
            state
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "state should be URL-safe: {state}"
        );
    }

    #[test]
    fn test_config_constructor_defaults() {
        let config = test_config();
        assert_eq!(config.client_id(), "test-client");
        assert_eq!(config.redirect_uri().as_str(), "https://example.com/callback");
        assert_eq!(
            config.token_url.as_str(),
            "https://discord.com/api/oauth2/token"
        );
    }

    #[test]
    fn test_config_with_overrides() {
        let config = test_config()
            .with_token_url("https://custom.example.com/token".parse().unwrap())
            .with_scopes(vec!["identify".into(), "guilds".into()]);

        assert_eq!(config.token_url.as_str(), "https://custom.example.com/token");
        assert_eq!(config.scopes, ["identify", "guilds"]);
    }
}
