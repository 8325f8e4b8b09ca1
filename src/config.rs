use std::net::SocketAddr;
use std::path::PathBuf;

use url::Url;

use crate::error::Error;

/// Service configuration, read once at startup.
///
/// Required settings are validated here so route handlers never discover a
/// missing credential mid-request.
#[derive(Debug, Clone)]
pub struct Config {
    /// OAuth2 application client id.
    pub client_id: String,
    /// OAuth2 application client secret.
    pub client_secret: String,
    /// Registered OAuth2 callback URL.
    pub redirect_uri: Url,
    /// HMAC key for the session cookie.
    pub session_secret: String,
    /// Role-gating settings; incomplete settings deny entitlement.
    pub guild: GuildConfig,
    pub listen_addr: SocketAddr,
    /// Directory holding `basic.zip` and `pro.zip`.
    pub files_dir: PathBuf,
    /// Public asset directory.
    pub public_dir: PathBuf,
    pub secure_cookies: bool,
}

/// Guild role-gating settings.
///
/// Every field is optional on purpose: when any is absent the role lookup
/// degrades to an empty role list, so misconfiguration denies downloads
/// instead of crashing the service.
#[derive(Debug, Clone, Default)]
pub struct GuildConfig {
    pub guild_id: Option<String>,
    pub bot_token: Option<String>,
    pub basic_role_id: Option<String>,
    pub pro_role_id: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Required env vars
    /// - `DISCORD_CLIENT_ID`
    /// - `DISCORD_CLIENT_SECRET`
    /// - `DISCORD_REDIRECT_URI` (must be a valid URL)
    /// - `SESSION_SECRET`
    ///
    /// # Optional env vars
    /// - `DISCORD_GUILD_ID`, `DISCORD_BOT_TOKEN`, `BASIC_ROLE_ID`,
    ///   `PRO_ROLE_ID`: role gating; downloads are denied while any is unset
    /// - `LISTEN_ADDR` (default `0.0.0.0:3000`)
    /// - `FILES_DIR` (default `files`), `PUBLIC_DIR` (default `public`)
    /// - `SECURE_COOKIES`: set `0` or `false` for plain-HTTP development
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] naming the offending variable.
    pub fn from_env() -> Result<Self, Error> {
        let client_id = required("DISCORD_CLIENT_ID")?;
        let client_secret = required("DISCORD_CLIENT_SECRET")?;
        let redirect_uri: Url = required("DISCORD_REDIRECT_URI")?
            .parse()
            .map_err(|e| Error::Config(format!("DISCORD_REDIRECT_URI: {e}")))?;
        let session_secret = required("SESSION_SECRET")?;

        let guild = GuildConfig {
            guild_id: optional("DISCORD_GUILD_ID"),
            bot_token: optional("DISCORD_BOT_TOKEN"),
            basic_role_id: optional("BASIC_ROLE_ID"),
            pro_role_id: optional("PRO_ROLE_ID"),
        };

        let listen_addr = match optional("LISTEN_ADDR") {
            Some(addr) => addr
                .parse()
                .map_err(|e| Error::Config(format!("LISTEN_ADDR: {e}")))?,
            None => SocketAddr::from(([0, 0, 0, 0], 3000)),
        };

        let secure_cookies = !matches!(
            optional("SECURE_COOKIES").as_deref(),
            Some("0") | Some("false")
        );

        Ok(Self {
            client_id,
            client_secret,
            redirect_uri,
            session_secret,
            guild,
            listen_addr,
            files_dir: optional("FILES_DIR").map_or_else(|| "files".into(), PathBuf::from),
            public_dir: optional("PUBLIC_DIR").map_or_else(|| "public".into(), PathBuf::from),
            secure_cookies,
        })
    }
}

fn required(name: &'static str) -> Result<String, Error> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::Config(format!("{name} is required")))
}

fn optional(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
