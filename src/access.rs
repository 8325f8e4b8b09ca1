use serde::{Deserialize, Serialize};

use crate::config::GuildConfig;
use crate::error::Error;
use crate::oauth::OUTBOUND_TIMEOUT;
use crate::session::UserId;

const DEFAULT_API_BASE: &str = "https://discord.com/api";

/// Tiered entitlements derived from guild roles.
///
/// Computed fresh on every check so role changes in Discord take effect on
/// the next request. Invariant: `has_pro` implies `has_basic`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AccessRights {
    pub has_basic: bool,
    pub has_pro: bool,
}

#[derive(Debug, Deserialize)]
struct GuildMember {
    #[serde(default)]
    roles: Vec<String>,
}

/// Resolves a user's guild roles into [`AccessRights`] using a bot credential.
pub struct AccessResolver {
    guild: GuildConfig,
    api_base: String,
    http: reqwest::Client,
}

impl AccessResolver {
    #[must_use]
    pub fn new(guild: GuildConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(OUTBOUND_TIMEOUT)
            .build()
            .expect("reqwest client with static configuration");
        Self {
            guild,
            api_base: DEFAULT_API_BASE.into(),
            http,
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    /// Override the provider API base URL.
    #[must_use]
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = base.into();
        self
    }

    /// Role ids held by `user_id` in the configured guild.
    ///
    /// Incomplete guild configuration yields an empty list (fail closed:
    /// missing settings deny entitlement rather than crash the request), as
    /// does a user who is not a guild member.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or [`Error::Upstream`]
    /// for any provider status other than success or not-found.
    pub async fn fetch_roles(&self, user_id: &UserId) -> Result<Vec<String>, Error> {
        let GuildConfig {
            guild_id: Some(guild_id),
            bot_token: Some(bot_token),
            basic_role_id: Some(_),
            pro_role_id: Some(_),
        } = &self.guild
        else {
            tracing::warn!("incomplete guild configuration; denying entitlements");
            return Ok(Vec::new());
        };

        let url = format!(
            "{}/guilds/{}/members/{}",
            self.api_base.trim_end_matches('/'),
            guild_id,
            user_id
        );
        let response = self
            .http
            .get(url)
            .header(reqwest::header::AUTHORIZATION, format!("Bot {bot_token}"))
            .send()
            .await?;

        // Not being a member is an answer, not an error.
        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(Vec::new());
        }

        let response = Error::ensure_success(response, "guild member lookup").await?;
        let member = response.json::<GuildMember>().await?;
        Ok(member.roles)
    }

    /// Entitlements for `user_id`. The Pro role subsumes Basic, so a Pro
    /// holder gets Basic content without the Basic role being assigned.
    ///
    /// # Errors
    ///
    /// Propagates [`fetch_roles`](Self::fetch_roles) failures.
    pub async fn get_access(&self, user_id: &UserId) -> Result<AccessRights, Error> {
        let roles = self.fetch_roles(user_id).await?;
        Ok(derive_access(&roles, &self.guild))
    }
}

fn derive_access(roles: &[String], guild: &GuildConfig) -> AccessRights {
    let holds = |role_id: &Option<String>| {
        role_id
            .as_ref()
            .is_some_and(|id| roles.iter().any(|r| r == id))
    };
    let has_pro = holds(&guild.pro_role_id);
    let has_basic = has_pro || holds(&guild.basic_role_id);
    AccessRights { has_basic, has_pro }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guild() -> GuildConfig {
        GuildConfig {
            guild_id: Some("9000".into()),
            bot_token: Some("bot-token".into()),
            basic_role_id: Some("1111".into()),
            pro_role_id: Some("2222".into()),
        }
    }

    fn roles(ids: &[&str]) -> Vec<String> {
        ids.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn no_roles_no_access() {
        let rights = derive_access(&[], &guild());
        assert!(!rights.has_basic);
        assert!(!rights.has_pro);
    }

    #[test]
    fn basic_role_grants_basic_only() {
        let rights = derive_access(&roles(&["1111"]), &guild());
        assert!(rights.has_basic);
        assert!(!rights.has_pro);
    }

    #[test]
    fn pro_role_subsumes_basic() {
        let rights = derive_access(&roles(&["2222"]), &guild());
        assert!(rights.has_basic);
        assert!(rights.has_pro);
    }

    #[test]
    fn pro_implies_basic_for_any_role_list() {
        let candidates = [
            roles(&[]),
            roles(&["1111"]),
            roles(&["2222"]),
            roles(&["1111", "2222"]),
            roles(&["3333", "2222", "4444"]),
            roles(&["3333"]),
        ];
        for list in candidates {
            let rights = derive_access(&list, &guild());
            assert!(!rights.has_pro || rights.has_basic, "violated for {list:?}");
        }
    }

    #[test]
    fn unrelated_roles_grant_nothing() {
        let rights = derive_access(&roles(&["3333", "4444"]), &guild());
        assert!(!rights.has_basic);
        assert!(!rights.has_pro);
    }

    #[test]
    fn unconfigured_role_ids_grant_nothing() {
        let rights = derive_access(&roles(&["1111", "2222"]), &GuildConfig::default());
        assert!(!rights.has_basic);
        assert!(!rights.has_pro);
    }
}
