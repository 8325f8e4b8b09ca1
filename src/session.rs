use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use derive_more::{Display, From, Into};
use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Discord user identifier (snowflake, kept as a string).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Opaque session identifier: 128 random bits, base64url.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, From, Into)]
#[serde(transparent)]
pub struct SessionId(pub String);

impl SessionId {
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identity fetched from Discord at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscordUser {
    pub id: UserId,
    pub username: String,
}

/// An authenticated session. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: SessionId,
    pub user: DiscordUser,
}

pub type StoreResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Session persistence.
///
/// The in-process [`MemorySessionStore`] is the default backend; the trait
/// exists so a durable store can be swapped in without touching route logic.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    /// Create a session for `user`. Returns the new session id.
    async fn create(&self, user: DiscordUser) -> StoreResult<SessionId>;

    /// Look up a live session. Unknown and expired ids both yield `None`.
    async fn get(&self, id: &SessionId) -> StoreResult<Option<Session>>;

    /// Delete a session. Deleting an unknown id is a no-op.
    async fn delete(&self, id: &SessionId) -> StoreResult<()>;
}

struct Entry {
    user: DiscordUser,
    last_seen: Instant,
}

/// Process-local session store.
///
/// Initialized empty at startup and discarded at shutdown — Discord remains
/// the source of truth for identity and entitlement, so losing sessions on
/// restart only forces a re-login. Entries expire after an idle TTL;
/// successful lookups refresh it.
pub struct MemorySessionStore {
    ttl: Duration,
    entries: Mutex<HashMap<SessionId, Entry>>,
}

impl MemorySessionStore {
    pub const DEFAULT_IDLE_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

    #[must_use]
    pub fn new() -> Self {
        Self::with_ttl(Self::DEFAULT_IDLE_TTL)
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }
}

impl Default for MemorySessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn create(&self, user: DiscordUser) -> StoreResult<SessionId> {
        let mut entries = self.entries.lock().await;
        // Re-draw on collision so ids are unique among live entries.
        let id = loop {
            let candidate = generate_session_id();
            if !entries.contains_key(&candidate) {
                break candidate;
            }
        };
        entries.insert(
            id.clone(),
            Entry {
                user,
                last_seen: Instant::now(),
            },
        );
        Ok(id)
    }

    async fn get(&self, id: &SessionId) -> StoreResult<Option<Session>> {
        let mut entries = self.entries.lock().await;
        let Some(entry) = entries.get_mut(id) else {
            return Ok(None);
        };
        if entry.last_seen.elapsed() > self.ttl {
            entries.remove(id);
            return Ok(None);
        }
        entry.last_seen = Instant::now();
        Ok(Some(Session {
            id: id.clone(),
            user: entry.user.clone(),
        }))
    }

    async fn delete(&self, id: &SessionId) -> StoreResult<()> {
        self.entries.lock().await.remove(id);
        Ok(())
    }
}

fn generate_session_id() -> SessionId {
    let random_bytes: [u8; 16] = rand::rng().random();
    SessionId(URL_SAFE_NO_PAD.encode(random_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str) -> DiscordUser {
        DiscordUser {
            id: UserId(id.to_string()),
            username: format!("user-{id}"),
        }
    }

    #[tokio::test]
    async fn create_then_get() {
        let store = MemorySessionStore::new();
        let id = store.create(user("42")).await.unwrap();
        let session = store.get(&id).await.unwrap().expect("session present");
        assert_eq!(session.id, id);
        assert_eq!(session.user.id.as_str(), "42");
        assert_eq!(session.user.username, "user-42");
    }

    #[tokio::test]
    async fn unknown_id_is_absent() {
        let store = MemorySessionStore::new();
        let missing = SessionId("nope".to_string());
        assert!(store.get(&missing).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_session() {
        let store = MemorySessionStore::new();
        let id = store.create(user("42")).await.unwrap();
        store.delete(&id).await.unwrap();
        assert!(store.get(&id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_unknown_id_is_noop() {
        let store = MemorySessionStore::new();
        let missing = SessionId("nope".to_string());
        store.delete(&missing).await.unwrap();
        store.delete(&missing).await.unwrap();
    }

    #[tokio::test]
    async fn ids_are_unique() {
        let store = MemorySessionStore::new();
        let a = store.create(user("1")).await.unwrap();
        let b = store.create(user("2")).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn id_has_128_bits_of_entropy() {
        // 16 bytes base64url without padding is 22 characters.
        let store = MemorySessionStore::new();
        let id = store.create(user("42")).await.unwrap();
        assert_eq!(id.as_str().len(), 22);
        assert!(!id.as_str().contains('.'));
    }

    #[tokio::test]
    async fn idle_sessions_expire() {
        let store = MemorySessionStore::with_ttl(Duration::ZERO);
        let id = store.create(user("42")).await.unwrap();
        tokio::time::sleep(Duration::from_millis(5)).await;
        assert!(store.get(&id).await.unwrap().is_none());
        // The expired entry is gone, not just hidden.
        assert!(store.entries.lock().await.is_empty());
    }
}
