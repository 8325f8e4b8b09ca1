#![doc = include_str!("../README.md")]

pub mod access;
pub mod config;
pub mod error;
pub mod http;
pub mod oauth;
pub mod session;
pub mod signer;

// Re-exports for convenient access
pub use access::{AccessResolver, AccessRights};
pub use config::{Config, GuildConfig};
pub use error::Error;
pub use http::{router, ApiError, AppState, AuthSession};
pub use oauth::{AuthClient, AuthorizationRequest, OAuthConfig, TokenResponse};
pub use session::{
    DiscordUser, MemorySessionStore, Session, SessionId, SessionStore, UserId,
};
pub use signer::Signer;
