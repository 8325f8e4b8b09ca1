//! Axum layer: routes, cookies, session extraction, and error mapping.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use guildgate::{AccessResolver, AppState, AuthClient, MemorySessionStore, OAuthConfig, Signer};
//!
//! let config = guildgate::Config::from_env()?;
//! let state = AppState::new(
//!     AuthClient::new(OAuthConfig::new(config.client_id, config.client_secret, config.redirect_uri)),
//!     AccessResolver::new(config.guild),
//!     Arc::new(MemorySessionStore::new()),
//!     Signer::new(config.session_secret.as_bytes()),
//!     config.files_dir,
//!     config.secure_cookies,
//! );
//! let app = guildgate::http::router(state, &config.public_dir);
//! ```

mod cookies;
mod downloads;
mod error;
mod extractor;
mod routes;
mod state;

pub use error::ApiError;
pub use extractor::AuthSession;
pub use routes::router;
pub use state::AppState;
