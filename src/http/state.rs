use std::path::PathBuf;
use std::sync::Arc;

use crate::access::AccessResolver;
use crate::oauth::AuthClient;
use crate::session::SessionStore;
use crate::signer::Signer;

/// Shared state for all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub(super) auth: Arc<AuthClient>,
    pub(super) access: Arc<AccessResolver>,
    pub(super) sessions: Arc<dyn SessionStore>,
    pub(super) signer: Signer,
    pub(super) files_dir: PathBuf,
    pub(super) secure_cookies: bool,
}

impl AppState {
    #[must_use]
    pub fn new(
        auth: AuthClient,
        access: AccessResolver,
        sessions: Arc<dyn SessionStore>,
        signer: Signer,
        files_dir: PathBuf,
        secure_cookies: bool,
    ) -> Self {
        Self {
            auth: Arc::new(auth),
            access: Arc::new(access),
            sessions,
            signer,
            files_dir,
            secure_cookies,
        }
    }
}
