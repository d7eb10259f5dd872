use std::sync::Arc;

use crate::auth::session_cookie::SessionCookies;
use crate::auth::token::TokenService;
use crate::config::session::SessionConfig;
use crate::services::principals::{InMemoryPrincipals, PrincipalStore};

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Issues and verifies session credentials
    pub tokens: TokenService,
    /// Builds the cookies carrying those credentials
    pub cookies: SessionCookies,
    /// User storage boundary
    pub principals: Arc<dyn PrincipalStore>,
}

impl AppState {
    pub fn new(session: &SessionConfig, principals: Arc<dyn PrincipalStore>) -> Self {
        Self {
            tokens: TokenService::new(session),
            cookies: SessionCookies::new(session),
            principals,
        }
    }

    /// State backed by an empty in-memory principal store.
    pub fn in_memory(session: &SessionConfig) -> Self {
        Self::new(session, Arc::new(InMemoryPrincipals::new()))
    }

    /// Name of the cookie the `CookieAuth` middleware must read.
    pub fn cookie_name(&self) -> &str {
        self.cookies.name()
    }
}
