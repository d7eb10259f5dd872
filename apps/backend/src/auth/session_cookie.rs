use actix_web::cookie::{Cookie, SameSite};
use time::Duration;

use crate::config::session::SessionConfig;

/// Builds the `Set-Cookie` values that carry a session credential.
#[derive(Debug, Clone)]
pub struct SessionCookies {
    name: String,
    secure: bool,
    max_age: Duration,
}

impl SessionCookies {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            name: config.cookie_name.clone(),
            secure: config.secure_cookie,
            max_age: config.ttl,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Cookie carrying `credential`, living as long as the credential does.
    pub fn issue(&self, credential: String) -> Cookie<'static> {
        Cookie::build(self.name.clone(), credential)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .max_age(self.max_age)
            .finish()
    }

    /// Cookie instructing the browser to drop the session.
    pub fn removal(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(self.name.clone(), "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .finish();
        cookie.make_removal();
        cookie
    }
}
