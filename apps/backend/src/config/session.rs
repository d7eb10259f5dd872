//! Session cookie and signing configuration, loaded from the process
//! environment once at startup.

use std::fmt;

use time::Duration;

use crate::error::AppError;

pub const DEFAULT_COOKIE_NAME: &str = "token";
pub const DEFAULT_TTL_SECS: i64 = 2 * 60 * 60;
/// Upper bound for `SESSION_TTL_SECS` (one year).
pub const MAX_TTL_SECS: i64 = 365 * 24 * 60 * 60;

/// Configuration for the session credential and the cookie carrying it.
#[derive(Clone)]
pub struct SessionConfig {
    /// Name of the cookie carrying the credential
    pub cookie_name: String,
    /// HMAC secret used to sign and verify credentials
    pub secret: Vec<u8>,
    /// Lifetime of an issued credential
    pub ttl: Duration,
    /// Whether the cookie gets the `Secure` attribute
    pub secure_cookie: bool,
}

impl SessionConfig {
    /// Create a config with the given secret and default cookie name and TTL.
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            cookie_name: DEFAULT_COOKIE_NAME.to_string(),
            secret: secret.into(),
            ttl: Duration::seconds(DEFAULT_TTL_SECS),
            secure_cookie: false,
        }
    }

    pub fn with_cookie_name(mut self, name: impl Into<String>) -> Self {
        self.cookie_name = name.into();
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_secure_cookie(mut self, secure: bool) -> Self {
        self.secure_cookie = secure;
        self
    }

    /// Load from `SESSION_SECRET` (required), `SESSION_COOKIE_NAME`,
    /// `SESSION_TTL_SECS` and `SESSION_COOKIE_SECURE`.
    pub fn from_env() -> Result<Self, AppError> {
        let secret = std::env::var("SESSION_SECRET")
            .map_err(|_| AppError::config("SESSION_SECRET must be set"))?;
        if secret.is_empty() {
            return Err(AppError::config("SESSION_SECRET must not be empty"));
        }

        let cookie_name = match std::env::var("SESSION_COOKIE_NAME") {
            Ok(name) if !name.trim().is_empty() => name.trim().to_string(),
            Ok(_) => {
                return Err(AppError::config("SESSION_COOKIE_NAME must not be empty"));
            }
            Err(_) => DEFAULT_COOKIE_NAME.to_string(),
        };

        let ttl_secs = match std::env::var("SESSION_TTL_SECS") {
            Ok(raw) => match raw.trim().parse::<i64>() {
                Ok(secs) if secs > 0 && secs <= MAX_TTL_SECS => secs,
                _ => {
                    return Err(AppError::config(format!(
                        "SESSION_TTL_SECS must be between 1 and {MAX_TTL_SECS}, got '{raw}'"
                    )));
                }
            },
            Err(_) => DEFAULT_TTL_SECS,
        };

        let secure_cookie = match std::env::var("SESSION_COOKIE_SECURE") {
            Ok(raw) => raw.trim().parse::<bool>().map_err(|_| {
                AppError::config(format!(
                    "SESSION_COOKIE_SECURE must be 'true' or 'false', got '{raw}'"
                ))
            })?,
            Err(_) => false,
        };

        Ok(Self {
            cookie_name,
            secret: secret.into_bytes(),
            ttl: Duration::seconds(ttl_secs),
            secure_cookie,
        })
    }
}

impl fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionConfig")
            .field("cookie_name", &self.cookie_name)
            .field("secret", &"[REDACTED]")
            .field("ttl", &self.ttl)
            .field("secure_cookie", &self.secure_cookie)
            .finish()
    }
}
