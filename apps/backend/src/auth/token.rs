use std::fmt;

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;
use time::{Duration, OffsetDateTime};

use crate::auth::claims::{Claims, Principal};
use crate::config::session::SessionConfig;
use crate::error::AppError;

/// Why a credential was rejected. Both kinds mean "no valid identity".
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed structure, wrong algorithm, undecodable claims or a
    /// signature that does not match.
    #[error("credential signature invalid")]
    SignatureInvalid,
    #[error("credential expired")]
    Expired,
}

/// Issues and verifies HS256 session credentials.
///
/// Holds only keys derived from the process secret and the TTL, so clones are
/// safe to share across workers without synchronisation.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenService {
    pub fn new(config: &SessionConfig) -> Self {
        let algorithm = Algorithm::HS256;

        // Expiry is checked against the caller-supplied clock in `verify_at`,
        // with no leeway, so the library's wall-clock check is disabled.
        let mut validation = Validation::new(algorithm);
        validation.validate_exp = false;
        // `iat` is not a spec claim jsonwebtoken checks; `Claims` makes it
        // mandatory on deserialization.
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding: EncodingKey::from_secret(&config.secret),
            decoding: DecodingKey::from_secret(&config.secret),
            validation,
            ttl: config.ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a credential for `principal`, valid from now for the configured TTL.
    pub fn issue(&self, principal: &Principal) -> Result<String, AppError> {
        self.issue_at(principal, OffsetDateTime::now_utc())
    }

    /// Issue a credential as if the current time were `now`.
    pub fn issue_at(&self, principal: &Principal, now: OffsetDateTime) -> Result<String, AppError> {
        let iat = now.unix_timestamp();
        let exp = iat
            .checked_add(self.ttl.whole_seconds())
            .ok_or_else(|| AppError::internal("credential expiry overflows"))?;
        let claims = Claims::for_principal(principal, iat, exp);

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AppError::internal(format!("failed to encode credential: {e}")))
    }

    /// Verify a credential against the current time.
    pub fn verify(&self, credential: &str) -> Result<Claims, TokenError> {
        self.verify_at(credential, OffsetDateTime::now_utc())
    }

    /// Verify a credential as if the current time were `now`.
    ///
    /// The signature is checked first; an expired credential with a bad
    /// signature reports `SignatureInvalid`. HMAC comparison is constant time.
    pub fn verify_at(&self, credential: &str, now: OffsetDateTime) -> Result<Claims, TokenError> {
        let claims = decode::<Claims>(credential, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| TokenError::SignatureInvalid)?;

        if claims.is_expired_at(now) {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("algorithm", &Algorithm::HS256)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}
