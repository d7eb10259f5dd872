//! Identity claims carried inside session credentials.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Access level carried in the credential. No permission engine sits behind
/// it; handlers compare it directly.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// The stored principal a credential is issued for.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Principal {
    pub subject_id: String,
    pub email: String,
    pub profile_image_ref: String,
    pub role: Role,
}

/// Claims signed into the session credential.
///
/// Field names on the wire match credentials already in circulation
/// (`_id`, `profileImageURL`).
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    #[serde(rename = "_id")]
    pub subject_id: String,
    pub email: String,
    #[serde(rename = "profileImageURL")]
    pub profile_image_ref: String,
    pub role: Role,
    /// Issued-at (seconds since epoch)
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expiry (seconds since epoch)
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl Claims {
    pub(crate) fn for_principal(principal: &Principal, issued_at: i64, expires_at: i64) -> Self {
        Self {
            subject_id: principal.subject_id.clone(),
            email: principal.email.clone(),
            profile_image_ref: principal.profile_image_ref.clone(),
            role: principal.role,
            issued_at,
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: OffsetDateTime) -> bool {
        now.unix_timestamp() >= self.expires_at
    }
}
