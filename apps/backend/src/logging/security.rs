use tracing::{debug, warn};

use crate::logging::pii::Redacted;

/// Log a failed sign-in attempt.
pub fn login_failed(reason: &str, email: &str) {
    warn!(
        event = "SECURITY_LOGIN_FAILED",
        email = %Redacted(email),
        reason,
        "Authentication failure"
    );
}

/// Log a session cookie that failed verification. The request continues
/// anonymously, so this stays at debug level.
pub fn session_rejected(reason: &str) {
    debug!(
        event = "SESSION_CREDENTIAL_REJECTED",
        reason,
        "Session cookie ignored"
    );
}
