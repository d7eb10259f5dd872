use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{1,}\b").unwrap()
});

// Compact credentials are three base64url runs joined by dots.
static CREDENTIAL: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::unwrap_used)]
    Regex::new(r"\b[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]{8,}\.[A-Za-z0-9_-]*").unwrap()
});

/// Mask emails (keep first character of the local part and the domain) and
/// session credentials before a value reaches the logs.
pub fn redact(input: &str) -> String {
    let masked = EMAIL.replace_all(input, |caps: &regex::Captures| {
        let found = &caps[0];
        match found.split_once('@') {
            Some((local, domain)) if !local.is_empty() => {
                format!("{}***@{domain}", &local[..1])
            }
            _ => found.to_string(),
        }
    });

    CREDENTIAL
        .replace_all(&masked, "[REDACTED_CREDENTIAL]")
        .into_owned()
}

/// Redacts its contents when formatted with `Display` or `Debug`.
pub struct Redacted<'a>(pub &'a str);

impl fmt::Display for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}

impl fmt::Debug for Redacted<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&redact(self.0))
    }
}
