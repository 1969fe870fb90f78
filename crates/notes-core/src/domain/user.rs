//! Users and auth sessions

use serde::{Deserialize, Serialize};

/// An authenticated account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl User {
    /// Uppercased first character of the email, for the header avatar.
    pub fn initial(&self) -> Option<char> {
        self.email
            .as_deref()
            .and_then(|email| email.chars().next())
            .and_then(|c| c.to_uppercase().next())
    }
}

/// Tokens for the signed-in user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    pub refresh_token: String,
    /// Absolute expiry, unix seconds
    pub expires_at: i64,
    pub user: User,
}

impl Session {
    /// Expired, or expiring within `leeway_secs` of `now`.
    pub fn is_expired(&self, now: i64, leeway_secs: i64) -> bool {
        self.expires_at - leeway_secs <= now
    }
}

/// Result of a sign-up request
#[derive(Debug, Clone, PartialEq)]
pub enum SignUpOutcome {
    /// Account created and a session issued right away
    SignedIn(User),
    /// Account created; the address must be confirmed before signing in
    ConfirmationSent(User),
}
