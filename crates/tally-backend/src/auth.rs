//! Session types shared by all backends.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Authenticated user identity as reported by the auth provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: String,
}

/// A signed-in session: bearer token plus its expiry and owner.
///
/// Produced by `sign_in`/`sign_up`, persisted across CLI invocations via
/// `session_store`, and re-installed with `restore_session`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
    pub user: AuthUser,
}

impl AuthSession {
    /// Check if the session is expired or expires within `buffer_secs`.
    #[must_use]
    pub fn is_near_expiry(&self, buffer_secs: i64) -> bool {
        let threshold = Utc::now() + chrono::TimeDelta::seconds(buffer_secs);
        self.expires_at <= threshold
    }

    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.is_near_expiry(0)
    }
}
