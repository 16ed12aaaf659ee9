//! The pluggable backend interface.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tally_core::entities::{Audit, Category, Template, UserProfile};
use tokio::sync::broadcast;

use crate::auth::AuthSession;
use crate::changes::{ChangeEvent, Table};
use crate::error::BackendError;
use crate::filters::{AuditFilter, TemplateFilter};
use crate::updates::audit::AuditUpdate;
use crate::updates::template::TemplateUpdate;

/// Which backend implementation is serving requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    Remote,
    Memory,
}

impl BackendMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Storage, auth, and change-feed capabilities every backend provides.
///
/// Two implementations exist: [`RemoteBackend`](crate::remote::RemoteBackend)
/// speaks the hosted service's REST and auth protocols, and
/// [`MemoryBackend`](crate::memory::MemoryBackend) serves seeded demo data
/// from an embedded database. The service layer holds an `Arc<dyn Backend>`
/// selected once at startup; no business rules live down here.
#[async_trait]
pub trait Backend: Send + Sync {
    fn mode(&self) -> BackendMode;

    /// Cheap connectivity round-trip.
    async fn health(&self) -> Result<(), BackendError>;

    // --- auth ---

    /// Create an account plus its `user_profiles` row (role auditor) and
    /// sign in.
    async fn sign_up(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<AuthSession, BackendError>;

    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, BackendError>;

    async fn sign_out(&self) -> Result<(), BackendError>;

    /// The current session, if signed in and not expired.
    async fn session(&self) -> Option<AuthSession>;

    /// Install a previously stored session. Rejects expired sessions.
    async fn restore_session(&self, session: AuthSession) -> Result<(), BackendError>;

    // --- rows ---

    async fn fetch_categories(&self) -> Result<Vec<Category>, BackendError>;

    async fn fetch_templates(
        &self,
        filter: &TemplateFilter,
    ) -> Result<Vec<Template>, BackendError>;

    async fn get_template(&self, id: &str) -> Result<Template, BackendError>;

    /// Insert, minting an id when `template.id` is empty. Returns the
    /// stored row.
    async fn insert_template(&self, template: &Template) -> Result<Template, BackendError>;

    async fn update_template(
        &self,
        id: &str,
        update: &TemplateUpdate,
    ) -> Result<Template, BackendError>;

    async fn fetch_audits(&self, filter: &AuditFilter) -> Result<Vec<Audit>, BackendError>;

    async fn get_audit(&self, id: &str) -> Result<Audit, BackendError>;

    async fn insert_audit(&self, audit: &Audit) -> Result<Audit, BackendError>;

    async fn update_audit(&self, id: &str, update: &AuditUpdate)
    -> Result<Audit, BackendError>;

    async fn get_profile(&self, user_id: &str) -> Result<UserProfile, BackendError>;

    async fn insert_profile(&self, profile: &UserProfile) -> Result<UserProfile, BackendError>;

    // --- change feed ---

    /// Subscribe to row changes on `table`, starting the feed if the
    /// implementation needs one running.
    async fn subscribe(&self, table: Table) -> broadcast::Receiver<ChangeEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_display_matches_wire_names() {
        assert_eq!(BackendMode::Remote.to_string(), "remote");
        assert_eq!(BackendMode::Memory.to_string(), "memory");
    }
}
