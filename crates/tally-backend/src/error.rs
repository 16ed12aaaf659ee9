//! Backend error types for tally-backend.

use tally_core::errors::CoreError;
use tally_core::validate::Violation;
use thiserror::Error;

/// Errors from backend operations: storage, auth, and the wire.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Entity lookup failed.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// Email or password rejected by the auth provider.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Operation requires a signed-in session.
    #[error("not authenticated: run `tly auth sign-in`")]
    NotAuthenticated,

    /// Audit status transition rejected by the state machine.
    #[error("cannot transition audit {id} from {from} to {to}")]
    InvalidTransition {
        id: String,
        from: tally_core::enums::AuditStatus,
        to: tally_core::enums::AuditStatus,
    },

    /// Published templates cannot be edited.
    #[error("template {id} is published and immutable: create a new version instead")]
    PublishedImmutable { id: String },

    /// Publish blocked by template logic checks.
    #[error("template cannot be published: {0}")]
    Unpublishable(String),

    /// Submit blocked by answer validation.
    #[error("validation failed: {}", .0.iter().map(std::string::ToString::to_string).collect::<Vec<_>>().join("; "))]
    Validation(Vec<Violation>),

    /// The remote service returned a non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A SQL query failed.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Underlying HTTP error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Error bubbled up from the core domain layer.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
