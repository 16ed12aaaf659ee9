//! Persistent session storage for the CLI.
//!
//! Sessions are stored as JSON ([`AuthSession`]) in the OS keychain, with a
//! plain-file fallback under `~/.tally/credentials` for headless machines.
//! `tly auth sign-in` stores, startup loads, `tly auth sign-out` deletes.

use std::fs;
use std::path::PathBuf;

use crate::auth::AuthSession;
use crate::error::BackendError;

const DEFAULT_KEYRING_SERVICE: &str = "tally-cli";
const KEYRING_USER: &str = "session";
const CREDENTIALS_FILE_NAME: &str = "credentials";
const SESSION_ENV_VAR: &str = "TALLY_AUTH__SESSION";

/// Returns the keyring service name.
///
/// Defaults to `"tally-cli"`. Override via `TALLY_KEYRING_SERVICE` env var
/// for testing (e.g., `"tally-cli-test"`) to avoid touching production
/// credentials.
fn keyring_service() -> String {
    std::env::var("TALLY_KEYRING_SERVICE").unwrap_or_else(|_| DEFAULT_KEYRING_SERVICE.to_string())
}

/// Store a session in the OS keychain. Falls back to file if keyring
/// unavailable.
///
/// # Errors
///
/// Returns `BackendError` if both keyring and file storage fail.
pub fn store(session: &AuthSession) -> Result<(), BackendError> {
    let json = serde_json::to_string(session)
        .map_err(|e| anyhow::anyhow!("serialize session: {e}"))?;
    match keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        Ok(entry) => match entry.set_password(&json) {
            Ok(()) => Ok(()),
            Err(error) => {
                tracing::warn!(%error, "keyring store failed; falling back to file");
                store_file(&json)
            }
        },
        Err(error) => {
            tracing::warn!(%error, "keyring unavailable; falling back to file");
            store_file(&json)
        }
    }
}

/// Load a session. Priority: keyring → `TALLY_AUTH__SESSION` env →
/// file (`~/.tally/credentials`).
///
/// A tier that holds unparseable JSON is skipped, not fatal.
#[must_use]
pub fn load() -> Option<AuthSession> {
    // 1. Keyring
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
        && let Ok(json) = entry.get_password()
        && let Some(session) = parse(&json)
    {
        return Some(session);
    }

    // 2. Environment variable
    if let Ok(json) = std::env::var(SESSION_ENV_VAR)
        && let Some(session) = parse(&json)
    {
        return Some(session);
    }

    // 3. File fallback
    load_file()
}

/// Delete the stored session from keyring and file.
///
/// # Errors
///
/// Returns `BackendError` if the credentials file cannot be removed.
pub fn delete() -> Result<(), BackendError> {
    // keyring entry may not exist; that is fine
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER) {
        let _ = entry.delete_credential();
    }

    let path = credentials_path()?;
    if path.exists() {
        fs::remove_file(&path)
            .map_err(|e| anyhow::anyhow!("failed to delete {}: {e}", path.display()))?;
    }

    Ok(())
}

/// Detect which tier the current session came from (for status display).
#[must_use]
pub fn detect_source() -> Option<String> {
    if let Ok(entry) = keyring::Entry::new(&keyring_service(), KEYRING_USER)
        && entry.get_password().is_ok_and(|json| parse(&json).is_some())
    {
        return Some("keyring".into());
    }
    if std::env::var(SESSION_ENV_VAR).is_ok_and(|json| parse(&json).is_some()) {
        return Some("env".into());
    }
    if load_file().is_some() {
        return Some("file".into());
    }
    None
}

// --- Private helpers ---

fn parse(json: &str) -> Option<AuthSession> {
    let trimmed = json.trim();
    if trimmed.is_empty() {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

fn credentials_path() -> Result<PathBuf, BackendError> {
    dirs::home_dir()
        .map(|h| h.join(".tally").join(CREDENTIALS_FILE_NAME))
        .ok_or_else(|| {
            anyhow::anyhow!("home directory not found; cannot store credentials").into()
        })
}

fn store_file(json: &str) -> Result<(), BackendError> {
    let path = credentials_path()?;
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| anyhow::anyhow!("mkdir {}: {e}", parent.display()))?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if let Err(e) = fs::set_permissions(parent, fs::Permissions::from_mode(0o700)) {
                tracing::warn!("failed to chmod 0700 {}: {e}", parent.display());
            }
        }
    }
    fs::write(&path, json).map_err(|e| anyhow::anyhow!("write {}: {e}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(0o600))
            .map_err(|e| anyhow::anyhow!("chmod {}: {e}", path.display()))?;
    }

    Ok(())
}

fn load_file() -> Option<AuthSession> {
    let path = credentials_path().ok()?;
    fs::read_to_string(&path).ok().and_then(|s| parse(&s))
}
