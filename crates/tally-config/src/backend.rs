//! Hosted backend configuration.

use serde::{Deserialize, Serialize};

/// Default poll interval for the change feed, in seconds.
const fn default_sync_interval_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackendConfig {
    /// Base URL of the hosted service (e.g., `https://abc.example.co`).
    #[serde(default)]
    pub url: String,

    /// Public anon key sent as `apikey` on every request.
    #[serde(default)]
    pub anon_key: String,

    /// How often the change feed polls for row changes, in seconds.
    #[serde(default = "default_sync_interval_secs")]
    pub sync_interval_secs: u64,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            anon_key: String::new(),
            sync_interval_secs: default_sync_interval_secs(),
        }
    }
}

impl BackendConfig {
    /// Check if the config has the minimum required fields for remote access.
    ///
    /// Startup selects the remote backend when this is true and the in-memory
    /// demo backend otherwise.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.anon_key.is_empty()
    }
}
