//! General application configuration.

use serde::{Deserialize, Serialize};

/// Default result limit.
const fn default_limit() -> u32 {
    20
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Force the in-memory demo backend even when remote credentials are
    /// configured.
    #[serde(default)]
    pub demo: bool,

    /// Default result limit for list commands.
    #[serde(default = "default_limit")]
    pub default_limit: u32,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            demo: false,
            default_limit: default_limit(),
        }
    }
}
