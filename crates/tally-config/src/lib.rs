//! # tally-config
//!
//! Layered configuration loading for Tally using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`TALLY_*` prefix, `__` as separator)
//! 2. Project-level `tally.toml`
//! 3. User-level `~/.config/tally/config.toml`
//! 4. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `TALLY_BACKEND__URL` -> `backend.url`,
//! `TALLY_GENERAL__DEMO` -> `general.demo`, etc. The `__` (double underscore)
//! separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use tally_config::TallyConfig;
//!
//! // Load from all sources (dotenvy + TOML + env):
//! let config = TallyConfig::load_with_dotenv().expect("config");
//!
//! // Or without dotenvy (env vars must already be set):
//! let config = TallyConfig::load().expect("config");
//!
//! if config.backend.is_configured() {
//!     println!("Backend URL: {}", config.backend.url);
//! }
//! ```

mod backend;
mod error;
mod general;

pub use backend::BackendConfig;
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TallyConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl TallyConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy` -- use [`Self::load_with_dotenv`] if you need
    /// `.env` file loading.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`TALLY_*` prefix)
    /// 2. `tally.toml` (project-local)
    /// 3. `~/.config/tally/config.toml` (user-global)
    /// 4. Default values
    pub fn load() -> Result<Self, ConfigError> {
        let config: Self = Self::figment().extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load the `.env` file from the workspace root before
    /// building the figment. This is the typical entry point for the CLI.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    #[must_use]
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from("tally.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Environment variables (highest priority)
        figment = figment.merge(Env::prefixed("TALLY_").split("__"));

        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("tally").join("config.toml"))
    }

    /// Reject values figment accepts but the application cannot run with.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.backend.sync_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "backend.sync_interval_secs".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        Ok(())
    }

    /// Load `.env` from the workspace root.
    ///
    /// Walks up from `CARGO_MANIFEST_DIR` (if available) or current dir
    /// looking for a `.env` file. Silently does nothing if no `.env` is found.
    fn load_dotenv_from_workspace() {
        // In tests/build: CARGO_MANIFEST_DIR points to the crate dir.
        // Walk up to find the workspace root's .env.
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // Walk up at most 3 levels (crate -> crates/ -> tally/)
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        // Fallback: try current directory
        let _ = dotenvy::dotenv();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_loads() {
        let config = TallyConfig::default();
        assert!(!config.backend.is_configured());
        assert!(!config.general.demo);
        assert_eq!(config.general.default_limit, 20);
    }

    #[test]
    fn figment_builds_without_files() {
        let figment = TallyConfig::figment();
        let config: TallyConfig = figment.extract().expect("should extract defaults");
        assert!(!config.backend.is_configured());
        assert_eq!(config.backend.sync_interval_secs, 60);
    }

    #[test]
    fn zero_sync_interval_is_rejected() {
        let config = TallyConfig {
            backend: BackendConfig {
                sync_interval_secs: 0,
                ..Default::default()
            },
            general: GeneralConfig::default(),
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
