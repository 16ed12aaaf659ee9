use anyhow::Context;
use tally_config::TallyConfig;

/// Load `.env` plus the layered configuration, then surface common
/// half-configured states before the backend is selected.
pub fn load_config() -> anyhow::Result<TallyConfig> {
    let config = TallyConfig::load_with_dotenv().context("failed to load tally configuration")?;
    warn_partial_credentials(&config);
    Ok(config)
}

fn warn_partial_credentials(config: &TallyConfig) {
    if config.backend.is_configured() || config.general.demo {
        return;
    }

    let url_set = !config.backend.url.is_empty();
    let key_set = !config.backend.anon_key.is_empty();
    match (url_set, key_set) {
        (true, false) => tracing::warn!(
            "TALLY_BACKEND__URL is set but TALLY_BACKEND__ANON_KEY is empty; staying on the in-memory backend"
        ),
        (false, true) => tracing::warn!(
            "TALLY_BACKEND__ANON_KEY is set but TALLY_BACKEND__URL is empty; staying on the in-memory backend"
        ),
        _ => {}
    }
}
