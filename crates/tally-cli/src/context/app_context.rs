use anyhow::Context;
use tally_backend::AuditService;
use tally_config::TallyConfig;

/// Shared application resources initialized once at startup.
///
/// Backend selection happens inside [`AuditService::connect`]: remote when
/// credentials are configured, the seeded in-memory fake otherwise.
pub struct AppContext {
    pub service: AuditService,
    pub config: TallyConfig,
}

impl AppContext {
    pub async fn init(config: TallyConfig) -> anyhow::Result<Self> {
        let service = AuditService::connect(&config)
            .await
            .context("failed to initialize the audit service")?;
        Ok(Self { service, config })
    }
}
