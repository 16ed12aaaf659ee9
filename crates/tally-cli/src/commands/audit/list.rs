use serde::Serialize;
use tally_backend::filters::AuditFilter;
use tally_core::entities::Audit;
use tally_core::enums::AuditStatus;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::parse::parse_enum;
use crate::commands::shared::session::require_user_id;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuditListResponse {
    audits: Vec<Audit>,
}

pub async fn run(
    status: Option<&str>,
    template: Option<&str>,
    mine: bool,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let status = status
        .map(|raw| parse_enum::<AuditStatus>(raw, "status"))
        .transpose()?;
    let assigned_to = if mine {
        Some(require_user_id(ctx).await?)
    } else {
        None
    };

    let filter = AuditFilter {
        status,
        template_id: template.map(str::to_string),
        assigned_to,
        limit: Some(effective_limit(
            limit,
            flags.limit,
            ctx.config.general.default_limit,
        )),
    };

    let audits = ctx.service.list_audits(&filter).await?;
    output(&AuditListResponse { audits }, flags.format)
}
