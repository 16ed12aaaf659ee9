use serde::Serialize;
use tally_core::entities::Audit;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct AuditResponse {
    audit: Audit,
}

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let audit = ctx.service.get_audit(id).await?;
    output(&AuditResponse { audit }, flags.format)
}
