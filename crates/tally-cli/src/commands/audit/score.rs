use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

/// Score an audit as a dry run without changing its status.
pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let score = ctx.service.score_audit(id).await?;
    output(&score, flags.format)
}
