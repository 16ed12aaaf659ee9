use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Report backend mode, health, and session state.
pub async fn handle(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let progress = Progress::spinner("checking backend");
    let status = ctx.service.status().await;
    progress.finish_clear();

    output(&status, flags.format)
}
