use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

/// Submit an in-progress audit. Validation failures surface as errors
/// listing every violation; saved answers are kept either way.
pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let progress = Progress::spinner("submitting audit");
    let submitted = match ctx.service.submit_audit(id).await {
        Ok(submitted) => {
            progress.finish_clear();
            submitted
        }
        Err(error) => {
            progress.finish_err("submit failed");
            return Err(error.into());
        }
    };

    output(&submitted, flags.format)
}
