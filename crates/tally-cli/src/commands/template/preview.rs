use crate::cli::GlobalFlags;
use crate::commands::shared::answers::parse_set_entries;
use crate::context::AppContext;
use crate::output::output;

/// Replay hypothetical answers against a template and report which
/// questions would be visible, without creating an audit.
pub async fn run(
    id: &str,
    set: &[String],
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let template = ctx.service.get_template(id).await?;
    let entries = parse_set_entries(&template, set)?;
    let preview = ctx.service.preview(id, &entries).await?;
    output(&preview, flags.format)
}
