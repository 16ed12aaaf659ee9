use crate::cli::GlobalFlags;
use crate::commands::shared::answers::parse_set_entries;
use crate::context::AppContext;
use crate::output::output;

/// Save one or more `--set question=value` answers against an audit.
pub async fn run(
    id: &str,
    set: &[String],
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    if set.is_empty() {
        anyhow::bail!("no answers given; pass at least one --set question=value");
    }

    let audit = ctx.service.get_audit(id).await?;
    let template = ctx.service.get_template(&audit.template_id).await?;
    let entries = parse_set_entries(&template, set)?;

    let saved = ctx.service.save_responses(id, &entries).await?;
    output(&saved, flags.format)
}
