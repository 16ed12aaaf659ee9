mod check;
mod create;
mod deactivate;
mod get;
mod list;
mod new_version;
mod preview;
mod publish;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::TemplateCommands;
use crate::context::AppContext;

/// Handle `tly template`.
pub async fn handle(
    action: &TemplateCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        TemplateCommands::List {
            category,
            published,
            mine,
            include_inactive,
            limit,
        } => {
            list::run(
                category.as_deref(),
                *published,
                *mine,
                *include_inactive,
                *limit,
                ctx,
                flags,
            )
            .await
        }
        TemplateCommands::Get { id } => get::run(id, ctx, flags).await,
        TemplateCommands::Create { file } => create::run(file, ctx, flags).await,
        TemplateCommands::Check { id } => check::run(id, ctx, flags).await,
        TemplateCommands::Publish { id } => publish::run(id, ctx, flags).await,
        TemplateCommands::NewVersion { id } => new_version::run(id, ctx, flags).await,
        TemplateCommands::Deactivate { id } => deactivate::run(id, ctx, flags).await,
        TemplateCommands::Preview { id, set } => preview::run(id, set, ctx, flags).await,
    }
}
