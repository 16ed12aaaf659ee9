mod answer;
mod create;
mod get;
mod list;
mod score;
mod submit;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuditCommands;
use crate::context::AppContext;

/// Handle `tly audit`.
pub async fn handle(
    action: &AuditCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuditCommands::List {
            status,
            template,
            mine,
            limit,
        } => list::run(status.as_deref(), template.as_deref(), *mine, *limit, ctx, flags).await,
        AuditCommands::Get { id } => get::run(id, ctx, flags).await,
        AuditCommands::Create {
            template,
            store,
            address,
            lat,
            lon,
            assign,
        } => {
            create::run(
                template,
                store,
                address,
                *lat,
                *lon,
                assign.as_deref(),
                ctx,
                flags,
            )
            .await
        }
        AuditCommands::Answer { id, set } => answer::run(id, set, ctx, flags).await,
        AuditCommands::Submit { id } => submit::run(id, ctx, flags).await,
        AuditCommands::Score { id } => score::run(id, ctx, flags).await,
    }
}
