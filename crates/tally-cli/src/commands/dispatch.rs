use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;
use crate::context::AppContext;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Auth { action } => commands::auth::handle(&action, ctx, flags).await,
        Commands::Category { action } => commands::category::handle(&action, ctx, flags).await,
        Commands::Template { action } => commands::template::handle(&action, ctx, flags).await,
        Commands::Audit { action } => commands::audit::handle(&action, ctx, flags).await,
        Commands::Watch(args) => commands::watch::handle(&args, ctx, flags).await,
        Commands::Status => commands::status::handle(ctx, flags).await,
        Commands::Schema(_) => unreachable!("schema is pre-dispatched in main"),
    }
}
