mod sign_in;
mod sign_out;
mod sign_up;
mod status;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::AuthCommands;
use crate::context::AppContext;

/// Handle `tly auth <subcommand>`.
pub async fn handle(
    action: &AuthCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        AuthCommands::SignUp {
            email,
            password,
            name,
        } => sign_up::run(email, password, name, ctx, flags).await,
        AuthCommands::SignIn { email, password } => sign_in::run(email, password, ctx, flags).await,
        AuthCommands::SignOut => sign_out::run(ctx, flags).await,
        AuthCommands::Status => status::run(ctx, flags).await,
    }
}
