use serde::Serialize;
use tally_core::entities::Category;

use crate::cli::GlobalFlags;
use crate::cli::subcommands::CategoryCommands;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct CategoryListResponse {
    categories: Vec<Category>,
}

/// Handle `tly category`.
pub async fn handle(
    action: &CategoryCommands,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match action {
        CategoryCommands::List => list(ctx, flags).await,
    }
}

async fn list(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let categories = ctx.service.list_categories().await?;
    output(&CategoryListResponse { categories }, flags.format)
}
