use serde::Serialize;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct SignOutResponse {
    signed_out: bool,
}

pub async fn run(ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    ctx.service.sign_out().await?;
    output(&SignOutResponse { signed_out: true }, flags.format)
}
