use serde::Serialize;
use tally_core::entities::Template;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct TemplateResponse {
    template: Template,
}

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let template = ctx.service.new_template_version(id).await?;
    output(&TemplateResponse { template }, flags.format)
}
