use serde::Serialize;
use tally_core::entities::Template;

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;
use crate::progress::Progress;

#[derive(Serialize)]
struct TemplateResponse {
    template: Template,
}

pub async fn run(id: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let progress = Progress::spinner("publishing template");
    let template = match ctx.service.publish_template(id).await {
        Ok(template) => {
            progress.finish_clear();
            template
        }
        Err(error) => {
            progress.finish_err("publish failed");
            return Err(error.into());
        }
    };

    output(&TemplateResponse { template }, flags.format)
}
