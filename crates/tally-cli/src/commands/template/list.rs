use serde::Serialize;
use tally_backend::filters::TemplateFilter;
use tally_core::entities::Template;

use crate::cli::GlobalFlags;
use crate::commands::shared::limit::effective_limit;
use crate::commands::shared::session::require_user_id;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct TemplateListResponse {
    templates: Vec<Template>,
}

pub async fn run(
    category: Option<&str>,
    published: Option<bool>,
    mine: bool,
    include_inactive: bool,
    limit: Option<u32>,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let created_by = if mine {
        Some(require_user_id(ctx).await?)
    } else {
        None
    };

    let filter = TemplateFilter {
        category: category.map(str::to_string),
        is_published: published,
        created_by,
        include_inactive,
        limit: Some(effective_limit(
            limit,
            flags.limit,
            ctx.config.general.default_limit,
        )),
    };

    let templates = ctx.service.list_templates(&filter).await?;
    output(&TemplateListResponse { templates }, flags.format)
}
