use std::path::Path;

use anyhow::Context;
use serde::Serialize;
use tally_core::entities::{Template, TemplateDraft};

use crate::cli::GlobalFlags;
use crate::context::AppContext;
use crate::output::output;

#[derive(Serialize)]
struct TemplateResponse {
    template: Template,
}

pub async fn run(file: &str, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let draft = read_draft(file)?;
    let template = ctx.service.create_template(draft).await?;
    output(&TemplateResponse { template }, flags.format)
}

/// Load a template draft from a `.toml` or `.json` file.
fn read_draft(path: &str) -> anyhow::Result<TemplateDraft> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read template file '{path}'"))?;
    let extension = Path::new(path)
        .extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or_default();

    match extension {
        "toml" => toml::from_str(&raw)
            .with_context(|| format!("failed to parse '{path}' as a TOML template draft")),
        "json" => serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse '{path}' as a JSON template draft")),
        other => anyhow::bail!("unsupported template file type '{other}' (expected .toml or .json)"),
    }
}
