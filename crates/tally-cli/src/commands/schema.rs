use schemars::schema_for;
use tally_core::entities::{Audit, Category, Question, Template, UserProfile};
use tally_core::value::AnswerValue;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SchemaArgs;
use crate::output::output;

/// Print the JSON Schema for one of the core entities.
///
/// Runs before any backend is constructed, so it works offline and
/// without configuration.
pub fn handle(args: &SchemaArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let schema = schema_for_entity(&args.entity)?;
    output(&schema, flags.format)
}

fn schema_for_entity(name: &str) -> anyhow::Result<schemars::Schema> {
    let schema = match name {
        "template" => schema_for!(Template),
        "audit" => schema_for!(Audit),
        "category" => schema_for!(Category),
        "profile" => schema_for!(UserProfile),
        "question" => schema_for!(Question),
        "answer" => schema_for!(AnswerValue),
        other => anyhow::bail!(
            "unknown entity '{other}' (expected template, audit, category, profile, question, answer)"
        ),
    };
    Ok(schema)
}
