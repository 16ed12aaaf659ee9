use clap::{Args, Subcommand};

use crate::cli::subcommands::{AuditCommands, AuthCommands, CategoryCommands, TemplateCommands};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Account sign-up, sign-in, and session state.
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },
    /// Template categories.
    Category {
        #[command(subcommand)]
        action: CategoryCommands,
    },
    /// Audit templates: authoring, publishing, preview.
    Template {
        #[command(subcommand)]
        action: TemplateCommands,
    },
    /// Audits: create, answer, submit, score.
    Audit {
        #[command(subcommand)]
        action: AuditCommands,
    },
    /// Stream change events for a table until Ctrl-C.
    Watch(WatchArgs),
    /// Backend mode, health, and session at a glance.
    Status,
    /// Dump the JSON Schema for an entity type.
    Schema(SchemaArgs),
}

/// Arguments for `tly watch`.
#[derive(Clone, Debug, Args)]
pub struct WatchArgs {
    /// Table to watch: template_categories, audit_templates, audits, user_profiles.
    pub table: String,
}

/// Arguments for `tly schema`.
#[derive(Clone, Debug, Args)]
pub struct SchemaArgs {
    /// Entity name: template, audit, category, profile, question, answer.
    pub entity: String,
}
