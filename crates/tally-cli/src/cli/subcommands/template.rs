use clap::Subcommand;

/// Template authoring commands.
#[derive(Clone, Debug, Subcommand)]
pub enum TemplateCommands {
    /// List templates.
    List {
        #[arg(long)]
        category: Option<String>,
        /// Filter on publish state (--published true / --published false).
        #[arg(long)]
        published: Option<bool>,
        /// Only templates created by the signed-in user.
        #[arg(long)]
        mine: bool,
        /// Include deactivated templates.
        #[arg(long)]
        include_inactive: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get a template by id.
    Get { id: String },
    /// Create a draft template from a TOML or JSON file.
    Create {
        /// Path to the draft (.toml or .json).
        #[arg(long)]
        file: String,
    },
    /// Run logic checks without publishing.
    Check { id: String },
    /// Publish a template (fails on blocking logic issues).
    Publish { id: String },
    /// Copy a template into a new editable version.
    #[command(name = "new-version")]
    NewVersion { id: String },
    /// Soft-delete a template.
    Deactivate { id: String },
    /// Dry-run answers against a template to see question visibility.
    Preview {
        id: String,
        /// Answer in question=value form; repeatable.
        #[arg(long = "set", value_name = "QUESTION=VALUE")]
        set: Vec<String>,
    },
}
