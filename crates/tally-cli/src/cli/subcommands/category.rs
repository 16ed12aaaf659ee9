use clap::Subcommand;

/// Template category commands.
#[derive(Clone, Debug, Subcommand)]
pub enum CategoryCommands {
    /// List active categories in display order.
    List,
}
