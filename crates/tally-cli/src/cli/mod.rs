use clap::Parser;

pub mod global;
pub mod root_commands;
pub mod subcommands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// Top-level CLI parser for the `tly` binary.
#[derive(Debug, Parser)]
#[command(name = "tly", version, about = "Tally - retail audit data collection")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: json, table, raw
    #[arg(short, long, global = true, default_value = "json")]
    pub format: OutputFormat,

    /// Max results to return
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

impl Cli {
    /// Extract ergonomic global flags struct for command handlers.
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            format: self.format,
            limit: self.limit,
            quiet: self.quiet,
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};
    use crate::cli::subcommands::AuditCommands;

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from([
            "tly", "--format", "table", "--limit", "10", "--verbose", "status",
        ])
        .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Table);
        assert_eq!(cli.limit, Some(10));
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["tly", "status", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.format, OutputFormat::Raw);
        assert!(cli.quiet);
        assert!(matches!(cli.command, Commands::Status));
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        let parsed = Cli::try_parse_from(["tly", "--format", "xml", "status"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn output_format_accepts_all_supported_values() {
        for value in ["json", "table", "raw"] {
            let cli = Cli::try_parse_from(["tly", "--format", value, "status"])
                .expect("cli should parse");
            assert!(matches!(cli.command, Commands::Status));
        }
    }

    #[test]
    fn answer_set_pairs_accumulate() {
        let cli = Cli::try_parse_from([
            "tly", "audit", "answer", "aud-1", "--set", "q1=Yes", "--set", "q2=12",
        ])
        .expect("cli should parse");

        let Commands::Audit { action } = cli.command else {
            panic!("expected audit subcommand");
        };
        let AuditCommands::Answer { id, set } = action else {
            panic!("expected answer action");
        };
        assert_eq!(id, "aud-1");
        assert_eq!(set, vec!["q1=Yes".to_string(), "q2=12".to_string()]);
    }
}
