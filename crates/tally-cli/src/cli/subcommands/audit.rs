use clap::Subcommand;

/// Audit execution commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuditCommands {
    /// List audits.
    List {
        /// Filter by status: pending, in_progress, completed.
        #[arg(long)]
        status: Option<String>,
        /// Filter by template id.
        #[arg(long)]
        template: Option<String>,
        /// Only audits assigned to the signed-in user.
        #[arg(long)]
        mine: bool,
        #[arg(long)]
        limit: Option<u32>,
    },
    /// Get an audit by id.
    Get { id: String },
    /// Start a new audit at a store location.
    Create {
        /// Template id to run.
        #[arg(long)]
        template: String,
        /// Store name.
        #[arg(long)]
        store: String,
        /// Street address.
        #[arg(long)]
        address: String,
        #[arg(long, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, requires = "lat")]
        lon: Option<f64>,
        /// Assign to a user id (defaults to the signed-in user).
        #[arg(long)]
        assign: Option<String>,
    },
    /// Record answers; saves progress without validating.
    Answer {
        id: String,
        /// Answer in question=value form; repeatable.
        #[arg(long = "set", value_name = "QUESTION=VALUE")]
        set: Vec<String>,
    },
    /// Validate, score, and complete an audit.
    Submit { id: String },
    /// Score an audit without completing it.
    Score { id: String },
}
