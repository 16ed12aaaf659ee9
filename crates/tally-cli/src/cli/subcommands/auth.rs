use clap::Subcommand;

/// Authentication commands.
#[derive(Clone, Debug, Subcommand)]
pub enum AuthCommands {
    /// Create an account and sign in.
    #[command(name = "sign-up")]
    SignUp {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Display name for the new profile.
        #[arg(long)]
        name: String,
    },
    /// Sign in with email and password.
    #[command(name = "sign-in")]
    SignIn {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and clear the stored session.
    #[command(name = "sign-out")]
    SignOut,
    /// Show the current session.
    Status,
}
