use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "dbpass",
    about = "Reset a managed database's password, with live strength feedback.",
    version
)]
pub struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG wins if set.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create .dbpass/config.toml in the current directory.
    Init {
        /// Base URL of the management API.
        #[arg(long)]
        api_url: String,

        /// Project to target when --project-ref is not given.
        #[arg(long)]
        project_ref: Option<String>,
    },

    /// Show the database password panel and whether a reset is available.
    Status {
        /// Project to inspect (defaults to project_ref in config.toml).
        #[arg(long)]
        project_ref: Option<String>,
    },

    /// Open the reset dialog and rotate the database password.
    Reset(ResetArgs),

    /// Print a strong random password and its strength.
    Generate {
        /// Password length.
        #[arg(long, default_value_t = 16)]
        length: usize,
    },
}

#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Project to reset (defaults to project_ref in config.toml).
    #[arg(long)]
    pub project_ref: Option<String>,

    /// Start from a generated strong password.
    #[arg(long)]
    pub generate: bool,

    /// Read the new password from the first line of stdin. Requires --yes.
    #[arg(long, conflicts_with = "generate", requires = "yes")]
    pub password_stdin: bool,

    /// Confirm without prompting. Requires --generate or --password-stdin.
    #[arg(long, short = 'y')]
    pub yes: bool,
}
