use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "gh-issue-assistant",
    about = "Summarize and triage GitHub issues with an LLM",
    version,
    author
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, env = "GH_ISSUE_ASSISTANT_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP analysis API
    Serve {
        /// Address to listen on, overrides `server.bind`
        #[arg(long)]
        bind: Option<String>,
    },

    /// Open the terminal front end
    Ui {
        /// Base URL of a running analysis API, overrides `ui.backend_url`
        #[arg(long)]
        backend_url: Option<String>,
    },

    /// Analyze one issue and print the result as JSON
    Analyze {
        /// Repository URL or "owner/repo"
        repo_url: String,

        /// Issue number
        issue_number: u64,
    },
}
