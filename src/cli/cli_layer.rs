// CLI layer - argument parsing and output for the Drive integration commands.

use clap::{Parser, Subcommand};

#[path = "commands/drive_commands.rs"]
pub mod commands;

#[derive(Parser, Debug)]
#[command(
    name = "drive_link",
    version,
    about = "Manage the Google Drive integration on the backend"
)]
pub struct Cli {
    /// Backend URL to use instead of the VITE_* environment variables
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Show whether a Google Drive account is linked
    Status {
        /// Print the raw status record as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the Google OAuth consent URL for linking an account
    AuthUrl {
        /// Also open the URL in the system browser
        #[arg(long)]
        open: bool,
    },
    /// Unlink the Google Drive account
    Disconnect,
    /// Print the resolved backend URL without calling it
    Config,
}
