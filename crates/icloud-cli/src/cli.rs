//! CLI argument definitions.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use icloud::Environment;

use crate::commands::config::ConfigArgs;
use crate::commands::records::RecordsCommand;

/// CloudKit Web Services CLI tool.
#[derive(Parser, Debug)]
#[command(name = "icloud")]
#[command(author, version = env!("ICLOUD_VERSION"), about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Settings shared by every command that talks to a container.
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Container identifier (e.g., iCloud.com.example.App)
    #[arg(long, env = "ICLOUD_CONTAINER", global = true)]
    pub container: Option<String>,

    /// Server-to-server key ID
    #[arg(long, env = "ICLOUD_KEY_ID", global = true)]
    pub key_id: Option<String>,

    /// PEM file holding the EC private key (ICLOUD_PRIVATE_KEY may hold the PEM text instead)
    #[arg(long, env = "ICLOUD_PRIVATE_KEY_FILE", global = true)]
    pub private_key_file: Option<PathBuf>,

    /// Container environment
    #[arg(
        long,
        env = "ICLOUD_ENVIRONMENT",
        default_value_t = Environment::Development,
        global = true
    )]
    pub environment: Environment,

    /// API origin override
    #[arg(long, env = "ICLOUD_ENDPOINT", global = true, hide = true)]
    pub endpoint: Option<String>,

    /// User agent sent with every request
    #[arg(long, global = true)]
    pub user_agent: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record operations
    Records(RecordsCommand),

    /// Show the resolved client configuration
    Config(ConfigArgs),

    /// Print version information
    Version,
}
