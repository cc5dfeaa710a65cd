use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Access flow - drive the access-group step flow against an InLong manager
#[derive(Parser, Debug, Clone)]
#[command(name = "access-flow", version, about, long_about = None)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, env = "ACCESS_FLOW_CONFIG", default_value = "access-flow.toml")]
    pub config: PathBuf,

    /// Base URL of the manager API
    #[arg(long, env = "ACCESS_FLOW_MANAGER_URL")]
    pub manager_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "ACCESS_FLOW_TIMEOUT")]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print the visible steps for a flow
    Steps {
        /// Creation wizard instead of the detail view
        #[arg(long)]
        create: bool,
        /// The group is in a readonly status
        #[arg(long)]
        readonly: bool,
    },
    /// Fetch a group and print its resource context and steps
    Inspect {
        group_id: String,
    },
    /// Submit a group from the last wizard step
    Submit {
        group_id: String,
    },
}
