use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "portal-resolver")]
#[command(about = "Validate, normalize and build identity portal addresses")]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check whether an address is on the portal allow-list
    Validate { address: String },
    /// Normalize an address; prints the primary address when none is given
    Normalize { address: Option<String> },
    /// Build a portal address from a label
    Build { label: Option<String> },
    /// Print the hostname of an address
    Host { address: String },
    /// Check whether an address is exactly the designated primary portal
    Primary { address: String },
    /// Parse an address strictly and print its host kind
    Classify { address: String },
    /// Resolve a named portal, or list them all
    Named { name: Option<String> },
    /// Show portal configuration
    Info,
    /// Validate the loaded configuration
    CheckConfig,
    /// Probe the portal and print a connectivity report as JSON
    Connectivity,
}
