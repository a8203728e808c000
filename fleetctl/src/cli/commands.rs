//! CLI command and subcommand definitions

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config::DEFAULT_CONTEXT;

/// Fleet command-line client
#[derive(Parser, Debug)]
#[command(name = "fleetctl")]
#[command(version, about = "CLI for managing Fleet osquery servers", long_about = None)]
pub struct Cli {
    /// Path to the fleetctl config file (default: ~/.config/fleet/config.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Name of the config context to use
    #[arg(long, global = true, default_value = DEFAULT_CONTEXT)]
    pub context: String,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Get/list resources
    Get {
        #[command(subcommand)]
        command: GetCommands,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completion for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum GetCommands {
    /// List information about one or more queries
    #[command(visible_aliases = ["query", "q"])]
    Queries {
        /// Query name (lists all queries when omitted)
        name: Option<String>,

        /// Output queries in yaml format
        #[arg(long)]
        yaml: bool,
    },

    /// List information about one or more packs
    #[command(visible_aliases = ["pack", "p"])]
    Packs {
        /// Pack name (lists all packs when omitted)
        name: Option<String>,

        /// Output packs in yaml format
        #[arg(long)]
        yaml: bool,

        /// Output queries included in pack(s) too
        #[arg(long)]
        with_queries: bool,
    },

    /// List information about one or more labels
    #[command(visible_aliases = ["label", "l"])]
    Labels {
        /// Label name (lists all labels when omitted)
        name: Option<String>,

        /// Output labels in yaml format
        #[arg(long)]
        yaml: bool,
    },

    /// Retrieve the osquery configuration
    Options,

    /// Retrieve the osquery enroll secrets
    #[command(
        name = "enroll_secret",
        aliases = ["enroll_secrets", "enroll-secret", "enroll-secrets"]
    )]
    EnrollSecret,

    /// Retrieve the Fleet configuration
    Config,

    /// List information about one or more hosts
    #[command(visible_aliases = ["host", "h"])]
    Hosts,
}
