//! CLI command definitions and handlers
//!
//! This module organizes the CLI into logical submodules:
//! - [`commands`] - Command and subcommand enum definitions
//! - [`handlers`] - Command execution handlers

mod commands;
mod handlers;

pub use commands::*;
pub use handlers::*;

/// Write shell completions for `fleetctl` to stdout
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;

    let mut cmd = Cli::command();
    clap_complete::generate(shell, &mut cmd, "fleetctl", &mut std::io::stdout());
}
