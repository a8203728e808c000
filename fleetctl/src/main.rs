//! Fleet CLI
//!
//! Command-line interface for retrieving resources from a Fleet server.

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use fleetctl::cli::{generate_completion, handle_get, Cli, Commands};
use fleetctl::client::FleetClient;
use fleetctl::config::ConfigBuilder;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Get { command } => {
            // Environment first: later sources only fill what is still unset
            let context = ConfigBuilder::new()
                .with_env_overrides()
                .with_config_file(cli.config.as_deref(), &cli.context)?
                .build()?;

            tracing::debug!(
                context = %cli.context,
                address = %context.address,
                "resolved connection context"
            );

            let client = FleetClient::from_context(&context)?;
            let mut out = std::io::stdout();
            handle_get(&client, command, &mut out).await
        }
        Commands::Completion { shell } => {
            generate_completion(shell);
            Ok(())
        }
    }
}

/// Initialize tracing subscriber for logging
///
/// Logs go to stderr so document output on stdout stays clean.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
