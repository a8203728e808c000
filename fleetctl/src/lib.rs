//! Fleet CLI Library
//!
//! Read-only retrieval of Fleet resources, printed as tables or as versioned
//! YAML spec documents.
//!
//! # Public API
//!
//! The primary public API is the [`client::FleetApi`] trait and its HTTP
//! implementation [`client::FleetClient`]. Connection contexts are resolved
//! with [`config::ConfigBuilder`].
//!
//! ```no_run
//! use fleetctl::client::{FleetApi, FleetClient};
//! use fleetctl::config::ConfigBuilder;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let context = ConfigBuilder::new()
//!     .with_env_overrides()
//!     .with_config_file(None, "default")?
//!     .build()?;
//! let client = FleetClient::from_context(&context)?;
//!
//! let queries = client.get_queries().await?;
//! println!("{} queries", queries.len());
//! # Ok(())
//! # }
//! ```

// Internal CLI implementation - not part of public API
#[doc(hidden)]
pub mod cli;

/// HTTP client for communicating with the Fleet server.
pub mod client;

/// Configuration types for the CLI tool.
pub mod config;

// Internal formatting functions - not part of public API
#[doc(hidden)]
pub mod format;

#[cfg(test)]
pub mod test_utils;
