//! CLI configuration management
//!
//! Loads named connection contexts from the CLI config file and resolves the
//! one selected with `--context`.

use anyhow::{Context, Result};
use fleet_core::FleetError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the context used when `--context` is not given
pub const DEFAULT_CONTEXT: &str = "default";

const DEFAULT_ADDRESS: &str = "https://localhost:8080";
const DEFAULT_TIMEOUT: u64 = 30;
const DEFAULT_RETRIES: u32 = 2;

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT
}

fn default_retries() -> u32 {
    DEFAULT_RETRIES
}

/// Connection settings for one Fleet server
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextConfig {
    /// Server address, e.g. https://fleet.example.com
    pub address: String,

    /// API token sent as a bearer credential
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Path prefix when the server is mounted below the root
    #[serde(default)]
    pub url_prefix: String,

    /// Accept invalid TLS certificates
    #[serde(default)]
    pub tls_skip_verify: bool,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Retries on connection failures
    #[serde(default = "default_retries")]
    pub retries: u32,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            token: None,
            url_prefix: String::new(),
            tls_skip_verify: false,
            timeout: DEFAULT_TIMEOUT,
            retries: DEFAULT_RETRIES,
        }
    }
}

/// Contents of the CLI config file
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    #[serde(default)]
    pub contexts: BTreeMap<String, ContextConfig>,
}

impl CliConfig {
    /// Load the config file at `path`. A missing file is an empty config.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("config file {} not found, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Get the default configuration file path
    pub fn default_path() -> Result<PathBuf> {
        let config_dir = if let Ok(xdg_config) = std::env::var("XDG_CONFIG_HOME") {
            PathBuf::from(xdg_config)
        } else if let Ok(home) = std::env::var("HOME") {
            PathBuf::from(home).join(".config")
        } else {
            return Err(anyhow::anyhow!("Cannot determine config directory"));
        };

        Ok(config_dir.join("fleet").join("config.toml"))
    }

    pub fn context(&self, name: &str) -> Option<&ContextConfig> {
        self.contexts.get(name)
    }

    /// Create a new builder for resolving a context
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for a resolved [`ContextConfig`]
///
/// Priority chain (lowest to highest):
/// 1. Defaults
/// 2. Context from the config file
/// 3. Environment variables
///
/// Values already set are never replaced by a lower-priority source, so
/// apply the sources from highest to lowest.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    address: Option<String>,
    token: Option<String>,
    url_prefix: Option<String>,
    tls_skip_verify: Option<bool>,
    timeout: Option<u64>,
    retries: Option<u32>,
}

impl ConfigBuilder {
    /// Create a new configuration builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Set server address (with validation)
    pub fn with_address(mut self, address: impl Into<String>) -> Result<Self> {
        let address = address.into();
        Self::validate_address(&address)?;
        self.address = Some(address);
        Ok(self)
    }

    /// Set API token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set timeout (with validation)
    pub fn with_timeout(mut self, timeout: u64) -> Result<Self> {
        Self::validate_timeout(timeout)?;
        self.timeout = Some(timeout);
        Ok(self)
    }

    /// Set retry count (with validation)
    pub fn with_retries(mut self, retries: u32) -> Result<Self> {
        Self::validate_retries(retries)?;
        self.retries = Some(retries);
        Ok(self)
    }

    /// Apply environment variable overrides
    pub fn with_env_overrides(mut self) -> Self {
        if self.address.is_none() {
            if let Ok(address) = std::env::var("FLEET_ADDRESS") {
                if Self::validate_address(&address).is_ok() {
                    self.address = Some(address);
                }
            }
        }

        if self.token.is_none() {
            if let Ok(token) = std::env::var("FLEET_TOKEN") {
                if !token.is_empty() {
                    self.token = Some(token);
                }
            }
        }

        if self.timeout.is_none() {
            if let Ok(timeout) = std::env::var("FLEET_TIMEOUT") {
                if let Ok(timeout) = timeout.parse() {
                    if Self::validate_timeout(timeout).is_ok() {
                        self.timeout = Some(timeout);
                    }
                }
            }
        }

        if self.retries.is_none() {
            if let Ok(retries) = std::env::var("FLEET_RETRIES") {
                if let Ok(retries) = retries.parse() {
                    if Self::validate_retries(retries).is_ok() {
                        self.retries = Some(retries);
                    }
                }
            }
        }

        self
    }

    /// Fill unset values from context `name` of the config file at `path`
    ///
    /// Without an explicit `path` the default location is used. Asking for a
    /// context the file does not define is an error, except for the default
    /// context, which may come entirely from defaults and the environment.
    pub fn with_config_file(self, path: Option<&Path>, name: &str) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => CliConfig::default_path()?,
        };
        let config = CliConfig::load(&path)?;

        let Some(context) = config.context(name) else {
            if name == DEFAULT_CONTEXT {
                return Ok(self);
            }
            return Err(FleetError::Config(format!(
                "context '{}' not found in {}",
                name,
                path.display()
            ))
            .into());
        };

        Ok(Self {
            address: self.address.or(Some(context.address.clone())),
            token: self.token.or(context.token.clone()),
            url_prefix: self.url_prefix.or(Some(context.url_prefix.clone())),
            tls_skip_verify: self.tls_skip_verify.or(Some(context.tls_skip_verify)),
            timeout: self.timeout.or(Some(context.timeout)),
            retries: self.retries.or(Some(context.retries)),
        })
    }

    /// Build the final configuration with validation
    pub fn build(self) -> Result<ContextConfig> {
        let defaults = ContextConfig::default();

        let address = self.address.unwrap_or(defaults.address);
        let timeout = self.timeout.unwrap_or(defaults.timeout);
        let retries = self.retries.unwrap_or(defaults.retries);

        Self::validate_address(&address)?;
        Self::validate_timeout(timeout)?;
        Self::validate_retries(retries)?;

        Ok(ContextConfig {
            address,
            token: self.token,
            url_prefix: self.url_prefix.unwrap_or(defaults.url_prefix),
            tls_skip_verify: self.tls_skip_verify.unwrap_or(defaults.tls_skip_verify),
            timeout,
            retries,
        })
    }

    fn validate_address(address: &str) -> Result<()> {
        if address.is_empty() {
            return Err(FleetError::Config("Server address cannot be empty".to_string()).into());
        }

        if !address.starts_with("http://") && !address.starts_with("https://") {
            return Err(FleetError::Config(format!(
                "Server address must start with http:// or https://, got '{}'",
                address
            ))
            .into());
        }

        Ok(())
    }

    fn validate_timeout(timeout: u64) -> Result<()> {
        if timeout == 0 || timeout > 300 {
            return Err(FleetError::Config(
                "Timeout must be between 1 and 300 seconds".to_string(),
            )
            .into());
        }

        Ok(())
    }

    fn validate_retries(retries: u32) -> Result<()> {
        if retries > 10 {
            return Err(FleetError::Config("Retries must be at most 10".to_string()).into());
        }

        Ok(())
    }
}
