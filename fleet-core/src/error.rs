//! Error types for Fleet operations

use thiserror::Error;

/// Core error type for Fleet operations
#[derive(Error, Debug)]
pub enum FleetError {
    /// Resource lookup returned nothing
    #[error("{resource} not found: {name}")]
    NotFound { resource: String, name: String },

    /// Missing or rejected API token
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Any other non-success response from the server
    #[error("Fleet API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl FleetError {
    /// Shorthand for a not-found error on a named resource.
    pub fn not_found(resource: impl Into<String>, name: impl Into<String>) -> Self {
        FleetError::NotFound {
            resource: resource.into(),
            name: name.into(),
        }
    }

    /// Whether this error reports a missing resource.
    pub fn is_not_found(&self) -> bool {
        matches!(self, FleetError::NotFound { .. })
    }
}

/// Result type alias for Fleet operations
pub type Result<T> = std::result::Result<T, FleetError>;

impl From<serde_json::Error> for FleetError {
    fn from(err: serde_json::Error) -> Self {
        FleetError::Serialization(err.to_string())
    }
}

impl From<serde_yaml::Error> for FleetError {
    fn from(err: serde_yaml::Error) -> Self {
        FleetError::Serialization(err.to_string())
    }
}
