//! Response bodies of the Fleet REST API

use crate::types::HostResponse;
use serde::{Deserialize, Serialize};

/// Body of every `/spec/...` endpoint
///
/// List endpoints may return `null` for an empty collection, so list callers
/// should deserialize into `SpecsResponse<Option<Vec<T>>>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpecsResponse<T> {
    pub specs: T,
}

impl<T> SpecsResponse<T> {
    pub fn new(specs: T) -> Self {
        Self { specs }
    }
}

/// Body of `GET /hosts`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HostsResponse {
    #[serde(default)]
    pub hosts: Option<Vec<HostResponse>>,
}

/// One field-level error reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorReason {
    pub name: String,
    pub reason: String,
}

/// Error body returned with non-success statuses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorReason>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            errors: Vec::new(),
        }
    }

    /// Append one reason
    pub fn with_reason(mut self, name: impl Into<String>, reason: impl Into<String>) -> Self {
        self.errors.push(ErrorReason {
            name: name.into(),
            reason: reason.into(),
        });
        self
    }

    /// Message plus the first reason, which is where the server puts detail
    pub fn describe(&self) -> String {
        match self.errors.first() {
            Some(first) if !first.reason.is_empty() => {
                format!("{}: {}", self.message, first.reason)
            }
            _ => self.message.clone(),
        }
    }
}
