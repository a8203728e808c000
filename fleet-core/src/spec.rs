//! Versioned spec documents
//!
//! Every exported resource is wrapped in a [`SpecDocument`] carrying its
//! `kind` and the [`API_VERSION`], so a consumer can dispatch on the document
//! alone:
//!
//! ```yaml
//! apiVersion: v1
//! kind: query
//! spec:
//!   name: uptime
//!   query: SELECT * FROM uptime
//! ```

use crate::types::{AppConfig, EnrollSecretSpec, LabelSpec, OptionsSpec, PackSpec, QuerySpec};
use serde::{Deserialize, Serialize};
use std::fmt;

/// API version stamped on every emitted document
pub const API_VERSION: &str = "v1";

/// The closed set of document kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpecKind {
    Query,
    Pack,
    Label,
    Options,
    EnrollSecret,
    Config,
}

impl SpecKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpecKind::Query => "query",
            SpecKind::Pack => "pack",
            SpecKind::Label => "label",
            SpecKind::Options => "options",
            SpecKind::EnrollSecret => "enroll_secret",
            SpecKind::Config => "config",
        }
    }
}

impl fmt::Display for SpecKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Document payload, tagged by `kind` with the resource under `spec`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "spec", rename_all = "snake_case")]
pub enum Spec {
    Query(QuerySpec),
    Pack(PackSpec),
    Label(LabelSpec),
    Options(OptionsSpec),
    EnrollSecret(EnrollSecretSpec),
    Config(AppConfig),
}

impl Spec {
    pub fn kind(&self) -> SpecKind {
        match self {
            Spec::Query(_) => SpecKind::Query,
            Spec::Pack(_) => SpecKind::Pack,
            Spec::Label(_) => SpecKind::Label,
            Spec::Options(_) => SpecKind::Options,
            Spec::EnrollSecret(_) => SpecKind::EnrollSecret,
            Spec::Config(_) => SpecKind::Config,
        }
    }
}

/// Versioned envelope around a single resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecDocument {
    #[serde(rename = "apiVersion")]
    api_version: String,
    #[serde(flatten)]
    spec: Spec,
}

impl SpecDocument {
    /// Wrap `spec` under the current [`API_VERSION`]
    pub fn new(spec: Spec) -> Self {
        Self {
            api_version: API_VERSION.to_string(),
            spec,
        }
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    pub fn kind(&self) -> SpecKind {
        self.spec.kind()
    }

    pub fn spec(&self) -> &Spec {
        &self.spec
    }

    pub fn into_spec(self) -> Spec {
        self.spec
    }

    /// Render as a single YAML document, without a leading separator
    pub fn to_yaml(&self) -> crate::Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

impl From<Spec> for SpecDocument {
    fn from(spec: Spec) -> Self {
        Self::new(spec)
    }
}
