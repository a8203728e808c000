//! Resource types exchanged with the Fleet server

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A saved osquery query. `name` is unique and is what packs reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Query text, kept opaque
    pub query: String,
}

impl QuerySpec {
    /// Create a query spec
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        query: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            query: query.into(),
        }
    }
}

/// Label targets of a pack
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackSpecTargets {
    #[serde(default)]
    pub labels: Vec<String>,
}

/// One scheduled entry of a pack, pointing at a query by name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackSpecQuery {
    /// Name of the referenced query
    #[serde(rename = "query")]
    pub query_name: String,
    /// Name of the scheduled entry within the pack
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Run interval in seconds
    pub interval: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub removed: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shard: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PackSpecQuery {
    /// Schedule `query_name` under the same entry name
    pub fn new(query_name: impl Into<String>, interval: u32) -> Self {
        let query_name = query_name.into();
        Self {
            name: query_name.clone(),
            query_name,
            description: String::new(),
            interval,
            snapshot: None,
            removed: None,
            shard: None,
            platform: None,
            version: None,
        }
    }
}

/// A named, platform-scoped collection of scheduled queries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PackSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub platform: String,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub targets: PackSpecTargets,
    #[serde(default)]
    pub queries: Vec<PackSpecQuery>,
}

impl PackSpec {
    /// Names of every query this pack references, in pack order
    pub fn query_names(&self) -> impl Iterator<Item = &str> {
        self.queries.iter().map(|q| q.query_name.as_str())
    }
}

/// A dynamic host group defined by a membership query
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LabelSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    /// Membership query
    pub query: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub platform: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_membership_type: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub hosts: Vec<String>,
}

/// Enrolled host as stored by the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Host {
    #[serde(default)]
    pub id: u32,
    pub uuid: String,
    #[serde(default)]
    pub hostname: String,
    #[serde(default)]
    pub platform: String,
    #[serde(default)]
    pub osquery_version: String,
    #[serde(default)]
    pub os_version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seen_time: Option<String>,
}

/// Host record plus the server-computed status fields
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostResponse {
    #[serde(flatten)]
    pub host: Host,
    /// online, offline, mia or new
    pub status: String,
    pub display_text: String,
}

/// Per-platform overrides of the global osquery options
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsOverrides {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub platforms: BTreeMap<String, serde_json::Value>,
}

/// Global osquery options pushed to every agent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OptionsSpec {
    /// osquery config document, kept opaque
    pub config: serde_json::Value,
    #[serde(default)]
    pub overrides: OptionsOverrides,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrollSecret {
    pub name: String,
    pub secret: String,
    pub active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// Every enroll secret known to the server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EnrollSecretSpec {
    #[serde(default)]
    pub secrets: Vec<EnrollSecret>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrgInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_logo_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServerSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kolide_server_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub live_query_disabled: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmtpSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_smtp: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configured: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_ssl_tls: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostExpirySettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_expiry_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_expiry_window: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SsoSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_sso: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub idp_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata_url: Option<String>,
}

/// Service-wide application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_info: Option<OrgInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub server_settings: Option<ServerSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub smtp_settings: Option<SmtpSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host_expiry_settings: Option<HostExpirySettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sso_settings: Option<SsoSettings>,
}

/// Query names referenced by the packs being printed.
///
/// Membership only: iteration order carries no meaning.
#[derive(Debug, Clone, Default)]
pub struct QueryNameSet {
    names: HashSet<String>,
}

impl QueryNameSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record every query referenced by `pack`
    pub fn add_pack(&mut self, pack: &PackSpec) {
        self.names
            .extend(pack.query_names().map(ToString::to_string));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
