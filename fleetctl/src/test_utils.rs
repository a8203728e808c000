//! Test utilities for CLI testing
//!
//! Provides a mock Fleet server for client tests and an in-memory
//! [`FleetApi`] double for presenter tests.

use anyhow::Result;
use async_trait::async_trait;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use fleet_core::api::{ErrorResponse, HostsResponse, SpecsResponse};
use fleet_core::{
    AppConfig, EnrollSecret, EnrollSecretSpec, FleetError, Host, HostResponse, LabelSpec,
    OptionsSpec, OrgInfo, PackSpec, PackSpecQuery, QuerySpec,
};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use crate::client::FleetApi;

/// Token the mock server accepts
pub const TEST_TOKEN: &str = "test-token";

pub fn query(name: &str) -> QuerySpec {
    QuerySpec::new(
        name,
        format!("{} description", name),
        format!("SELECT * FROM {}", name),
    )
}

pub fn pack(name: &str, queries: &[&str]) -> PackSpec {
    PackSpec {
        name: name.to_string(),
        platform: "linux".to_string(),
        description: format!("{} description", name),
        queries: queries.iter().map(|q| PackSpecQuery::new(*q, 3600)).collect(),
        ..Default::default()
    }
}

pub fn label(name: &str, query: &str) -> LabelSpec {
    LabelSpec {
        name: name.to_string(),
        description: format!("{} description", name),
        query: query.to_string(),
        platform: "darwin".to_string(),
        ..Default::default()
    }
}

pub fn host(uuid: &str, hostname: &str, status: &str) -> HostResponse {
    HostResponse {
        host: Host {
            uuid: uuid.to_string(),
            hostname: hostname.to_string(),
            platform: "ubuntu".to_string(),
            ..Default::default()
        },
        status: status.to_string(),
        display_text: format!("{}.example.com", hostname),
    }
}

pub fn enroll_secrets() -> EnrollSecretSpec {
    EnrollSecretSpec {
        secrets: vec![EnrollSecret {
            name: "default".to_string(),
            secret: "RzTlxPvugG4o4O5IKS/HqEDJUmI1hwBoffff".to_string(),
            active: true,
            created_at: Some("2019-01-01T00:00:00Z".to_string()),
        }],
    }
}

pub fn options() -> OptionsSpec {
    OptionsSpec {
        config: serde_json::json!({
            "options": {"logger_plugin": "tls", "distributed_interval": 10}
        }),
        ..Default::default()
    }
}

pub fn app_config() -> AppConfig {
    AppConfig {
        org_info: Some(OrgInfo {
            org_name: Some("Example Org".to_string()),
            org_logo_url: None,
        }),
        ..Default::default()
    }
}

/// Mock server state
#[derive(Debug, Clone)]
pub struct MockServerState {
    pub queries: Arc<Vec<QuerySpec>>,
    pub packs: Arc<Vec<PackSpec>>,
    pub labels: Arc<Vec<LabelSpec>>,
    pub hosts: Arc<Vec<HostResponse>>,
    /// Named lookups served, as "<collection>/<decoded name>"
    requests: Arc<Mutex<Vec<String>>>,
}

impl Default for MockServerState {
    fn default() -> Self {
        Self {
            queries: Arc::new(vec![
                query("osquery_info"),
                query("system_info"),
                query("uptime"),
            ]),
            packs: Arc::new(vec![pack(
                "osquery_monitoring",
                &["osquery_info", "system_info"],
            )]),
            labels: Arc::new(vec![label("All Hosts", "SELECT 1")]),
            hosts: Arc::new(vec![
                host("0001", "web-01", "online"),
                host("0002", "db-01", "offline"),
            ]),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl MockServerState {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    fn record(&self, entry: String) {
        self.requests.lock().unwrap().push(entry);
    }
}

/// Mock Fleet server
#[derive(Debug)]
pub struct MockFleetServer {
    state: MockServerState,
    port: u16,
}

impl Default for MockFleetServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockFleetServer {
    pub fn new() -> Self {
        Self::with_state(MockServerState::default())
    }

    pub fn with_state(state: MockServerState) -> Self {
        Self { state, port: 0 }
    }

    /// Start the mock server and return the address
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = self.create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
        }

        Ok((self, server_url))
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn state(&self) -> &MockServerState {
        &self.state
    }

    fn create_router(&self) -> Router {
        Router::new()
            .route("/api/v1/kolide/spec/queries", get(list_queries_handler))
            .route("/api/v1/kolide/spec/queries/:name", get(get_query_handler))
            .route("/api/v1/kolide/spec/packs", get(list_packs_handler))
            .route("/api/v1/kolide/spec/packs/:name", get(get_pack_handler))
            .route("/api/v1/kolide/spec/labels", get(list_labels_handler))
            .route("/api/v1/kolide/spec/labels/:name", get(get_label_handler))
            .route("/api/v1/kolide/spec/osquery_options", get(options_handler))
            .route("/api/v1/kolide/spec/enroll_secret", get(enroll_secret_handler))
            .route("/api/v1/kolide/config", get(config_handler))
            .route("/api/v1/kolide/hosts", get(hosts_handler))
            .with_state(self.state.clone())
    }
}

// Handler functions

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TEST_TOKEN))
        .unwrap_or(false)
}

fn error_response(status: StatusCode, message: &str, reason: &str) -> Response {
    let body = ErrorResponse::new(message).with_reason("base", reason);
    (status, Json(body)).into_response()
}

fn respond<T: Serialize>(headers: &HeaderMap, body: T) -> Response {
    if !authorized(headers) {
        return error_response(
            StatusCode::UNAUTHORIZED,
            "Authentication required",
            "missing or invalid token",
        );
    }
    Json(body).into_response()
}

fn respond_named<T: Clone + Serialize>(
    headers: &HeaderMap,
    state: &MockServerState,
    collection: &str,
    name: &str,
    found: Option<&T>,
) -> Response {
    state.record(format!("{}/{}", collection, name));
    match found {
        Some(item) => respond(headers, SpecsResponse::new(item.clone())),
        None => error_response(
            StatusCode::NOT_FOUND,
            "Resource Not Found",
            &format!("{} {} was not found in the datastore", collection, name),
        ),
    }
}

async fn list_queries_handler(
    State(state): State<MockServerState>,
    headers: HeaderMap,
) -> Response {
    respond(&headers, SpecsResponse::new(state.queries.as_ref().clone()))
}

async fn get_query_handler(
    State(state): State<MockServerState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    let found = state.queries.iter().find(|q| q.name == name);
    respond_named(&headers, &state, "queries", &name, found)
}

async fn list_packs_handler(State(state): State<MockServerState>, headers: HeaderMap) -> Response {
    respond(&headers, SpecsResponse::new(state.packs.as_ref().clone()))
}

async fn get_pack_handler(
    State(state): State<MockServerState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    let found = state.packs.iter().find(|p| p.name == name);
    respond_named(&headers, &state, "packs", &name, found)
}

async fn list_labels_handler(
    State(state): State<MockServerState>,
    headers: HeaderMap,
) -> Response {
    respond(&headers, SpecsResponse::new(state.labels.as_ref().clone()))
}

async fn get_label_handler(
    State(state): State<MockServerState>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Response {
    let found = state.labels.iter().find(|l| l.name == name);
    respond_named(&headers, &state, "labels", &name, found)
}

async fn options_handler(headers: HeaderMap) -> Response {
    respond(&headers, SpecsResponse::new(options()))
}

async fn enroll_secret_handler(headers: HeaderMap) -> Response {
    respond(&headers, SpecsResponse::new(enroll_secrets()))
}

async fn config_handler(headers: HeaderMap) -> Response {
    respond(&headers, app_config())
}

async fn hosts_handler(State(state): State<MockServerState>, headers: HeaderMap) -> Response {
    respond(
        &headers,
        HostsResponse {
            hosts: Some(state.hosts.as_ref().clone()),
        },
    )
}

/// In-memory [`FleetApi`] that counts calls per method
#[derive(Debug, Default)]
pub struct RecordingApi {
    pub queries: Vec<QuerySpec>,
    pub packs: Vec<PackSpec>,
    pub labels: Vec<LabelSpec>,
    pub hosts: Vec<HostResponse>,
    /// When set, every list call fails with this message
    pub fail_lists: Option<String>,
    calls: Mutex<HashMap<&'static str, usize>>,
}

impl RecordingApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_queries(mut self, queries: Vec<QuerySpec>) -> Self {
        self.queries = queries;
        self
    }

    pub fn with_packs(mut self, packs: Vec<PackSpec>) -> Self {
        self.packs = packs;
        self
    }

    pub fn with_labels(mut self, labels: Vec<LabelSpec>) -> Self {
        self.labels = labels;
        self
    }

    pub fn with_hosts(mut self, hosts: Vec<HostResponse>) -> Self {
        self.hosts = hosts;
        self
    }

    pub fn failing(mut self, message: &str) -> Self {
        self.fail_lists = Some(message.to_string());
        self
    }

    /// Number of times `method` was called
    pub fn calls(&self, method: &str) -> usize {
        self.calls.lock().unwrap().get(method).copied().unwrap_or(0)
    }

    fn record(&self, method: &'static str) {
        *self.calls.lock().unwrap().entry(method).or_insert(0) += 1;
    }

    fn list<T: Clone>(&self, method: &'static str, items: &[T]) -> Result<Vec<T>> {
        self.record(method);
        match &self.fail_lists {
            Some(message) => Err(anyhow::anyhow!(message.clone())),
            None => Ok(items.to_vec()),
        }
    }

    fn find<T: Clone>(
        &self,
        method: &'static str,
        resource: &str,
        name: &str,
        found: Option<&T>,
    ) -> Result<T> {
        self.record(method);
        found
            .cloned()
            .ok_or_else(|| FleetError::not_found(resource, name).into())
    }
}

#[async_trait]
impl FleetApi for RecordingApi {
    async fn get_queries(&self) -> Result<Vec<QuerySpec>> {
        self.list("get_queries", &self.queries)
    }

    async fn get_query(&self, name: &str) -> Result<QuerySpec> {
        let found = self.queries.iter().find(|q| q.name == name);
        self.find("get_query", "query", name, found)
    }

    async fn get_packs(&self) -> Result<Vec<PackSpec>> {
        self.list("get_packs", &self.packs)
    }

    async fn get_pack(&self, name: &str) -> Result<PackSpec> {
        let found = self.packs.iter().find(|p| p.name == name);
        self.find("get_pack", "pack", name, found)
    }

    async fn get_labels(&self) -> Result<Vec<LabelSpec>> {
        self.list("get_labels", &self.labels)
    }

    async fn get_label(&self, name: &str) -> Result<LabelSpec> {
        let found = self.labels.iter().find(|l| l.name == name);
        self.find("get_label", "label", name, found)
    }

    async fn get_hosts(&self) -> Result<Vec<HostResponse>> {
        self.list("get_hosts", &self.hosts)
    }

    async fn get_options(&self) -> Result<OptionsSpec> {
        self.record("get_options");
        Ok(options())
    }

    async fn get_enroll_secret_spec(&self) -> Result<EnrollSecretSpec> {
        self.record("get_enroll_secret_spec");
        Ok(enroll_secrets())
    }

    async fn get_app_config(&self) -> Result<AppConfig> {
        self.record("get_app_config");
        Ok(app_config())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_startup() {
        let server = MockFleetServer::new();
        let (server, url) = server.start().await.unwrap();

        assert!(server.port() > 0);
        assert!(url.contains(&server.port().to_string()));
    }

    #[tokio::test]
    async fn test_mock_server_requires_token() {
        let (_, url) = MockFleetServer::new().start().await.unwrap();

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/api/v1/kolide/spec/packs", url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);

        let response = client
            .get(format!("{}/api/v1/kolide/spec/packs", url))
            .bearer_auth(TEST_TOKEN)
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn test_recording_api_counts_calls() {
        let api = RecordingApi::new().with_queries(vec![query("uptime")]);

        api.get_queries().await.unwrap();
        api.get_queries().await.unwrap();
        assert!(api.get_query("missing").await.is_err());

        assert_eq!(api.calls("get_queries"), 2);
        assert_eq!(api.calls("get_query"), 1);
        assert_eq!(api.calls("get_packs"), 0);
    }
}
