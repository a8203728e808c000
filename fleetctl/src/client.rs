//! HTTP client for communicating with the Fleet server.

use anyhow::{Context, Result};
use async_trait::async_trait;
use fleet_core::api::{ErrorResponse, HostsResponse, SpecsResponse};
use fleet_core::{
    AppConfig, EnrollSecretSpec, FleetError, HostResponse, LabelSpec, OptionsSpec, PackSpec,
    QuerySpec,
};
use reqwest::{header, Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use crate::config::ContextConfig;

/// Normalize a server URL by removing trailing slashes.
fn normalize_url(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// Read-only access to the resources the `get` commands print.
///
/// Every call is a single fetch. Callers await them one at a time.
#[async_trait]
pub trait FleetApi: Send + Sync {
    async fn get_queries(&self) -> Result<Vec<QuerySpec>>;

    async fn get_query(&self, name: &str) -> Result<QuerySpec>;

    async fn get_packs(&self) -> Result<Vec<PackSpec>>;

    async fn get_pack(&self, name: &str) -> Result<PackSpec>;

    async fn get_labels(&self) -> Result<Vec<LabelSpec>>;

    async fn get_label(&self, name: &str) -> Result<LabelSpec>;

    async fn get_hosts(&self) -> Result<Vec<HostResponse>>;

    async fn get_options(&self) -> Result<OptionsSpec>;

    async fn get_enroll_secret_spec(&self) -> Result<EnrollSecretSpec>;

    async fn get_app_config(&self) -> Result<AppConfig>;
}

/// HTTP client for the Fleet REST API.
///
/// Connection failures and timeouts are retried with a linearly growing
/// delay. HTTP error statuses are never retried; they map to
/// [`FleetError`] values that stay downcastable through `anyhow`.
///
/// # Examples
///
/// ```no_run
/// use fleetctl::client::{FleetApi, FleetClient};
/// use fleetctl::config::ContextConfig;
///
/// # async fn example() -> anyhow::Result<()> {
/// let context = ContextConfig {
///     address: "https://fleet.example.com".to_string(),
///     token: Some("api-token".to_string()),
///     ..Default::default()
/// };
/// let client = FleetClient::from_context(&context)?;
///
/// for pack in client.get_packs().await? {
///     println!("{}", pack.name);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct FleetClient {
    client: Client,
    base_url: String,
    token: Option<String>,
    max_retries: u32,
    retry_delay: Duration,
}

impl FleetClient {
    /// Create a client for one resolved context
    ///
    /// No request is made until the first fetch.
    pub fn from_context(context: &ContextConfig) -> Result<Self> {
        Self::with_config(context, context.retries, Duration::from_millis(500))
    }

    /// Create a client with an explicit retry policy
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(
        context: &ContextConfig,
        max_retries: u32,
        retry_delay: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(context.timeout))
            .user_agent(concat!("fleetctl/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(context.tls_skip_verify)
            .build()
            .context("Failed to create HTTP client")?;

        let base_url = format!(
            "{}{}/api/v1/kolide",
            normalize_url(&context.address),
            normalize_url(&context.url_prefix)
        );

        Ok(Self {
            client,
            base_url,
            token: context.token.clone(),
            max_retries,
            retry_delay,
        })
    }

    /// Root of every API path, e.g. `https://fleet.example.com/api/v1/kolide`
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Turn a response into `T`, mapping error statuses onto [`FleetError`].
    ///
    /// `resource` and `name` label a not-found error; `name` is empty for
    /// collection endpoints.
    async fn handle_response<T: DeserializeOwned>(
        response: Response,
        endpoint: &str,
        resource: &str,
        name: &str,
    ) -> Result<T> {
        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", endpoint))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorResponse>(&text)
                .map(|body| body.describe())
                .unwrap_or_else(|_| text.trim().to_string());

            let err = match status {
                StatusCode::NOT_FOUND => FleetError::not_found(resource, name),
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    FleetError::Unauthorized(message)
                }
                _ => FleetError::Api {
                    status: status.as_u16(),
                    message,
                },
            };
            return Err(err.into());
        }

        serde_json::from_str(&text)
            .map_err(FleetError::from)
            .with_context(|| format!("Failed to parse JSON response from {}", endpoint))
    }

    /// GET `path` with automatic retry on connection errors.
    ///
    /// Uses linear backoff: delay * (attempt + 1).
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &str,
        name: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            tracing::debug!(%url, attempt, "GET");

            let mut request = self.client.get(&url);
            if let Some(token) = &self.token {
                request = request.header(header::AUTHORIZATION, format!("Bearer {}", token));
            }

            match request.send().await {
                Ok(response) => {
                    return Self::handle_response(response, path, resource, name).await;
                }
                Err(e) => {
                    let should_retry = e.is_connect() || e.is_timeout() || e.is_request();
                    last_error = Some(e);

                    if attempt < self.max_retries && should_retry {
                        tracing::warn!(%url, attempt, "request failed, retrying");
                        tokio::time::sleep(self.retry_delay * (attempt + 1)).await;
                    } else {
                        break;
                    }
                }
            }
        }

        let reason = last_error
            .map(|e| e.to_string())
            .unwrap_or_else(|| "no attempt made".to_string());
        Err(anyhow::anyhow!(
            "Failed to reach {} after {} attempts: {}",
            url,
            self.max_retries + 1,
            reason
        ))
    }

    async fn get_spec_list<T: DeserializeOwned>(
        &self,
        path: &str,
        resource: &str,
    ) -> Result<Vec<T>> {
        let body: SpecsResponse<Option<Vec<T>>> = self.get_json(path, resource, "").await?;
        Ok(body.specs.unwrap_or_default())
    }

    async fn get_named_spec<T: DeserializeOwned>(
        &self,
        collection: &str,
        resource: &str,
        name: &str,
    ) -> Result<T> {
        if name.trim().is_empty() {
            return Err(anyhow::anyhow!("{} name cannot be empty", resource));
        }

        let path = format!("/spec/{}/{}", collection, urlencoding::encode(name));
        let body: SpecsResponse<T> = self.get_json(&path, resource, name).await?;
        Ok(body.specs)
    }
}

#[async_trait]
impl FleetApi for FleetClient {
    async fn get_queries(&self) -> Result<Vec<QuerySpec>> {
        self.get_spec_list("/spec/queries", "queries").await
    }

    async fn get_query(&self, name: &str) -> Result<QuerySpec> {
        self.get_named_spec("queries", "query", name).await
    }

    async fn get_packs(&self) -> Result<Vec<PackSpec>> {
        self.get_spec_list("/spec/packs", "packs").await
    }

    async fn get_pack(&self, name: &str) -> Result<PackSpec> {
        self.get_named_spec("packs", "pack", name).await
    }

    async fn get_labels(&self) -> Result<Vec<LabelSpec>> {
        self.get_spec_list("/spec/labels", "labels").await
    }

    async fn get_label(&self, name: &str) -> Result<LabelSpec> {
        self.get_named_spec("labels", "label", name).await
    }

    async fn get_hosts(&self) -> Result<Vec<HostResponse>> {
        let body: HostsResponse = self.get_json("/hosts", "hosts", "").await?;
        Ok(body.hosts.unwrap_or_default())
    }

    async fn get_options(&self) -> Result<OptionsSpec> {
        let body: SpecsResponse<OptionsSpec> = self
            .get_json("/spec/osquery_options", "options", "")
            .await?;
        Ok(body.specs)
    }

    async fn get_enroll_secret_spec(&self) -> Result<EnrollSecretSpec> {
        let body: SpecsResponse<EnrollSecretSpec> = self
            .get_json("/spec/enroll_secret", "enroll secrets", "")
            .await?;
        Ok(body.specs)
    }

    async fn get_app_config(&self) -> Result<AppConfig> {
        self.get_json("/config", "config", "").await
    }
}
