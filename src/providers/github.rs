//! GitHub provider - Actions policy endpoints of the REST API

use async_trait::async_trait;
use reqwest::header::{HeaderValue, ACCEPT, ETAG, IF_NONE_MATCH};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::process::Command;
use std::time::Duration;
use url::Url;

use super::{ActionsAllowed, ActionsPermissions, ActionsPolicyApi, Fetched};
use crate::config::GitHubConfig;
use crate::error::{ActionsGateError, ConfigError, ProviderError, TransportError};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";
const API_VERSION: &str = "2022-11-28";

/// Fallback environment variable checked after the configured one
const GH_TOKEN_ENV: &str = "GH_TOKEN";

/// Error body returned by the GitHub API
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// Client for the organization Actions policy endpoints
#[derive(Debug, Clone)]
pub struct GitHubRestClient {
    http: reqwest::Client,
    api_url: Url,
    token: String,
}

impl GitHubRestClient {
    /// Create a client from configuration, resolving the token from the
    /// environment or the GitHub CLI
    pub fn from_config(config: &GitHubConfig) -> Result<Self, ActionsGateError> {
        let token = resolve_token(&config.token_env)?;
        Self::new(config, token)
    }

    /// Create a client with an explicit token
    pub fn new(config: &GitHubConfig, token: String) -> Result<Self, ActionsGateError> {
        let api_url = parse_api_url(&config.api_url)?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent())
            .build()
            .map_err(|e| ProviderError::ClientBuild {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            api_url,
            token,
        })
    }

    /// URL of `/orgs/{org}/actions/permissions[/selected-actions]`
    fn endpoint(&self, org: &str, selected_actions: bool) -> Result<Url, TransportError> {
        let mut url = self.api_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| TransportError::connection("API URL cannot be a base"))?;
            segments
                .pop_if_empty()
                .extend(["orgs", org, "actions", "permissions"]);
            if selected_actions {
                segments.push("selected-actions");
            }
        }
        Ok(url)
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .bearer_auth(&self.token)
            .header(ACCEPT, GITHUB_ACCEPT)
            .header(API_VERSION_HEADER, API_VERSION)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, TransportError> {
        let response = self
            .request(builder)
            .send()
            .await
            .map_err(|e| TransportError::connection(format!("HTTP request failed: {}", e)))?;

        if response.status().is_success() {
            return Ok(response);
        }

        Err(error_from_response(response).await)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        if_none_match: Option<&str>,
    ) -> Result<Fetched<T>, TransportError> {
        let mut builder = self.http.get(url.clone());
        if let Some(etag) = if_none_match {
            let value = HeaderValue::from_str(etag)
                .map_err(|e| TransportError::connection(format!("Invalid ETag: {}", e)))?;
            builder = builder.header(IF_NONE_MATCH, value);
        }

        tracing::debug!("GET {}", url);
        let response = self.send(builder).await?;

        let etag = response
            .headers()
            .get(ETAG)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());

        let value = response
            .json::<T>()
            .await
            .map_err(|e| TransportError::connection(format!("Failed to parse response: {}", e)))?;

        Ok(Fetched::new(value, etag))
    }

    async fn put_json<B: serde::Serialize + ?Sized>(
        &self,
        url: Url,
        body: &B,
    ) -> Result<(), TransportError> {
        tracing::debug!("PUT {}", url);
        self.send(self.http.put(url).json(body)).await?;
        Ok(())
    }
}

#[async_trait]
impl ActionsPolicyApi for GitHubRestClient {
    async fn get_actions_permissions(
        &self,
        org: &str,
        if_none_match: Option<&str>,
    ) -> Result<Fetched<ActionsPermissions>, TransportError> {
        let url = self.endpoint(org, false)?;
        self.get_json(url, if_none_match).await
    }

    async fn edit_actions_permissions(
        &self,
        org: &str,
        permissions: &ActionsPermissions,
    ) -> Result<(), TransportError> {
        let url = self.endpoint(org, false)?;
        self.put_json(url, permissions).await
    }

    async fn get_actions_allowed(&self, org: &str) -> Result<ActionsAllowed, TransportError> {
        let url = self.endpoint(org, true)?;
        Ok(self.get_json(url, None).await?.value)
    }

    async fn edit_actions_allowed(
        &self,
        org: &str,
        allowed: &ActionsAllowed,
    ) -> Result<(), TransportError> {
        let url = self.endpoint(org, true)?;
        self.put_json(url, allowed).await
    }
}

/// Turn a non-2xx response into a transport error, keeping the API message
async fn error_from_response(response: Response) -> TransportError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    TransportError::http(status.as_u16(), error_message(status, &body))
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        })
}

/// Validate the configured API base URL
pub fn parse_api_url(raw: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(raw).map_err(|e| ConfigError::InvalidApiUrl {
        url: raw.to_string(),
        message: e.to_string(),
    })?;

    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(ConfigError::InvalidApiUrl {
            url: raw.to_string(),
            message: "expected an absolute http(s) URL".to_string(),
        });
    }

    Ok(url)
}

/// Find a GitHub token: the configured variable, then `GH_TOKEN`, then the
/// GitHub CLI's stored credentials
pub fn resolve_token(env_var: &str) -> Result<String, ProviderError> {
    for name in [env_var, GH_TOKEN_ENV] {
        if let Ok(token) = std::env::var(name) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                tracing::debug!("Using GitHub token from {}", name);
                return Ok(token);
            }
        }
    }

    match gh_auth_token() {
        Ok(Some(token)) => {
            tracing::debug!("Using GitHub token from gh CLI");
            Ok(token)
        }
        Ok(None) => Err(ProviderError::MissingToken {
            env_var: env_var.to_string(),
        }),
        Err(e) => {
            tracing::debug!("gh auth token failed: {}", e);
            Err(ProviderError::MissingToken {
                env_var: env_var.to_string(),
            })
        }
    }
}

/// Ask the GitHub CLI for its token; `None` when gh is not installed
fn gh_auth_token() -> Result<Option<String>, ProviderError> {
    let gh = match which::which("gh") {
        Ok(path) => path,
        Err(_) => return Ok(None),
    };

    let output = Command::new(gh)
        .args(["auth", "token"])
        .output()
        .map_err(|_| ProviderError::CommandFailed {
            command: "gh auth token".to_string(),
        })?;

    if !output.status.success() {
        return Err(ProviderError::CommandFailed {
            command: "gh auth token".to_string(),
        });
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    Ok((!token.is_empty()).then_some(token))
}
