//! # Providers Module
//!
//! This module defines the capability the reconciler consumes to talk to
//! GitHub, and the implementations of it.
//!
//! ## The `ActionsPolicyApi` trait
//!
//! Four operations, all keyed by organization name:
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | `get_actions_permissions` | `GET /orgs/{org}/actions/permissions` |
//! | `edit_actions_permissions` | `PUT /orgs/{org}/actions/permissions` |
//! | `get_actions_allowed` | `GET /orgs/{org}/actions/permissions/selected-actions` |
//! | `edit_actions_allowed` | `PUT /orgs/{org}/actions/permissions/selected-actions` |
//!
//! Every operation fails with a [`TransportError`] carrying the HTTP status.
//! A status of 304 means "unchanged since the freshness token" and 404 means
//! "policy record absent".
//!
//! ## Implementations
//!
//! - [`github::GitHubRestClient`] - the real REST API over `reqwest`
//! - [`mock::MockPolicyApi`] - an in-memory remote that records every call
//!
//! ## Examples
//!
//! ```rust,no_run
//! use actionsgate::providers::{ActionsPolicyApi, mock::MockPolicyApi};
//!
//! # async fn demo() -> Result<(), actionsgate::error::TransportError> {
//! let api = MockPolicyApi::new();
//! let permissions = api.get_actions_permissions("acme", None).await?;
//! println!("enabled for: {}", permissions.value.enabled_repositories);
//! # Ok(())
//! # }
//! ```

pub mod github;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TransportError;
use crate::policy::{AllowedActions, EnabledRepositories};

/// Organization-level Actions permissions payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsPermissions {
    /// Which repositories may run Actions
    pub enabled_repositories: EnabledRepositories,

    /// Which actions are permitted; omitted from writes when unset
    #[serde(
        default,
        deserialize_with = "deserialize_allowed_actions",
        skip_serializing_if = "Option::is_none"
    )]
    pub allowed_actions: Option<AllowedActions>,
}

/// Selected-actions payload (GitHub-owned, verified creators, patterns)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ActionsAllowed {
    /// Whether GitHub-authored actions are permitted
    #[serde(default)]
    pub github_owned_allowed: bool,

    /// Whether actions from verified creators are permitted
    #[serde(default)]
    pub verified_allowed: bool,

    /// Additional permitted actions, as glob patterns
    #[serde(default)]
    pub patterns_allowed: Vec<String>,
}

/// A value read from the API together with its freshness token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fetched<T> {
    /// The decoded response body
    pub value: T,
    /// The `ETag` returned with the response, if any
    pub etag: Option<String>,
}

impl<T> Fetched<T> {
    /// Wrap a value with an optional freshness token
    pub fn new(value: T, etag: Option<String>) -> Self {
        Self { value, etag }
    }
}

/// Remote operations on an organization's Actions policy
#[async_trait]
pub trait ActionsPolicyApi: Send + Sync {
    /// Read repository enablement and the allowed-actions scope.
    ///
    /// When `if_none_match` is given and the remote has not changed since,
    /// the call fails with status 304.
    async fn get_actions_permissions(
        &self,
        org: &str,
        if_none_match: Option<&str>,
    ) -> Result<Fetched<ActionsPermissions>, TransportError>;

    /// Write repository enablement and the allowed-actions scope
    async fn edit_actions_permissions(
        &self,
        org: &str,
        permissions: &ActionsPermissions,
    ) -> Result<(), TransportError>;

    /// Read the GitHub-owned / verified / patterns triple
    async fn get_actions_allowed(&self, org: &str) -> Result<ActionsAllowed, TransportError>;

    /// Write the GitHub-owned / verified / patterns triple
    async fn edit_actions_allowed(
        &self,
        org: &str,
        allowed: &ActionsAllowed,
    ) -> Result<(), TransportError>;
}

#[async_trait]
impl<T: ActionsPolicyApi + ?Sized> ActionsPolicyApi for Box<T> {
    async fn get_actions_permissions(
        &self,
        org: &str,
        if_none_match: Option<&str>,
    ) -> Result<Fetched<ActionsPermissions>, TransportError> {
        (**self).get_actions_permissions(org, if_none_match).await
    }

    async fn edit_actions_permissions(
        &self,
        org: &str,
        permissions: &ActionsPermissions,
    ) -> Result<(), TransportError> {
        (**self).edit_actions_permissions(org, permissions).await
    }

    async fn get_actions_allowed(&self, org: &str) -> Result<ActionsAllowed, TransportError> {
        (**self).get_actions_allowed(org).await
    }

    async fn edit_actions_allowed(
        &self,
        org: &str,
        allowed: &ActionsAllowed,
    ) -> Result<(), TransportError> {
        (**self).edit_actions_allowed(org, allowed).await
    }
}

/// Accepts a missing field, `null` and `""` as "not set"
pub(crate) fn deserialize_allowed_actions<'de, D>(
    deserializer: D,
) -> Result<Option<AllowedActions>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
