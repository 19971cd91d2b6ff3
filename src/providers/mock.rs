//! In-memory Actions policy remote for testing.
//!
//! Holds one organization's policy, bumps the permissions ETag whenever the
//! permissions change (as GitHub does, the selected-actions endpoint has its
//! own), honours `If-None-Match`, records every call and lets tests inject failures
//! per operation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{ActionsAllowed, ActionsPermissions, ActionsPolicyApi, Fetched};
use crate::error::TransportError;
use crate::policy::{AllowedActions, EnabledRepositories};

/// The four remote operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    /// `GET /orgs/{org}/actions/permissions`
    GetPermissions,
    /// `PUT /orgs/{org}/actions/permissions`
    EditPermissions,
    /// `GET /orgs/{org}/actions/permissions/selected-actions`
    GetAllowed,
    /// `PUT /orgs/{org}/actions/permissions/selected-actions`
    EditAllowed,
}

impl ApiOperation {
    /// Whether the operation mutates the remote
    pub fn is_write(&self) -> bool {
        matches!(self, Self::EditPermissions | Self::EditAllowed)
    }
}

/// One recorded call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiCall {
    /// Which operation was invoked
    pub operation: ApiOperation,
    /// Organization it was invoked for
    pub organization: String,
}

#[derive(Debug)]
struct RemoteState {
    /// `None` when the organization has no policy record
    record: Option<(ActionsPermissions, ActionsAllowed)>,
    /// Revision of the permissions endpoint only
    permissions_revision: u64,
    calls: Vec<ApiCall>,
    failures: HashMap<ApiOperation, TransportError>,
}

impl RemoteState {
    fn permissions_etag(&self) -> String {
        format!("W/\"rev-{}\"", self.permissions_revision)
    }

    /// Record the call and return the injected failure, if any
    fn begin(&mut self, operation: ApiOperation, org: &str) -> Result<(), TransportError> {
        self.calls.push(ApiCall {
            operation,
            organization: org.to_string(),
        });
        if let Some(error) = self.failures.get(&operation) {
            return Err(error.clone());
        }
        if self.record.is_none() {
            return Err(TransportError::http(TransportError::NOT_FOUND, "Not Found"));
        }
        Ok(())
    }
}

/// A test double standing in for the GitHub API
#[derive(Debug)]
pub struct MockPolicyApi {
    state: Mutex<RemoteState>,
}

impl MockPolicyApi {
    /// A remote holding GitHub's defaults: Actions enabled for all
    /// repositories, all actions allowed
    pub fn new() -> Self {
        Self::with_record(Some((
            ActionsPermissions {
                enabled_repositories: EnabledRepositories::All,
                allowed_actions: Some(AllowedActions::All),
            },
            ActionsAllowed {
                github_owned_allowed: true,
                verified_allowed: false,
                patterns_allowed: Vec::new(),
            },
        )))
    }

    /// A remote that answers 404 to every call
    pub fn without_record() -> Self {
        Self::with_record(None)
    }

    fn with_record(record: Option<(ActionsPermissions, ActionsAllowed)>) -> Self {
        Self {
            state: Mutex::new(RemoteState {
                record,
                permissions_revision: 1,
                calls: Vec::new(),
                failures: HashMap::new(),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RemoteState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Make every later call to `operation` fail with `error`
    pub fn fail_on(&self, operation: ApiOperation, error: TransportError) {
        self.lock().failures.insert(operation, error);
    }

    /// Remove all injected failures
    pub fn clear_failures(&self) {
        self.lock().failures.clear();
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<ApiCall> {
        self.lock().calls.clone()
    }

    /// Number of write calls made so far, failed ones included
    pub fn write_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| c.operation.is_write())
            .count()
    }

    /// Forget recorded calls
    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Current remote permissions
    pub fn remote_permissions(&self) -> Option<ActionsPermissions> {
        self.lock().record.as_ref().map(|(p, _)| p.clone())
    }

    /// Current remote allowed-actions triple
    pub fn remote_allowed(&self) -> Option<ActionsAllowed> {
        self.lock().record.as_ref().map(|(_, a)| a.clone())
    }

    /// Change the remote behind the reconciler's back, as another editor would
    pub fn set_remote(&self, permissions: ActionsPermissions, allowed: ActionsAllowed) {
        let mut state = self.lock();
        let permissions_changed = state
            .record
            .as_ref()
            .map_or(true, |(current, _)| *current != permissions);
        state.record = Some((permissions, allowed));
        if permissions_changed {
            state.permissions_revision += 1;
        }
    }
}

impl Default for MockPolicyApi {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionsPolicyApi for MockPolicyApi {
    async fn get_actions_permissions(
        &self,
        org: &str,
        if_none_match: Option<&str>,
    ) -> Result<Fetched<ActionsPermissions>, TransportError> {
        let mut state = self.lock();
        state.begin(ApiOperation::GetPermissions, org)?;

        let etag = state.permissions_etag();
        if if_none_match == Some(etag.as_str()) {
            return Err(TransportError::http(
                TransportError::NOT_MODIFIED,
                "Not Modified",
            ));
        }

        let permissions = state
            .record
            .as_ref()
            .map(|(p, _)| p.clone())
            .ok_or_else(|| TransportError::http(TransportError::NOT_FOUND, "Not Found"))?;
        Ok(Fetched::new(permissions, Some(etag)))
    }

    async fn edit_actions_permissions(
        &self,
        org: &str,
        permissions: &ActionsPermissions,
    ) -> Result<(), TransportError> {
        let mut state = self.lock();
        state.begin(ApiOperation::EditPermissions, org)?;

        if let Some((current, _)) = state.record.as_mut() {
            current.enabled_repositories = permissions.enabled_repositories;
            // An omitted scope keeps whatever the remote had
            if permissions.allowed_actions.is_some() {
                current.allowed_actions = permissions.allowed_actions;
            }
        }
        state.permissions_revision += 1;
        Ok(())
    }

    async fn get_actions_allowed(&self, org: &str) -> Result<ActionsAllowed, TransportError> {
        let mut state = self.lock();
        state.begin(ApiOperation::GetAllowed, org)?;

        state
            .record
            .as_ref()
            .map(|(_, a)| a.clone())
            .ok_or_else(|| TransportError::http(TransportError::NOT_FOUND, "Not Found"))
    }

    async fn edit_actions_allowed(
        &self,
        org: &str,
        allowed: &ActionsAllowed,
    ) -> Result<(), TransportError> {
        let mut state = self.lock();
        state.begin(ApiOperation::EditAllowed, org)?;

        if let Some((_, current)) = state.record.as_mut() {
            *current = allowed.clone();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_etag_changes_after_permissions_write() {
        let api = MockPolicyApi::new();
        let before = api.get_actions_permissions("acme", None).await.unwrap();

        let permissions = ActionsPermissions {
            enabled_repositories: EnabledRepositories::Selected,
            allowed_actions: None,
        };
        api.edit_actions_permissions("acme", &permissions)
            .await
            .unwrap();

        let after = api.get_actions_permissions("acme", None).await.unwrap();
        assert_ne!(before.etag, after.etag);
    }

    #[tokio::test]
    async fn test_allowed_write_keeps_permissions_etag() {
        let api = MockPolicyApi::new();
        let before = api.get_actions_permissions("acme", None).await.unwrap();

        let allowed = ActionsAllowed {
            patterns_allowed: vec!["foo/*".to_string()],
            ..Default::default()
        };
        api.edit_actions_allowed("acme", &allowed).await.unwrap();

        let err = api
            .get_actions_permissions("acme", before.etag.as_deref())
            .await
            .unwrap_err();
        assert!(err.is_not_modified());
    }

    #[tokio::test]
    async fn test_if_none_match_yields_not_modified() {
        let api = MockPolicyApi::new();
        let first = api.get_actions_permissions("acme", None).await.unwrap();
        let err = api
            .get_actions_permissions("acme", first.etag.as_deref())
            .await
            .unwrap_err();
        assert!(err.is_not_modified());
    }

    #[tokio::test]
    async fn test_missing_record_yields_not_found() {
        let api = MockPolicyApi::without_record();
        let err = api.get_actions_allowed("ghost").await.unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(api.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_injected_failure_is_recorded() {
        let api = MockPolicyApi::new();
        api.fail_on(ApiOperation::EditAllowed, TransportError::http(422, "Invalid"));
        let result = api
            .edit_actions_allowed("acme", &ActionsAllowed::default())
            .await;
        assert_eq!(result.unwrap_err().status, Some(422));
        assert_eq!(api.write_count(), 1);

        api.clear_failures();
        assert!(api
            .edit_actions_allowed("acme", &ActionsAllowed::default())
            .await
            .is_ok());
    }
}
