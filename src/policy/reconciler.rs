//! Policy reconciler - lifecycle operations against the remote policy
//!
//! The reconciler owns no state of its own. Every operation is a short chain
//! of sequential remote calls through an [`ActionsPolicyApi`]; whatever must
//! survive between operations (the identifier, the freshness token) is handed
//! back to the caller.

use tracing::{debug, info, warn};

use super::{
    validate, ActionsAllowedSnapshot, EnabledRepositories, ObservedPolicy,
    OrganizationActionsPolicy, PolicyId,
};
use crate::error::{ActionsGateError, ConstraintError, TransportError};
use crate::providers::{ActionsPermissions, ActionsPolicyApi};

/// Outcome of one write in a two-write apply
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseResult {
    /// The write succeeded
    Succeeded,
    /// The write failed
    Failed(TransportError),
    /// The write was not attempted because an earlier one failed
    Skipped,
}

impl PhaseResult {
    /// Whether the write went through
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Succeeded)
    }

    fn from_result(result: Result<(), TransportError>) -> Self {
        match result {
            Ok(()) => Self::Succeeded,
            Err(e) => Self::Failed(e),
        }
    }
}

/// How much of an apply reached the remote
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyStatus {
    /// Both writes succeeded
    Applied,
    /// Permissions were written, allowed actions were not
    PartiallyApplied,
    /// Nothing was written
    NotApplied,
}

/// Result of [`PolicyReconciler::apply_phased`]: one entry per remote write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    /// Identifier of the policy that was written
    pub id: PolicyId,
    /// Repository enablement and allowed-actions scope write
    pub permissions: PhaseResult,
    /// GitHub-owned / verified / patterns write
    pub allowed: PhaseResult,
}

impl ApplyReport {
    /// Classify the report
    pub fn status(&self) -> ApplyStatus {
        match (&self.permissions, &self.allowed) {
            (PhaseResult::Succeeded, PhaseResult::Succeeded) => ApplyStatus::Applied,
            (PhaseResult::Succeeded, _) => ApplyStatus::PartiallyApplied,
            _ => ApplyStatus::NotApplied,
        }
    }

    /// Collapse into the identifier, or the error describing how far the apply got
    pub fn into_result(self) -> Result<PolicyId, ActionsGateError> {
        match (self.permissions, self.allowed) {
            (PhaseResult::Succeeded, PhaseResult::Succeeded) => Ok(self.id),
            (PhaseResult::Succeeded, PhaseResult::Failed(source)) => {
                Err(ActionsGateError::PartialApply { source })
            }
            (PhaseResult::Failed(e), _) | (_, PhaseResult::Failed(e)) => {
                Err(ActionsGateError::Transport(e))
            }
            _ => Err(ActionsGateError::Transport(TransportError::connection(
                "apply did not reach the remote",
            ))),
        }
    }
}

/// Result of a full read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Freshly read state
    Found(ObservedPolicy),
    /// The remote reported no change since the supplied token; this is the
    /// prior state, untouched
    Unchanged(ObservedPolicy),
    /// The remote has no record for the organization
    Absent,
}

impl ReadOutcome {
    /// Whether the managed entity exists remotely
    pub fn found(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Observed state, if any
    pub fn observed(&self) -> Option<&ObservedPolicy> {
        match self {
            Self::Found(observed) | Self::Unchanged(observed) => Some(observed),
            Self::Absent => None,
        }
    }

    /// Consume into the observed state, if any
    pub fn into_observed(self) -> Option<ObservedPolicy> {
        match self {
            Self::Found(observed) | Self::Unchanged(observed) => Some(observed),
            Self::Absent => None,
        }
    }
}

/// Performs apply / read / snapshot / reset against one transport
#[derive(Debug)]
pub struct PolicyReconciler<A> {
    api: A,
}

impl<A: ActionsPolicyApi> PolicyReconciler<A> {
    /// Create a reconciler on top of a transport
    pub fn new(api: A) -> Self {
        Self { api }
    }

    /// The underlying transport
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Validate and write the desired policy, reporting each write separately.
    ///
    /// Fails only when the desired state is rejected by the validator, in
    /// which case nothing is sent.
    pub async fn apply_phased(
        &self,
        org: &str,
        desired: &OrganizationActionsPolicy,
    ) -> Result<ApplyReport, ConstraintError> {
        validate(desired)?;

        let id = PolicyId::for_organization(org);

        debug!("Setting Actions permissions for {}", org);
        let permissions = PhaseResult::from_result(
            self.api
                .edit_actions_permissions(org, &desired.permissions())
                .await,
        );

        let allowed = if permissions.is_success() {
            debug!("Setting allowed Actions for {}", org);
            PhaseResult::from_result(self.api.edit_actions_allowed(org, &desired.allowed()).await)
        } else {
            PhaseResult::Skipped
        };

        let report = ApplyReport {
            id,
            permissions,
            allowed,
        };

        match report.status() {
            ApplyStatus::Applied => info!("Applied Actions policy {}", report.id),
            ApplyStatus::PartiallyApplied => warn!(
                "Actions policy {} partially applied: allowed actions were not written",
                report.id
            ),
            ApplyStatus::NotApplied => warn!("Actions policy {} was not applied", report.id),
        }

        Ok(report)
    }

    /// Validate and write the desired policy, returning its identifier
    pub async fn apply(
        &self,
        org: &str,
        desired: &OrganizationActionsPolicy,
    ) -> Result<PolicyId, ActionsGateError> {
        self.apply_phased(org, desired).await?.into_result()
    }

    /// Read permissions and allowed actions and merge them.
    ///
    /// When `prior` carries a freshness token the permissions read is made
    /// conditional on it; if the remote reports no change, `prior` is returned
    /// as is and the second read is skipped.
    pub async fn read_full(
        &self,
        id: &PolicyId,
        prior: Option<&ObservedPolicy>,
    ) -> Result<ReadOutcome, ActionsGateError> {
        let org = id.organization();
        let if_none_match = prior.and_then(|p| p.etag.as_deref());

        debug!("Reading organization allowed settings for {}", org);
        let permissions = match self.api.get_actions_permissions(org, if_none_match).await {
            Ok(fetched) => fetched,
            Err(e) => return Self::classify_read_error(org, e, prior),
        };

        let allowed = match self.api.get_actions_allowed(org).await {
            Ok(allowed) => allowed,
            Err(e) => return Self::classify_read_error(org, e, None),
        };

        Ok(ReadOutcome::Found(ObservedPolicy {
            policy: OrganizationActionsPolicy::from_parts(permissions.value, allowed),
            etag: permissions.etag,
        }))
    }

    fn classify_read_error(
        org: &str,
        error: TransportError,
        prior: Option<&ObservedPolicy>,
    ) -> Result<ReadOutcome, ActionsGateError> {
        if error.is_not_found() {
            warn!("No Actions policy record found for {}", org);
            return Ok(ReadOutcome::Absent);
        }
        if error.is_not_modified() {
            if let Some(prior) = prior {
                debug!("Actions policy for {} unchanged since last read", org);
                return Ok(ReadOutcome::Unchanged(prior.clone()));
            }
        }
        Err(error.into())
    }

    /// Read only the allowed-actions view; needs no write scope
    pub async fn read_snapshot(
        &self,
        org: &str,
    ) -> Result<ActionsAllowedSnapshot, ActionsGateError> {
        debug!("Reading allowed Actions snapshot for {}", org);
        let allowed = self.api.get_actions_allowed(org).await?;
        Ok(allowed.into())
    }

    /// Return the policy to its default: Actions enabled for all repositories.
    ///
    /// Only the enablement is written; the remote keeps its own defaults for
    /// everything else.
    pub async fn reset(&self, id: &PolicyId) -> Result<(), ActionsGateError> {
        let org = id.organization();
        info!("Resetting organization allowed actions settings for {}", org);

        let permissions = ActionsPermissions {
            enabled_repositories: EnabledRepositories::All,
            allowed_actions: None,
        };
        self.api.edit_actions_permissions(org, &permissions).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{AllowedActions, PatternList};
    use crate::providers::mock::{ApiOperation, MockPolicyApi};

    fn selected_policy() -> OrganizationActionsPolicy {
        OrganizationActionsPolicy {
            enabled_repositories: EnabledRepositories::All,
            allowed_actions: Some(AllowedActions::Selected),
            github_owned_allowed: true,
            verified_allowed: false,
            patterns_allowed: PatternList::new(["foo/*"]),
        }
    }

    #[tokio::test]
    async fn test_apply_writes_permissions_before_allowed() {
        let reconciler = PolicyReconciler::new(MockPolicyApi::new());
        reconciler.apply("acme", &selected_policy()).await.unwrap();

        let operations: Vec<ApiOperation> = reconciler
            .api()
            .calls()
            .into_iter()
            .map(|c| c.operation)
            .collect();
        assert_eq!(
            operations,
            vec![ApiOperation::EditPermissions, ApiOperation::EditAllowed]
        );
    }

    #[tokio::test]
    async fn test_apply_skips_second_write_when_first_fails() {
        let api = MockPolicyApi::new();
        api.fail_on(ApiOperation::EditPermissions, TransportError::http(403, "Forbidden"));
        let reconciler = PolicyReconciler::new(api);

        let report = reconciler
            .apply_phased("acme", &selected_policy())
            .await
            .unwrap();
        assert_eq!(report.status(), ApplyStatus::NotApplied);
        assert_eq!(report.allowed, PhaseResult::Skipped);
        assert_eq!(reconciler.api().write_count(), 1);

        let err = report.into_result().unwrap_err();
        assert_eq!(err.status(), Some(403));
        assert!(matches!(err, ActionsGateError::Transport(_)));
    }

    #[tokio::test]
    async fn test_apply_reports_partial_write() {
        let api = MockPolicyApi::new();
        api.fail_on(ApiOperation::EditAllowed, TransportError::http(409, "Conflict"));
        let reconciler = PolicyReconciler::new(api);

        let report = reconciler
            .apply_phased("acme", &selected_policy())
            .await
            .unwrap();
        assert_eq!(report.status(), ApplyStatus::PartiallyApplied);
        assert!(matches!(
            report.into_result(),
            Err(ActionsGateError::PartialApply { .. })
        ));

        let remote = reconciler.api().remote_permissions().unwrap();
        assert_eq!(remote.allowed_actions, Some(AllowedActions::Selected));
    }

    #[tokio::test]
    async fn test_read_full_unmodified_returns_prior() {
        let reconciler = PolicyReconciler::new(MockPolicyApi::new());
        let id = PolicyId::for_organization("acme");

        let first = reconciler.read_full(&id, None).await.unwrap();
        let observed = first.into_observed().unwrap();
        assert!(observed.etag.is_some());

        let second = reconciler.read_full(&id, Some(&observed)).await.unwrap();
        assert_eq!(second, ReadOutcome::Unchanged(observed));
    }

    #[tokio::test]
    async fn test_read_full_propagates_other_errors() {
        let api = MockPolicyApi::new();
        api.fail_on(ApiOperation::GetAllowed, TransportError::http(500, "boom"));
        let reconciler = PolicyReconciler::new(api);

        let err = reconciler
            .read_full(&PolicyId::for_organization("acme"), None)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(500));
    }

    #[tokio::test]
    async fn test_not_modified_without_prior_is_an_error() {
        let api = MockPolicyApi::new();
        api.fail_on(
            ApiOperation::GetPermissions,
            TransportError::http(304, "Not Modified"),
        );
        let reconciler = PolicyReconciler::new(api);

        let result = reconciler
            .read_full(&PolicyId::for_organization("acme"), None)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_reset_sends_single_enablement_write() {
        let reconciler = PolicyReconciler::new(MockPolicyApi::new());
        reconciler
            .reset(&PolicyId::for_organization("acme"))
            .await
            .unwrap();

        let calls = reconciler.api().calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].operation, ApiOperation::EditPermissions);
        assert_eq!(calls[0].organization, "acme");
    }
}
