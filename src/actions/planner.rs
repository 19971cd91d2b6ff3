//! Drift planner - compares the desired policy with what the remote holds

use super::plan::{FieldChange, PlanKind, PolicyPlan};
use crate::error::ActionsGateError;
use crate::policy::{
    ObservedPolicy, OrganizationActionsPolicy, PolicyId, PolicyReconciler, ReadOutcome,
};
use crate::providers::ActionsPolicyApi;

/// Read the remote policy and plan against it.
///
/// The read is never conditional: the freshness token only covers the
/// permissions endpoint, so a stored token cannot prove the allowed-actions
/// settings are unchanged. The returned outcome is `Found` or `Absent`.
pub async fn detect_drift<A: ActionsPolicyApi>(
    reconciler: &PolicyReconciler<A>,
    id: &PolicyId,
    desired: &OrganizationActionsPolicy,
) -> Result<(PolicyPlan, ReadOutcome), ActionsGateError> {
    let outcome = reconciler.read_full(id, None).await?;
    let plan = create_plan(desired, outcome.observed());
    tracing::debug!("Plan for {}: {:?}", id, plan.kind());
    Ok((plan, outcome))
}

/// Build the plan that takes `observed` to `desired`.
///
/// The allowed-actions scope is only compared when the desired policy sets it.
/// The GitHub-owned / verified / patterns triple is always compared because
/// apply always writes it. Patterns compare in order.
pub fn create_plan(
    desired: &OrganizationActionsPolicy,
    observed: Option<&ObservedPolicy>,
) -> PolicyPlan {
    let Some(observed) = observed else {
        return PolicyPlan::new(PlanKind::Create, all_fields(desired));
    };
    let current = &observed.policy;

    let mut changes = Vec::new();

    if desired.enabled_repositories != current.enabled_repositories {
        changes.push(FieldChange::new(
            "enabled_repositories",
            Some(current.enabled_repositories.to_string()),
            desired.enabled_repositories.to_string(),
        ));
    }

    if let Some(allowed) = desired.allowed_actions {
        if current.allowed_actions != Some(allowed) {
            changes.push(FieldChange::new(
                "allowed_actions",
                Some(optional_scope(current)),
                allowed.to_string(),
            ));
        }
    }

    if desired.github_owned_allowed != current.github_owned_allowed {
        changes.push(FieldChange::new(
            "github_owned_allowed",
            Some(current.github_owned_allowed.to_string()),
            desired.github_owned_allowed.to_string(),
        ));
    }

    if desired.verified_allowed != current.verified_allowed {
        changes.push(FieldChange::new(
            "verified_allowed",
            Some(current.verified_allowed.to_string()),
            desired.verified_allowed.to_string(),
        ));
    }

    if desired.patterns_allowed != current.patterns_allowed {
        changes.push(FieldChange::new(
            "patterns_allowed",
            Some(current.patterns_allowed.joined()),
            desired.patterns_allowed.joined(),
        ));
    }

    let kind = if changes.is_empty() {
        PlanKind::NoChange
    } else {
        PlanKind::Update
    };

    PolicyPlan::new(kind, changes)
}

fn optional_scope(policy: &OrganizationActionsPolicy) -> String {
    policy
        .allowed_actions
        .map(|a| a.to_string())
        .unwrap_or_default()
}

fn all_fields(desired: &OrganizationActionsPolicy) -> Vec<FieldChange> {
    let mut changes = vec![FieldChange::new(
        "enabled_repositories",
        None,
        desired.enabled_repositories.to_string(),
    )];
    if desired.allowed_actions.is_some() {
        changes.push(FieldChange::new(
            "allowed_actions",
            None,
            optional_scope(desired),
        ));
    }
    changes.push(FieldChange::new(
        "github_owned_allowed",
        None,
        desired.github_owned_allowed.to_string(),
    ));
    changes.push(FieldChange::new(
        "verified_allowed",
        None,
        desired.verified_allowed.to_string(),
    ));
    changes.push(FieldChange::new(
        "patterns_allowed",
        None,
        desired.patterns_allowed.joined(),
    ));
    changes
}
