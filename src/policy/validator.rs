//! Cross-field checks on a desired policy
//!
//! GitHub accepts an allowed-actions scope alongside any enablement value, but
//! the scope only has a defined meaning when every repository is enabled.
//! These combinations are rejected before anything is written.

use super::{EnabledRepositories, OrganizationActionsPolicy};
use crate::error::ConstraintError;

/// Check a desired policy. Rules are evaluated in order; the first failure wins.
pub fn validate(desired: &OrganizationActionsPolicy) -> Result<(), ConstraintError> {
    if desired.allowed_actions.is_none() {
        return Ok(());
    }

    match desired.enabled_repositories {
        EnabledRepositories::Selected => {
            Err(ConstraintError::AllowedActionsWithSelectedRepositories)
        }
        EnabledRepositories::Disabled => {
            Err(ConstraintError::AllowedActionsWithDisabledRepositories)
        }
        EnabledRepositories::All => Ok(()),
    }
}
