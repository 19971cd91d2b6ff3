//! JSON output formatting

use serde::Serialize;

use super::OutputRenderer;
use crate::actions::{FieldChange, PlanKind, PolicyPlan};
use crate::error::ActionsGateError;
use crate::policy::{ActionsAllowedSnapshot, ObservedPolicy, PolicyId};

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct PlanOutput<'a> {
    version: &'static str,
    id: &'a str,
    organization: &'a str,
    kind: PlanKind,
    changes: &'a [FieldChange],
}

#[derive(Serialize)]
struct ObservedOutput<'a> {
    version: &'static str,
    id: &'a str,
    organization: &'a str,
    unchanged: bool,
    policy: &'a ObservedPolicy,
}

#[derive(Serialize)]
struct SnapshotOutput<'a> {
    version: &'static str,
    organization: &'a str,
    #[serde(flatten)]
    snapshot: &'a ActionsAllowedSnapshot,
}

impl OutputRenderer for JsonOutput {
    fn render_plan(&self, id: &PolicyId, plan: &PolicyPlan) -> Result<String, ActionsGateError> {
        let output = PlanOutput {
            version: env!("CARGO_PKG_VERSION"),
            id: id.as_str(),
            organization: id.organization(),
            kind: plan.kind(),
            changes: plan.changes(),
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }

    fn render_observed(
        &self,
        id: &PolicyId,
        observed: &ObservedPolicy,
        unchanged: bool,
    ) -> Result<String, ActionsGateError> {
        let output = ObservedOutput {
            version: env!("CARGO_PKG_VERSION"),
            id: id.as_str(),
            organization: id.organization(),
            unchanged,
            policy: observed,
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }

    fn render_snapshot(
        &self,
        org: &str,
        snapshot: &ActionsAllowedSnapshot,
    ) -> Result<String, ActionsGateError> {
        let output = SnapshotOutput {
            version: env!("CARGO_PKG_VERSION"),
            organization: org,
            snapshot,
        };
        Ok(serde_json::to_string_pretty(&output)?)
    }
}
