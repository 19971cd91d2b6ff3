//! Policy plan structures

use serde::Serialize;

/// What applying the desired policy would do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanKind {
    /// Nothing is known about the remote yet; every field will be written
    Create,
    /// Some fields differ from the remote
    Update,
    /// The remote already matches
    NoChange,
}

/// A single field whose observed value differs from the desired one
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldChange {
    /// Field name as it appears in configuration
    field: &'static str,
    /// Observed value, `None` when nothing has been observed
    observed: Option<String>,
    /// Desired value
    desired: String,
}

impl FieldChange {
    /// Create a new field change
    pub fn new(field: &'static str, observed: Option<String>, desired: impl Into<String>) -> Self {
        Self {
            field,
            observed,
            desired: desired.into(),
        }
    }

    /// Get the field name
    pub fn field(&self) -> &'static str {
        self.field
    }

    /// Get the observed value
    pub fn observed(&self) -> Option<&str> {
        self.observed.as_deref()
    }

    /// Get the desired value
    pub fn desired(&self) -> &str {
        &self.desired
    }
}

/// The changes needed to bring the remote to the desired policy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyPlan {
    kind: PlanKind,
    changes: Vec<FieldChange>,
}

impl PolicyPlan {
    /// Create a plan
    pub fn new(kind: PlanKind, changes: Vec<FieldChange>) -> Self {
        Self { kind, changes }
    }

    /// Get the plan kind
    pub fn kind(&self) -> PlanKind {
        self.kind
    }

    /// Get all changes
    pub fn changes(&self) -> &[FieldChange] {
        &self.changes
    }

    /// Whether the remote drifted from (or has never been set to) the desired policy
    pub fn has_changes(&self) -> bool {
        self.kind != PlanKind::NoChange
    }

    /// Get the number of changes
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Check if the plan has no change
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}
