//! Actions module - Drift planning between the desired and observed policy

pub mod plan;
pub mod planner;

pub use plan::{FieldChange, PlanKind, PolicyPlan};
pub use planner::{create_plan, detect_drift};
