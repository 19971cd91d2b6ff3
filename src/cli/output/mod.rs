//! Output formatting module for CLI

pub mod json;
mod terminal;

pub use json::JsonOutput;
pub use terminal::TerminalOutput;

use crate::actions::PolicyPlan;
use crate::error::ActionsGateError;
use crate::policy::{ActionsAllowedSnapshot, ObservedPolicy, PolicyId};

/// Renders command results for display
pub trait OutputRenderer {
    /// Render a drift plan
    fn render_plan(&self, id: &PolicyId, plan: &PolicyPlan) -> Result<String, ActionsGateError>;

    /// Render an observed policy; `unchanged` when served from the freshness token
    fn render_observed(
        &self,
        id: &PolicyId,
        observed: &ObservedPolicy,
        unchanged: bool,
    ) -> Result<String, ActionsGateError>;

    /// Render the read-only allowed-actions view
    fn render_snapshot(
        &self,
        org: &str,
        snapshot: &ActionsAllowedSnapshot,
    ) -> Result<String, ActionsGateError>;
}
