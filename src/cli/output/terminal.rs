//! Terminal output formatting

use colored::Colorize;

use super::OutputRenderer;
use crate::actions::{PlanKind, PolicyPlan};
use crate::error::ActionsGateError;
use crate::policy::{ActionsAllowedSnapshot, ObservedPolicy, PolicyId};

pub struct TerminalOutput;

impl TerminalOutput {
    pub fn new() -> Self {
        Self
    }

    fn field(output: &mut String, name: &str, value: &str) {
        output.push_str(&format!("  {:<22} {}\n", name.dimmed(), value));
    }

    fn patterns(value: &str) -> String {
        if value.is_empty() {
            "(none)".dimmed().to_string()
        } else {
            value.to_string()
        }
    }
}

impl Default for TerminalOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputRenderer for TerminalOutput {
    fn render_plan(&self, id: &PolicyId, plan: &PolicyPlan) -> Result<String, ActionsGateError> {
        let mut output = String::new();

        let heading = match plan.kind() {
            PlanKind::Create => "will be written (no remote state known)".yellow(),
            PlanKind::Update => "has drifted".yellow(),
            PlanKind::NoChange => "is up to date".green(),
        };
        output.push_str(&format!("{} {}\n", id.as_str().bold(), heading));

        if plan.is_empty() {
            return Ok(output);
        }

        output.push('\n');
        for change in plan.changes() {
            let line = match change.observed() {
                Some(observed) => format!(
                    "  {} {}: {} {} {}",
                    "~".yellow(),
                    change.field(),
                    Self::patterns(observed).red(),
                    "->".dimmed(),
                    Self::patterns(change.desired()).green()
                ),
                None => format!(
                    "  {} {}: {}",
                    "+".green(),
                    change.field(),
                    Self::patterns(change.desired()).green()
                ),
            };
            output.push_str(&line);
            output.push('\n');
        }

        output.push_str(&format!(
            "\n{}: {} field(s) to change\n",
            "Plan".bold(),
            plan.len()
        ));

        Ok(output)
    }

    fn render_observed(
        &self,
        id: &PolicyId,
        observed: &ObservedPolicy,
        unchanged: bool,
    ) -> Result<String, ActionsGateError> {
        let policy = &observed.policy;
        let mut output = String::new();

        output.push_str(&format!("{}", id.as_str().bold()));
        if unchanged {
            output.push_str(&format!(" {}", "(unchanged since last read)".dimmed()));
        }
        output.push('\n');

        Self::field(
            &mut output,
            "enabled_repositories",
            policy.enabled_repositories.as_str(),
        );
        Self::field(
            &mut output,
            "allowed_actions",
            &policy
                .allowed_actions
                .map(|a| a.to_string())
                .unwrap_or_else(|| "(unset)".dimmed().to_string()),
        );
        Self::field(
            &mut output,
            "github_owned_allowed",
            &policy.github_owned_allowed.to_string(),
        );
        Self::field(
            &mut output,
            "verified_allowed",
            &policy.verified_allowed.to_string(),
        );
        Self::field(
            &mut output,
            "patterns_allowed",
            &Self::patterns(&policy.patterns_allowed.joined()),
        );
        if let Some(etag) = &observed.etag {
            Self::field(&mut output, "etag", etag);
        }

        Ok(output)
    }

    fn render_snapshot(
        &self,
        org: &str,
        snapshot: &ActionsAllowedSnapshot,
    ) -> Result<String, ActionsGateError> {
        let mut output = format!("{} {}\n", "Allowed actions for".bold(), org.bold());

        Self::field(
            &mut output,
            "github_owned_allowed",
            &snapshot.github_owned_allowed.to_string(),
        );
        Self::field(
            &mut output,
            "verified_allowed",
            &snapshot.verified_allowed.to_string(),
        );
        Self::field(
            &mut output,
            "patterns_allowed",
            &Self::patterns(&snapshot.patterns_allowed.joined()),
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::create_plan;
    use crate::policy::{OrganizationActionsPolicy, PatternList};

    #[test]
    fn test_render_up_to_date_plan() {
        colored::control::set_override(false);
        let id = PolicyId::for_organization("acme");
        let desired = OrganizationActionsPolicy::default();
        let observed = ObservedPolicy {
            policy: desired.clone(),
            etag: None,
        };
        let plan = create_plan(&desired, Some(&observed));

        let rendered = TerminalOutput::new().render_plan(&id, &plan).unwrap();
        assert!(rendered.contains("acme/github-allowed-action is up to date"));
    }

    #[test]
    fn test_render_drift_shows_both_values() {
        colored::control::set_override(false);
        let id = PolicyId::for_organization("acme");
        let desired = OrganizationActionsPolicy {
            patterns_allowed: PatternList::new(["foo/*"]),
            ..Default::default()
        };
        let observed = ObservedPolicy {
            policy: OrganizationActionsPolicy::default(),
            etag: None,
        };
        let plan = create_plan(&desired, Some(&observed));

        let rendered = TerminalOutput::new().render_plan(&id, &plan).unwrap();
        assert!(rendered.contains("patterns_allowed: (none) -> foo/*"));
        assert!(rendered.contains("1 field(s) to change"));
    }

    #[test]
    fn test_render_observed_marks_unchanged() {
        colored::control::set_override(false);
        let id = PolicyId::for_organization("acme");
        let observed = ObservedPolicy {
            policy: OrganizationActionsPolicy::default(),
            etag: Some("W/\"rev-1\"".to_string()),
        };

        let rendered = TerminalOutput::new()
            .render_observed(&id, &observed, true)
            .unwrap();
        assert!(rendered.contains("unchanged since last read"));
        assert!(rendered.contains("W/\"rev-1\""));
    }
}
