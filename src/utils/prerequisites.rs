//! Prerequisites checking
//!
//! Verifies that a GitHub token can be found and that the API base URL is
//! usable before `init` writes a configuration that depends on them.

use colored::Colorize;
use std::process::Command;

use crate::config::GitHubConfig;
use crate::providers::github::{parse_api_url, resolve_token};

/// Level of importance for a prerequisite check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckLevel {
    /// Required for operation - failure blocks execution
    Required,
    /// Optional - failure generates a warning
    Optional,
}

/// Status of a prerequisite check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    /// Check passed successfully
    Ok,
    /// Check failed
    Failed,
}

/// Result of a single prerequisite check
#[derive(Debug, Clone)]
pub struct CheckResult {
    /// Name of the check
    pub name: String,
    /// Whether this check is required or optional
    pub level: CheckLevel,
    /// Status of the check
    pub status: CheckStatus,
    /// Suggested fix for the issue
    pub fix: Option<String>,
}

impl CheckResult {
    /// Create a successful check result
    pub fn ok(name: &str, level: CheckLevel) -> Self {
        Self {
            name: name.to_string(),
            level,
            status: CheckStatus::Ok,
            fix: None,
        }
    }

    /// Create a failed check result
    pub fn failed(name: &str, level: CheckLevel, fix: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            level,
            status: CheckStatus::Failed,
            fix: Some(fix.into()),
        }
    }

    /// Check if this is a required check that failed
    pub fn is_required_failure(&self) -> bool {
        self.level == CheckLevel::Required && self.status == CheckStatus::Failed
    }
}

/// Aggregated report of all prerequisite checks
#[derive(Debug, Clone, Default)]
pub struct PrerequisitesReport {
    /// All check results
    pub checks: Vec<CheckResult>,
}

impl PrerequisitesReport {
    /// Check if all required checks passed
    pub fn all_required_passed(&self) -> bool {
        !self.checks.iter().any(|c| c.is_required_failure())
    }
}

/// Check that the API base URL parses
pub fn check_api_url(config: &GitHubConfig) -> CheckResult {
    match parse_api_url(&config.api_url) {
        Ok(_) => CheckResult::ok("API URL valid", CheckLevel::Required),
        Err(e) => CheckResult::failed("API URL valid", CheckLevel::Required, e.to_string()),
    }
}

/// Check that a token can be resolved
pub fn check_token(config: &GitHubConfig) -> CheckResult {
    match resolve_token(&config.token_env) {
        Ok(_) => CheckResult::ok("GitHub token available", CheckLevel::Required),
        Err(_) => CheckResult::failed(
            "GitHub token available",
            CheckLevel::Required,
            format!("Export {} or run: gh auth login", config.token_env),
        ),
    }
}

/// Check if GitHub CLI (gh) is installed
pub fn check_gh_installed() -> CheckResult {
    let output = Command::new("gh").arg("--version").output();

    match output {
        Ok(o) if o.status.success() => {
            CheckResult::ok("GitHub CLI installed", CheckLevel::Optional)
        }
        _ => CheckResult::failed(
            "GitHub CLI installed",
            CheckLevel::Optional,
            "Install gh: https://cli.github.com/",
        ),
    }
}

/// Run all prerequisite checks
pub fn run_all_checks(config: &GitHubConfig) -> PrerequisitesReport {
    PrerequisitesReport {
        checks: vec![
            check_api_url(config),
            check_token(config),
            check_gh_installed(),
        ],
    }
}

/// Display the full prerequisites report
pub fn display_report(report: &PrerequisitesReport) {
    println!("{}\n", "Checking prerequisites...".bold());

    for check in &report.checks {
        let (icon, name) = match (check.status, check.level) {
            (CheckStatus::Ok, _) => ("✓".green(), check.name.normal()),
            (CheckStatus::Failed, CheckLevel::Required) => ("✗".red(), check.name.red()),
            (CheckStatus::Failed, CheckLevel::Optional) => ("!".yellow(), check.name.yellow()),
        };

        let suffix = if check.status == CheckStatus::Failed && check.level == CheckLevel::Optional
        {
            " (optional)".dimmed().to_string()
        } else {
            String::new()
        };

        println!("  {} {}{}", icon, name, suffix);

        if let Some(fix) = &check.fix {
            println!("    {}: {}", "Fix".cyan(), fix);
        }
    }

    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_with_optional_failure_passes() {
        let report = PrerequisitesReport {
            checks: vec![
                CheckResult::ok("a", CheckLevel::Required),
                CheckResult::failed("b", CheckLevel::Optional, "fix b"),
            ],
        };
        assert!(report.all_required_passed());
    }

    #[test]
    fn test_report_with_required_failure_fails() {
        let report = PrerequisitesReport {
            checks: vec![CheckResult::failed("a", CheckLevel::Required, "fix a")],
        };
        assert!(!report.all_required_passed());
    }

    #[test]
    fn test_check_api_url() {
        let good = GitHubConfig::default();
        assert_eq!(check_api_url(&good).status, CheckStatus::Ok);

        let bad = GitHubConfig {
            api_url: "nope".to_string(),
            ..GitHubConfig::default()
        };
        let result = check_api_url(&bad);
        assert!(result.is_required_failure());
        assert!(result.fix.is_some());
    }
}
