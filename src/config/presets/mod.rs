//! Preset policies for common setups

use crate::policy::{AllowedActions, EnabledRepositories, OrganizationActionsPolicy, PatternList};

/// Available presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// GitHub's own default - every repository, every action
    Permissive,
    /// Every repository, only GitHub-owned and verified-creator actions
    Restricted,
    /// Every repository, only actions defined inside the organization
    LocalOnly,
    /// Actions turned off for the whole organization
    Disabled,
}

impl Preset {
    /// All presets, in the order they are offered interactively
    pub const ALL: [Preset; 4] = [
        Preset::Permissive,
        Preset::Restricted,
        Preset::LocalOnly,
        Preset::Disabled,
    ];

    /// Get preset from name
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "permissive" | "default" | "all" => Some(Self::Permissive),
            "restricted" | "verified" => Some(Self::Restricted),
            "local-only" | "local_only" | "local" => Some(Self::LocalOnly),
            "disabled" | "off" => Some(Self::Disabled),
            _ => None,
        }
    }

    /// Get the name of the preset
    pub fn name(&self) -> &'static str {
        match self {
            Self::Permissive => "permissive",
            Self::Restricted => "restricted",
            Self::LocalOnly => "local-only",
            Self::Disabled => "disabled",
        }
    }

    /// Get a description of the preset
    pub fn description(&self) -> &'static str {
        match self {
            Self::Permissive => "Permissive - all repositories may run any action",
            Self::Restricted => "Restricted - only GitHub-owned and verified actions",
            Self::LocalOnly => "Local only - only actions defined in the organization",
            Self::Disabled => "Disabled - no repository may run Actions",
        }
    }

    /// The desired policy for this preset
    pub fn policy(&self) -> OrganizationActionsPolicy {
        match self {
            Self::Permissive => OrganizationActionsPolicy {
                enabled_repositories: EnabledRepositories::All,
                allowed_actions: Some(AllowedActions::All),
                ..Default::default()
            },
            Self::Restricted => OrganizationActionsPolicy {
                enabled_repositories: EnabledRepositories::All,
                allowed_actions: Some(AllowedActions::Selected),
                github_owned_allowed: true,
                verified_allowed: true,
                patterns_allowed: PatternList::default(),
            },
            Self::LocalOnly => OrganizationActionsPolicy {
                enabled_repositories: EnabledRepositories::All,
                allowed_actions: Some(AllowedActions::LocalOnly),
                ..Default::default()
            },
            Self::Disabled => OrganizationActionsPolicy {
                enabled_repositories: EnabledRepositories::Disabled,
                ..Default::default()
            },
        }
    }
}
