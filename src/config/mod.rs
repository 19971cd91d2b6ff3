//! Configuration module

pub mod loader;
pub mod presets;

pub use loader::Config;
pub use presets::Preset;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::policy::{AllowedActions, EnabledRepositories, OrganizationActionsPolicy, PatternList};
use crate::providers::deserialize_allowed_actions;

const DEFAULT_API_URL: &str = "https://api.github.com";
const DEFAULT_TOKEN_ENV: &str = "GITHUB_TOKEN";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STATE_DIR: &str = ".actionsgate";

/// GitHub API connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Base URL of the REST API (GitHub Enterprise: `https://<host>/api/v3`)
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Environment variable holding the token
    #[serde(default = "default_token_env")]
    pub token_env: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// User-Agent override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl GitHubConfig {
    /// User-Agent sent with every request
    pub fn user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(|| format!("actionsgate/{}", env!("CARGO_PKG_VERSION")))
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_token_env() -> String {
    DEFAULT_TOKEN_ENV.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Desired Actions policy for one organization
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PolicyConfig {
    /// Organization the policy applies to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization: Option<String>,

    /// Which repositories may use Actions (all, selected, disabled)
    #[serde(default)]
    pub enabled_repositories: EnabledRepositories,

    /// Which actions are permitted (all, local_only, selected)
    #[serde(
        default,
        deserialize_with = "deserialize_allowed_actions",
        skip_serializing_if = "Option::is_none"
    )]
    pub allowed_actions: Option<AllowedActions>,

    /// Whether GitHub-authored actions are permitted
    #[serde(default)]
    pub github_owned_allowed: bool,

    /// Whether actions from verified creators are permitted
    #[serde(default)]
    pub verified_allowed: bool,

    /// Additional permitted actions, comma-separated or as a list
    #[serde(default)]
    pub patterns_allowed: PatternList,
}

impl PolicyConfig {
    /// The desired policy described by this section
    pub fn desired(&self) -> OrganizationActionsPolicy {
        OrganizationActionsPolicy {
            enabled_repositories: self.enabled_repositories,
            allowed_actions: self.allowed_actions,
            github_owned_allowed: self.github_owned_allowed,
            verified_allowed: self.verified_allowed,
            patterns_allowed: self.patterns_allowed.clone(),
        }
    }

    /// Replace the desired fields, keeping the organization
    pub fn set_desired(&mut self, policy: OrganizationActionsPolicy) {
        self.enabled_repositories = policy.enabled_repositories;
        self.allowed_actions = policy.allowed_actions;
        self.github_owned_allowed = policy.github_owned_allowed;
        self.verified_allowed = policy.verified_allowed;
        self.patterns_allowed = policy.patterns_allowed;
    }

    /// The configured organization, or an error when none is set
    pub fn organization(&self) -> Result<&str, ConfigError> {
        self.organization
            .as_deref()
            .map(str::trim)
            .filter(|org| !org.is_empty())
            .ok_or(ConfigError::MissingOrganization)
    }
}

/// Local state file settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Directory holding `state.json` (relative to the working directory,
    /// absolute, or starting with `~`)
    #[serde(default = "default_state_dir")]
    pub directory: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            directory: DEFAULT_STATE_DIR.to_string(),
        }
    }
}

fn default_state_dir() -> String {
    DEFAULT_STATE_DIR.to_string()
}
