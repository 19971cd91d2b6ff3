//! Configuration loader

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ActionsGateError, ConfigError};

use super::presets::Preset;
use super::{GitHubConfig, PolicyConfig, StateConfig};

/// Default configuration file name, looked up in the working directory
pub const CONFIG_FILENAME: &str = ".actionsgate.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Preset the file was generated from, informational only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<String>,

    /// GitHub API settings
    #[serde(default)]
    pub github: GitHubConfig,

    /// Desired policy
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Local state settings
    #[serde(default)]
    pub state: StateConfig,
}

impl Config {
    /// Load configuration from file or return default
    pub fn load_or_default() -> Result<Self, ActionsGateError> {
        let config_path = Path::new(CONFIG_FILENAME);

        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            tracing::debug!("No {} found, using defaults", CONFIG_FILENAME);
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ActionsGateError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content)?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load from an explicit path when given, otherwise the default file
    pub fn load(path: Option<&Path>) -> Result<Self, ActionsGateError> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => Self::load_or_default(),
        }
    }

    /// Create a new configuration from a preset
    pub fn from_preset(preset: Preset, organization: Option<String>) -> Self {
        let mut config = Self {
            preset: Some(preset.name().to_string()),
            ..Default::default()
        };
        config.policy.organization = organization;
        config.policy.set_desired(preset.policy());
        config
    }

    /// Override the organization (command line / environment)
    pub fn with_organization(mut self, organization: Option<String>) -> Self {
        if let Some(org) = organization {
            self.policy.organization = Some(org);
        }
        self
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ActionsGateError> {
        toml::to_string_pretty(self).map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::{AllowedActions, EnabledRepositories};
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
        assert_eq!(config.state.directory, ".actionsgate");
        assert!(config.policy.organization().is_err());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
preset = "restricted"

[github]
api_url = "https://ghe.example.com/api/v3"
timeout_secs = 10

[policy]
organization = "acme"
enabled_repositories = "all"
allowed_actions = "selected"
github_owned_allowed = true
verified_allowed = true
patterns_allowed = "foo/*,bar/*"
"#;
        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.github.timeout_secs, 10);
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
        assert_eq!(config.policy.organization().unwrap(), "acme");

        let desired = config.policy.desired();
        assert_eq!(desired.allowed_actions, Some(AllowedActions::Selected));
        assert_eq!(desired.patterns_allowed.as_slice(), ["foo/*", "bar/*"]);
    }

    #[test]
    fn test_empty_allowed_actions_means_unset() {
        let config: Config = toml::from_str(
            r#"
[policy]
enabled_repositories = "disabled"
allowed_actions = ""
"#,
        )
        .unwrap();
        assert_eq!(
            config.policy.enabled_repositories,
            EnabledRepositories::Disabled
        );
        assert_eq!(config.policy.allowed_actions, None);
    }

    #[test]
    fn test_unknown_enum_value_is_rejected() {
        let result: Result<Config, _> = toml::from_str(
            r#"
[policy]
enabled_repositories = "some"
"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_organization_override() {
        let config = Config::default().with_organization(Some("override".to_string()));
        assert_eq!(config.policy.organization().unwrap(), "override");

        let blank = Config::default().with_organization(Some("  ".to_string()));
        assert!(blank.policy.organization().is_err());
    }

    #[test]
    fn test_preset_round_trips_through_toml() {
        let config = Config::from_preset(Preset::Restricted, Some("acme".to_string()));
        let content = config.to_toml().unwrap();
        assert!(content.contains("preset = \"restricted\""));
        assert!(content.contains("organization = \"acme\""));

        let parsed: Config = toml::from_str(&content).unwrap();
        assert_eq!(parsed.policy.desired(), Preset::Restricted.policy());
    }

    #[test]
    fn test_load_from_file_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.toml");
        let err = Config::load_from_file(&missing).unwrap_err();
        assert!(err.to_string().contains("missing.toml"));
    }
}
