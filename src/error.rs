//! Error types for actionsgate
//!
//! This module defines custom error types using `thiserror`. Every failure the
//! reconciliation core can produce is one of the variants of [`ActionsGateError`],
//! so callers can tell a rejected desired state apart from a remote failure or a
//! half-applied write without inspecting message text.

use std::fmt;
use thiserror::Error;

/// Main error type for actionsgate
#[derive(Error, Debug)]
pub enum ActionsGateError {
    /// The desired state violates a cross-field constraint
    #[error("Invalid policy: {0}")]
    Constraint(#[from] ConstraintError),

    /// A remote API call failed
    #[error("GitHub API error: {0}")]
    Transport(#[from] TransportError),

    /// The permissions write succeeded but the allowed-actions write failed
    #[error(
        "Policy partially applied: repository permissions were updated but allowed actions were not ({source}). Re-run apply to converge."
    )]
    PartialApply {
        /// The error returned by the second write
        source: TransportError,
    },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// State file errors
    #[error("State error: {0}")]
    State(#[from] StateError),

    /// Provider setup errors
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Failed to render command output
    #[error("Failed to render output: {0}")]
    Render(#[from] serde_json::Error),
}

impl ActionsGateError {
    /// HTTP status carried by the underlying transport error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport(e) | Self::PartialApply { source: e } => e.status,
            _ => None,
        }
    }
}

/// Desired-state combinations that the remote would accept but that have no
/// defined meaning
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConstraintError {
    /// Allowed actions were set while Actions is limited to selected repositories
    #[error(
        "allowed actions cannot be set when Actions is only enabled for selected repositories"
    )]
    AllowedActionsWithSelectedRepositories,

    /// Allowed actions were set while Actions is disabled
    #[error("allowed actions cannot be set when Actions is disabled for repositories")]
    AllowedActionsWithDisabledRepositories,
}

/// A failed remote call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportError {
    /// HTTP status code, `None` when no response was received
    pub status: Option<u16>,
    /// Message returned by the API or produced by the client
    pub message: String,
}

impl TransportError {
    /// Status reported when the resource is unchanged since the freshness token
    pub const NOT_MODIFIED: u16 = 304;
    /// Status reported when the policy record does not exist
    pub const NOT_FOUND: u16 = 404;

    /// Create an error for an HTTP response with the given status
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            message: message.into(),
        }
    }

    /// Create an error for a request that never produced a response
    pub fn connection(message: impl Into<String>) -> Self {
        Self {
            status: None,
            message: message.into(),
        }
    }

    /// Whether the remote reported "not modified"
    pub fn is_not_modified(&self) -> bool {
        self.status == Some(Self::NOT_MODIFIED)
    }

    /// Whether the remote reported "not found"
    pub fn is_not_found(&self) -> bool {
        self.status == Some(Self::NOT_FOUND)
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "HTTP {}: {}", status, self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for TransportError {}

/// Errors related to configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read configuration file
    #[error("Failed to read config file '{path}': {source}")]
    FileRead {
        /// Path to the configuration file
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to parse configuration
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parser message
        message: String,
    },

    /// Failed to serialize configuration
    #[error("Failed to serialize config: {message}")]
    Serialize {
        /// Serializer message
        message: String,
    },

    /// No organization configured or passed on the command line
    #[error("No organization configured. Set policy.organization or pass --org")]
    MissingOrganization,

    /// The configured API URL is not usable
    #[error("Invalid API URL '{url}': {message}")]
    InvalidApiUrl {
        /// The configured URL
        url: String,
        /// Why it was rejected
        message: String,
    },

    /// A policy identifier could not be parsed
    #[error("Invalid policy identifier '{id}': expected '<org>/github-allowed-action'")]
    InvalidIdentifier {
        /// The offending identifier
        id: String,
    },

    /// Unknown preset name
    #[error("Unknown preset '{name}'. Valid presets: permissive, restricted, local-only, disabled")]
    UnknownPreset {
        /// The name that was given
        name: String,
    },
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse {
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ConfigError {
    fn from(err: toml::ser::Error) -> Self {
        ConfigError::Serialize {
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ActionsGateError {
    fn from(err: toml::de::Error) -> Self {
        ActionsGateError::Config(err.into())
    }
}

impl From<toml::ser::Error> for ActionsGateError {
    fn from(err: toml::ser::Error) -> Self {
        ActionsGateError::Config(err.into())
    }
}

/// Errors related to the local state file
#[derive(Error, Debug)]
pub enum StateError {
    /// Failed to create the state directory
    #[error("Failed to create directory '{path}': {source}")]
    DirectoryCreate {
        /// Directory path
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to write the state file
    #[error("Failed to write '{path}': {source}")]
    FileWrite {
        /// File path
        path: String,
        /// The underlying I/O error
        source: std::io::Error,
    },

    /// Failed to serialize state
    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors raised while setting up the GitHub provider
#[derive(Error, Debug)]
pub enum ProviderError {
    /// No token found in the environment or through the GitHub CLI
    #[error(
        "No GitHub token found. Set {env_var} or GH_TOKEN, or authenticate with 'gh auth login'"
    )]
    MissingToken {
        /// Environment variable that was checked first
        env_var: String,
    },

    /// Command execution failed
    #[error("Command failed: {command}")]
    CommandFailed {
        /// The command that failed
        command: String,
    },

    /// Building the HTTP client failed
    #[error("Failed to build HTTP client: {message}")]
    ClientBuild {
        /// Underlying message
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display_with_status() {
        let err = TransportError::http(404, "Not Found");
        assert_eq!(err.to_string(), "HTTP 404: Not Found");
        assert!(err.is_not_found());
        assert!(!err.is_not_modified());
    }

    #[test]
    fn test_transport_error_display_without_status() {
        let err = TransportError::connection("connection refused");
        assert_eq!(err.to_string(), "connection refused");
        assert_eq!(err.status, None);
    }

    #[test]
    fn test_status_is_exposed_for_partial_apply() {
        let err = ActionsGateError::PartialApply {
            source: TransportError::http(409, "Conflict"),
        };
        assert_eq!(err.status(), Some(409));
        assert!(err.to_string().contains("Re-run apply"));
    }

    #[test]
    fn test_constraint_error_messages() {
        assert!(ConstraintError::AllowedActionsWithSelectedRepositories
            .to_string()
            .contains("selected repositories"));
        assert!(ConstraintError::AllowedActionsWithDisabledRepositories
            .to_string()
            .contains("disabled"));
    }
}
