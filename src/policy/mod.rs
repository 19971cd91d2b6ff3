//! Organization Actions policy model
//!
//! The policy is a singleton per organization: it always exists remotely and
//! this crate only ever edits it. Its identifier is derived from the
//! organization name and is never chosen by the caller.

pub mod reconciler;
pub mod validator;

pub use reconciler::{ApplyReport, ApplyStatus, PhaseResult, PolicyReconciler, ReadOutcome};
pub use validator::validate;

use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;
use crate::providers::{deserialize_allowed_actions, ActionsAllowed, ActionsPermissions};

/// Suffix appended to the organization name to form the policy identifier
pub const ID_SUFFIX: &str = "github-allowed-action";

/// Which repositories of the organization may use Actions at all
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnabledRepositories {
    /// Every repository
    #[default]
    All,
    /// Only an explicit list of repositories
    Selected,
    /// No repository
    #[serde(alias = "none")]
    Disabled,
}

impl EnabledRepositories {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Selected => "selected",
            Self::Disabled => "disabled",
        }
    }
}

impl fmt::Display for EnabledRepositories {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnabledRepositories {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "selected" => Ok(Self::Selected),
            "disabled" | "none" => Ok(Self::Disabled),
            other => Err(format!(
                "unknown enabled_repositories value '{}' (expected all, selected or disabled)",
                other
            )),
        }
    }
}

/// Which actions are permitted when Actions is enabled org-wide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowedActions {
    /// Any action
    All,
    /// Only actions defined in a repository of the organization
    LocalOnly,
    /// GitHub-owned, verified and pattern-matched actions, as configured
    Selected,
}

impl AllowedActions {
    /// Wire representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::LocalOnly => "local_only",
            Self::Selected => "selected",
        }
    }
}

impl fmt::Display for AllowedActions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AllowedActions {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(Self::All),
            "local_only" => Ok(Self::LocalOnly),
            "selected" => Ok(Self::Selected),
            other => Err(format!(
                "unknown allowed_actions value '{}' (expected all, local_only or selected)",
                other
            )),
        }
    }
}

/// Ordered list of action patterns.
///
/// Serialized as a single comma-joined string. Deserializes from either that
/// string or a list of strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatternList(Vec<String>);

impl PatternList {
    /// Build a list, dropping blank entries
    pub fn new(patterns: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(
            patterns
                .into_iter()
                .map(|p| p.into().trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
        )
    }

    /// Patterns as a slice
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// Whether the list has no pattern
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Comma-joined form used on the exposed surface
    pub fn joined(&self) -> String {
        self.0.join(",")
    }

    /// Consume into the underlying vector
    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl FromStr for PatternList {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s.split(',')))
    }
}

impl fmt::Display for PatternList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

impl From<Vec<String>> for PatternList {
    fn from(patterns: Vec<String>) -> Self {
        Self::new(patterns)
    }
}

impl Serialize for PatternList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.joined())
    }
}

impl<'de> Deserialize<'de> for PatternList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct PatternListVisitor;

        impl<'de> Visitor<'de> for PatternListVisitor {
            type Value = PatternList;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a comma-separated string or a list of patterns")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
                Ok(PatternList::new(value.split(',')))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut patterns = Vec::new();
                while let Some(pattern) = seq.next_element::<String>()? {
                    patterns.push(pattern);
                }
                Ok(PatternList::new(patterns))
            }
        }

        deserializer.deserialize_any(PatternListVisitor)
    }
}

/// The managed entity: an organization's GitHub Actions policy
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OrganizationActionsPolicy {
    /// Which repositories may use Actions
    pub enabled_repositories: EnabledRepositories,

    /// Scope of permitted actions, only meaningful when all repositories are enabled
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

    /// Additional permitted actions
    #[serde(default)]
    pub patterns_allowed: PatternList,
}

impl OrganizationActionsPolicy {
    /// State the policy returns to on reset
    pub fn reset_state() -> Self {
        Self::default()
    }

    /// Payload for the permissions write
    pub fn permissions(&self) -> ActionsPermissions {
        ActionsPermissions {
            enabled_repositories: self.enabled_repositories,
            allowed_actions: self.allowed_actions,
        }
    }

    /// Payload for the selected-actions write
    pub fn allowed(&self) -> ActionsAllowed {
        ActionsAllowed {
            github_owned_allowed: self.github_owned_allowed,
            verified_allowed: self.verified_allowed,
            patterns_allowed: self.patterns_allowed.as_slice().to_vec(),
        }
    }

    /// Merge the two remote views into one policy
    pub fn from_parts(permissions: ActionsPermissions, allowed: ActionsAllowed) -> Self {
        Self {
            enabled_repositories: permissions.enabled_repositories,
            allowed_actions: permissions.allowed_actions,
            github_owned_allowed: allowed.github_owned_allowed,
            verified_allowed: allowed.verified_allowed,
            patterns_allowed: PatternList::new(allowed.patterns_allowed),
        }
    }
}

/// The policy as last read from the remote, with its freshness token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedPolicy {
    /// Observed field values
    #[serde(flatten)]
    pub policy: OrganizationActionsPolicy,

    /// Opaque token to make the next read conditional
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub etag: Option<String>,
}

/// Read-only view of the allowed-actions settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionsAllowedSnapshot {
    /// Whether GitHub-authored actions are permitted
    pub github_owned_allowed: bool,
    /// Whether actions from verified creators are permitted
    pub verified_allowed: bool,
    /// Additional permitted actions
    pub patterns_allowed: PatternList,
}

impl From<ActionsAllowed> for ActionsAllowedSnapshot {
    fn from(allowed: ActionsAllowed) -> Self {
        Self {
            github_owned_allowed: allowed.github_owned_allowed,
            verified_allowed: allowed.verified_allowed,
            patterns_allowed: PatternList::new(allowed.patterns_allowed),
        }
    }
}

/// Identifier of an organization's policy: `<org>/github-allowed-action`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PolicyId {
    id: String,
    org_len: usize,
}

impl PolicyId {
    /// Derive the identifier for an organization
    pub fn for_organization(org: &str) -> Self {
        Self {
            id: format!("{}/{}", org, ID_SUFFIX),
            org_len: org.len(),
        }
    }

    /// Parse an identifier; the organization is everything before the first `/`
    pub fn parse(id: &str) -> Result<Self, ConfigError> {
        let org = id.split('/').next().unwrap_or_default();
        if org.trim().is_empty() {
            return Err(ConfigError::InvalidIdentifier { id: id.to_string() });
        }
        Ok(Self {
            id: id.to_string(),
            org_len: org.len(),
        })
    }

    /// Organization the policy belongs to
    pub fn organization(&self) -> &str {
        &self.id[..self.org_len]
    }

    /// The identifier string
    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for PolicyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl TryFrom<String> for PolicyId {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PolicyId> for String {
    fn from(id: PolicyId) -> Self {
        id.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_identifier_derivation() {
        let id = PolicyId::for_organization("acme");
        assert_eq!(id.as_str(), "acme/github-allowed-action");
        assert_eq!(id.organization(), "acme");
    }

    #[test]
    fn test_identifier_derivation_is_deterministic() {
        for org in ["acme", "my-org", "Org_2", "a"] {
            let id = PolicyId::for_organization(org);
            assert_eq!(id.to_string(), format!("{}/github-allowed-action", org));
            assert_eq!(id, PolicyId::for_organization(org));
        }
    }

    #[test]
    fn test_identifier_parse_takes_prefix() {
        let id = PolicyId::parse("acme/github-allowed-action").unwrap();
        assert_eq!(id.organization(), "acme");

        let bare = PolicyId::parse("acme").unwrap();
        assert_eq!(bare.organization(), "acme");
    }

    #[test]
    fn test_identifier_parse_rejects_empty_org() {
        assert!(PolicyId::parse("").is_err());
        assert!(PolicyId::parse("/github-allowed-action").is_err());
    }

    #[test]
    fn test_enum_round_trip_strings() {
        assert_eq!("local_only".parse::<AllowedActions>(), Ok(AllowedActions::LocalOnly));
        assert_eq!(AllowedActions::LocalOnly.to_string(), "local_only");
        assert_eq!(
            "disabled".parse::<EnabledRepositories>(),
            Ok(EnabledRepositories::Disabled)
        );
        assert!("Selected".parse::<EnabledRepositories>().is_err());
    }

    #[test]
    fn test_pattern_list_parsing() {
        let patterns: PatternList = "foo/*, bar/baz@v1 ,,".parse().unwrap();
        assert_eq!(patterns.as_slice(), ["foo/*", "bar/baz@v1"]);
        assert_eq!(patterns.joined(), "foo/*,bar/baz@v1");

        let empty: PatternList = "".parse().unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_pattern_list_deserializes_from_string_or_list() {
        #[derive(Deserialize)]
        struct Holder {
            patterns: PatternList,
        }

        let from_string: Holder = toml::from_str(r#"patterns = "a/*,b/*""#).unwrap();
        let from_list: Holder = toml::from_str(r#"patterns = ["a/*", "b/*"]"#).unwrap();
        assert_eq!(from_string.patterns, from_list.patterns);
    }

    #[test]
    fn test_policy_parts_round_trip() {
        let policy = OrganizationActionsPolicy {
            enabled_repositories: EnabledRepositories::All,
            allowed_actions: Some(AllowedActions::Selected),
            github_owned_allowed: true,
            verified_allowed: false,
            patterns_allowed: PatternList::new(["foo/*"]),
        };
        let merged = OrganizationActionsPolicy::from_parts(policy.permissions(), policy.allowed());
        assert_eq!(merged, policy);
    }

    #[test]
    fn test_observed_policy_serializes_flat() {
        let observed = ObservedPolicy {
            policy: OrganizationActionsPolicy::default(),
            etag: Some("\"abc\"".to_string()),
        };
        let value = serde_json::to_value(&observed).unwrap();
        assert_eq!(value["enabled_repositories"], "all");
        assert_eq!(value["patterns_allowed"], "");
        assert_eq!(value["etag"], "\"abc\"");
    }
}
