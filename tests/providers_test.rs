//! Tests for provider payloads and helpers

use actionsgate::config::GitHubConfig;
use actionsgate::policy::{AllowedActions, EnabledRepositories};
use actionsgate::providers::github::{parse_api_url, GitHubRestClient};
use actionsgate::providers::{ActionsAllowed, ActionsPermissions};

#[test]
fn test_permissions_deserialize_from_api_response() {
    let json = r#"{
        "enabled_repositories": "all",
        "allowed_actions": "selected",
        "selected_actions_url": "https://api.github.com/organizations/42/actions/permissions/selected-actions"
    }"#;

    let permissions: ActionsPermissions = serde_json::from_str(json).unwrap();
    assert_eq!(permissions.enabled_repositories, EnabledRepositories::All);
    assert_eq!(permissions.allowed_actions, Some(AllowedActions::Selected));
}

#[test]
fn test_permissions_without_allowed_actions() {
    let json = r#"{ "enabled_repositories": "none" }"#;
    let permissions: ActionsPermissions = serde_json::from_str(json).unwrap();
    assert_eq!(permissions.enabled_repositories, EnabledRepositories::Disabled);

    let json = r#"{ "enabled_repositories": "disabled" }"#;
    let permissions: ActionsPermissions = serde_json::from_str(json).unwrap();
    assert_eq!(permissions.enabled_repositories, EnabledRepositories::Disabled);
    assert_eq!(permissions.allowed_actions, None);
}

#[test]
fn test_permissions_serialize_omits_unset_scope() {
    let permissions = ActionsPermissions {
        enabled_repositories: EnabledRepositories::Selected,
        allowed_actions: None,
    };

    let value = serde_json::to_value(&permissions).unwrap();
    assert_eq!(value, serde_json::json!({ "enabled_repositories": "selected" }));
}

#[test]
fn test_allowed_actions_deserialize() {
    let json = r#"{
        "github_owned_allowed": true,
        "verified_allowed": false,
        "patterns_allowed": ["monalisa/octocat@*", "docker/*"]
    }"#;

    let allowed: ActionsAllowed = serde_json::from_str(json).unwrap();
    assert!(allowed.github_owned_allowed);
    assert!(!allowed.verified_allowed);
    assert_eq!(allowed.patterns_allowed, vec!["monalisa/octocat@*", "docker/*"]);
}

#[test]
fn test_allowed_actions_missing_fields_default() {
    let allowed: ActionsAllowed = serde_json::from_str("{}").unwrap();
    assert_eq!(allowed, ActionsAllowed::default());
}

#[test]
fn test_parse_api_url_for_enterprise_host() {
    let url = parse_api_url("https://github.example.com/api/v3").unwrap();
    assert_eq!(url.host_str(), Some("github.example.com"));
    assert_eq!(url.path(), "/api/v3");
}

#[test]
fn test_client_builds_with_explicit_token() {
    let config = GitHubConfig::default();
    assert!(GitHubRestClient::new(&config, "ghp_test".to_string()).is_ok());
}

#[test]
fn test_client_rejects_bad_api_url() {
    let config = GitHubConfig {
        api_url: "ftp://example.com".to_string(),
        ..Default::default()
    };
    assert!(GitHubRestClient::new(&config, "ghp_test".to_string()).is_err());
}
