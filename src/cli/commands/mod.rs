//! CLI commands module

pub mod apply;
pub mod generate_man;
pub mod import;
pub mod init;
pub mod plan;
pub mod reset;
pub mod show;
pub mod snapshot;

use clap::Args;
use std::path::{Path, PathBuf};

use super::exit_codes;
use super::output::{JsonOutput, OutputRenderer, TerminalOutput};
use super::GlobalArgs;
use crate::config::Config;
use crate::error::{ActionsGateError, ConfigError};
use crate::policy::PolicyReconciler;
use crate::providers::github::GitHubRestClient;
use crate::state::StateStore;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Preset to use (permissive, restricted, local-only, disabled)
    #[arg(short, long, value_name = "PRESET")]
    pub preset: Option<String>,

    /// Force overwrite existing configuration
    #[arg(short, long)]
    pub force: bool,

    /// Skip interactive prompts
    #[arg(long)]
    pub non_interactive: bool,

    /// Skip prerequisite checks (token, API URL, gh)
    #[arg(long)]
    pub skip_checks: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    /// Output format
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Arguments for the apply command
#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Skip confirmation prompts
    #[arg(short, long)]
    pub yes: bool,

    /// Dry run - show what would be done without making changes
    #[arg(long)]
    pub dry_run: bool,

    /// Write the policy even when no drift is detected
    #[arg(long)]
    pub force: bool,
}

/// Arguments for the show command
#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Output format
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,

    /// Ignore the stored freshness token and always read everything
    #[arg(long)]
    pub refresh: bool,
}

/// Arguments for the snapshot command
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    /// Output format
    #[arg(short, long, default_value = "terminal")]
    pub format: OutputFormat,
}

/// Arguments for the import command
#[derive(Args, Debug)]
pub struct ImportArgs {
    /// Policy identifier, e.g. acme/github-allowed-action
    #[arg(value_name = "ID")]
    pub id: String,
}

/// Arguments for the reset command
#[derive(Args, Debug)]
pub struct ResetArgs {
    /// Skip confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for the generate-man command
#[derive(Args, Debug)]
pub struct GenerateManArgs {
    /// Output directory for the man page
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub output: PathBuf,
}

/// Output format for read commands
#[derive(Debug, Clone, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

impl OutputFormat {
    /// Renderer for this format
    pub fn renderer(&self) -> Box<dyn OutputRenderer> {
        match self {
            OutputFormat::Terminal => Box::new(TerminalOutput::new()),
            OutputFormat::Json => Box::new(JsonOutput::new()),
        }
    }
}

/// Configuration and state shared by the remote-facing commands
pub struct CommandContext {
    /// Loaded configuration, organization override applied
    pub config: Config,
    /// State file for this working directory
    pub state: StateStore,
}

impl CommandContext {
    /// Load configuration and state for the current directory
    pub fn load(global: &GlobalArgs) -> Result<Self, ActionsGateError> {
        let config = Config::load(global.config.as_deref())?.with_organization(global.org.clone());
        let state = StateStore::new(Path::new("."), &config.state);
        Ok(Self { config, state })
    }

    /// The organization being managed
    pub fn organization(&self) -> Result<&str, ConfigError> {
        self.config.policy.organization()
    }

    /// Reconciler talking to the configured GitHub API
    pub fn reconciler(&self) -> Result<PolicyReconciler<GitHubRestClient>, ActionsGateError> {
        let client = GitHubRestClient::from_config(&self.config.github)?;
        Ok(PolicyReconciler::new(client))
    }
}

/// Exit code for a command that failed with `err`
pub fn exit_code_for(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ActionsGateError>() {
        Some(ActionsGateError::Constraint(_)) | Some(ActionsGateError::Config(_)) => {
            exit_codes::INVALID_CONFIG
        }
        Some(ActionsGateError::PartialApply { .. }) => exit_codes::PARTIAL_APPLY,
        _ => exit_codes::ERROR,
    }
}
