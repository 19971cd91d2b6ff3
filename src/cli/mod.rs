//! # CLI Module
//!
//! This module defines the command-line interface for actionsgate using `clap`.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `init` | Write a configuration file from a preset |
//! | `plan` | Show drift between the configured and the remote policy |
//! | `apply` | Write the configured policy to GitHub |
//! | `show` | Read the full remote policy |
//! | `snapshot` | Read the allowed-actions view only (read scope suffices) |
//! | `import` | Start tracking an existing policy by identifier |
//! | `reset` | Return the policy to "Actions enabled for all repositories" |
//!
//! ## Global Options
//!
//! - `-v, --verbose` - Increase verbosity level (use multiple times: -v, -vv, -vvv)
//! - `--log-json` - Emit logs as JSON
//! - `-c, --config <FILE>` - Path to configuration file
//! - `--org <ORG>` - Organization, overriding `policy.organization`
//!
//! ## Examples
//!
//! ```bash
//! actionsgate init --preset restricted --org acme
//! actionsgate plan
//! actionsgate apply --yes
//! actionsgate snapshot --format json
//! ```

pub mod commands;
pub mod exit_codes;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::{
    ApplyArgs, GenerateManArgs, ImportArgs, InitArgs, PlanArgs, ResetArgs, ShowArgs,
    SnapshotArgs,
};

/// actionsgate - Manage GitHub Actions organization policies declaratively
#[derive(Parser, Debug)]
#[command(name = "actionsgate")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Organization to manage (overrides policy.organization)
    #[arg(long, global = true, env = "ACTIONSGATE_ORG", value_name = "ORG")]
    pub org: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a configuration file from a preset
    Init(InitArgs),

    /// Show drift between the configured and the remote policy
    Plan(PlanArgs),

    /// Write the configured policy to GitHub
    Apply(ApplyArgs),

    /// Read the full remote policy
    Show(ShowArgs),

    /// Read the allowed-actions settings without requiring write access
    Snapshot(SnapshotArgs),

    /// Track an existing policy by identifier (<org>/github-allowed-action)
    Import(ImportArgs),

    /// Reset the policy: Actions enabled for all repositories
    Reset(ResetArgs),

    /// Generate man page (hidden, for packaging)
    #[command(hide = true)]
    GenerateMan(GenerateManArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_org_after_subcommand() {
        let cli = Cli::try_parse_from(["actionsgate", "plan", "--org", "acme"]).unwrap();
        assert_eq!(cli.global.org.as_deref(), Some("acme"));
        assert!(matches!(cli.command, Commands::Plan(_)));
    }
}
