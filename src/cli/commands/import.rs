//! Import command - Track an existing policy by identifier

use anyhow::Result;
use colored::Colorize;

use super::{CommandContext, ImportArgs};
use crate::cli::exit_codes;
use crate::cli::GlobalArgs;
use crate::error::ActionsGateError;
use crate::policy::{PolicyId, ReadOutcome};
use crate::state::PolicyState;

pub async fn execute(args: ImportArgs, global: &GlobalArgs) -> Result<i32> {
    let id = PolicyId::parse(&args.id).map_err(ActionsGateError::from)?;
    let ctx = CommandContext::load(global)?;

    match ctx.reconciler()?.read_full(&id, None).await? {
        ReadOutcome::Found(observed) | ReadOutcome::Unchanged(observed) => {
            ctx.state.save(&PolicyState::new(id.clone(), observed))?;
            println!(
                "{} Imported {} into {}",
                "Success:".green().bold(),
                id.as_str().cyan(),
                ctx.state.path().display()
            );
            Ok(exit_codes::SUCCESS)
        }
        ReadOutcome::Absent => {
            eprintln!(
                "{} No Actions policy found for {}",
                "Error:".red().bold(),
                id.organization().cyan()
            );
            Ok(exit_codes::ERROR)
        }
    }
}
