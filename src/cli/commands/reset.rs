//! Reset command - Return the policy to Actions enabled for all repositories

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

use super::{CommandContext, ResetArgs};
use crate::cli::exit_codes;
use crate::cli::GlobalArgs;
use crate::error::ActionsGateError;
use crate::policy::{PolicyId, ReadOutcome};
use crate::state::PolicyState;

pub async fn execute(args: ResetArgs, global: &GlobalArgs) -> Result<i32> {
    let ctx = CommandContext::load(global)?;
    let org = ctx.organization().map_err(ActionsGateError::from)?;
    let id = PolicyId::for_organization(org);

    if !args.yes {
        let confirm = Confirm::new()
            .with_prompt(format!(
                "Enable Actions for all repositories in {} and drop the allowed-actions restrictions?",
                org
            ))
            .default(false)
            .interact()?;

        if !confirm {
            println!("{}", "Aborted.".yellow());
            return Ok(exit_codes::SUCCESS);
        }
    }

    let reconciler = ctx.reconciler()?;
    reconciler.reset(&id).await?;

    if let ReadOutcome::Found(observed) = reconciler.read_full(&id, None).await? {
        ctx.state.save(&PolicyState::new(id.clone(), observed))?;
    }

    println!("{} Reset {}", "Success:".green().bold(), id.as_str().cyan());

    Ok(exit_codes::SUCCESS)
}
