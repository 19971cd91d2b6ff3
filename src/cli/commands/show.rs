//! Show command - Read the full remote policy

use anyhow::Result;
use colored::Colorize;

use super::{CommandContext, ShowArgs};
use crate::cli::exit_codes;
use crate::cli::GlobalArgs;
use crate::error::ActionsGateError;
use crate::policy::{PolicyId, ReadOutcome};
use crate::state::PolicyState;

pub async fn execute(args: ShowArgs, global: &GlobalArgs) -> Result<i32> {
    let ctx = CommandContext::load(global)?;
    let org = ctx.organization().map_err(ActionsGateError::from)?;
    let id = PolicyId::for_organization(org);

    let prior = if args.refresh {
        None
    } else {
        ctx.state.load_for(org).map(|state| state.observed)
    };

    let reconciler = ctx.reconciler()?;
    let renderer = args.format.renderer();

    match reconciler.read_full(&id, prior.as_ref()).await? {
        ReadOutcome::Found(observed) => {
            print!("{}", renderer.render_observed(&id, &observed, false)?);
            ctx.state.save(&PolicyState::new(id, observed))?;
            Ok(exit_codes::SUCCESS)
        }
        ReadOutcome::Unchanged(observed) => {
            print!("{}", renderer.render_observed(&id, &observed, true)?);
            Ok(exit_codes::SUCCESS)
        }
        ReadOutcome::Absent => {
            eprintln!(
                "{} No Actions policy found for {}",
                "Error:".red().bold(),
                org.cyan()
            );
            Ok(exit_codes::ERROR)
        }
    }
}
