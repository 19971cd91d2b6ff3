//! Apply command - Write the configured policy to GitHub

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;

use super::{ApplyArgs, CommandContext, OutputFormat};
use crate::actions::detect_drift;
use crate::cli::exit_codes;
use crate::cli::GlobalArgs;
use crate::error::ActionsGateError;
use crate::policy::{validate, ApplyStatus, PhaseResult, PolicyId, ReadOutcome};
use crate::state::PolicyState;

pub async fn execute(args: ApplyArgs, global: &GlobalArgs) -> Result<i32> {
    let ctx = CommandContext::load(global)?;
    let org = ctx.organization().map_err(ActionsGateError::from)?;

    // Reject invalid combinations before any remote call
    let desired = ctx.config.policy.desired();
    validate(&desired).map_err(ActionsGateError::from)?;

    let id = PolicyId::for_organization(org);
    let reconciler = ctx.reconciler()?;

    let (plan, outcome) = detect_drift(&reconciler, &id, &desired).await?;

    if !plan.has_changes() && !args.force {
        if let ReadOutcome::Found(observed) = outcome {
            ctx.state.save(&PolicyState::new(id.clone(), observed))?;
        }
        println!("{} {}", id.as_str().bold(), "is up to date.".green());
        return Ok(exit_codes::SUCCESS);
    }

    print!(
        "{}",
        OutputFormat::Terminal.renderer().render_plan(&id, &plan)?
    );
    println!();

    if args.dry_run {
        println!("{}", "Dry run mode - no changes made.".yellow());
        return Ok(exit_codes::SUCCESS);
    }

    if !args.yes {
        let confirm = Confirm::new()
            .with_prompt(format!("Apply this policy to {}?", org))
            .default(false)
            .interact()?;

        if !confirm {
            println!("{}", "Aborted.".yellow());
            return Ok(exit_codes::SUCCESS);
        }
    }

    let report = reconciler
        .apply_phased(org, &desired)
        .await
        .map_err(ActionsGateError::from)?;

    display_phase("Repository permissions", &report.permissions);
    display_phase("Allowed actions", &report.allowed);
    println!();

    match report.status() {
        ApplyStatus::Applied => {}
        ApplyStatus::PartiallyApplied => {
            if let Err(e) = report.into_result() {
                eprintln!("{} {}", "Error:".red().bold(), e);
            }
            return Ok(exit_codes::PARTIAL_APPLY);
        }
        ApplyStatus::NotApplied => {
            report.into_result()?;
            return Ok(exit_codes::ERROR);
        }
    }

    // Record what the remote now holds, with a fresh token
    match reconciler.read_full(&id, None).await? {
        ReadOutcome::Found(observed) | ReadOutcome::Unchanged(observed) => {
            ctx.state.save(&PolicyState::new(id.clone(), observed))?;
        }
        ReadOutcome::Absent => {
            tracing::warn!("Policy {} not readable after apply", id);
        }
    }

    println!("{} Applied {}", "Success:".green().bold(), id.as_str().cyan());

    Ok(exit_codes::SUCCESS)
}

fn display_phase(name: &str, phase: &PhaseResult) {
    match phase {
        PhaseResult::Succeeded => println!("  {} {}", "✓".green(), name),
        PhaseResult::Failed(e) => println!("  {} {} - {}", "✗".red(), name, e),
        PhaseResult::Skipped => println!("  {} {} {}", "-".dimmed(), name, "(skipped)".dimmed()),
    }
}
