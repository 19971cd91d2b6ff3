//! Plan command - Show drift between the configured and the remote policy

use anyhow::{Context, Result};
use colored::Colorize;
use std::fs;

use super::{CommandContext, PlanArgs};
use crate::actions::detect_drift;
use crate::cli::exit_codes;
use crate::cli::GlobalArgs;
use crate::error::ActionsGateError;
use crate::policy::{validate, PolicyId};

pub async fn execute(args: PlanArgs, global: &GlobalArgs) -> Result<i32> {
    let ctx = CommandContext::load(global)?;
    let org = ctx.organization().map_err(ActionsGateError::from)?;

    let desired = ctx.config.policy.desired();
    validate(&desired).map_err(ActionsGateError::from)?;

    let id = PolicyId::for_organization(org);

    tracing::info!("Planning Actions policy for {}", org);
    let reconciler = ctx.reconciler()?;
    let (plan, _) = detect_drift(&reconciler, &id, &desired).await?;
    let rendered = args.format.renderer().render_plan(&id, &plan)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write plan to {}", path.display()))?;
            eprintln!(
                "{} Plan written to {}",
                "Success:".green().bold(),
                path.display().to_string().cyan()
            );
        }
        None => print!("{}", rendered),
    }

    if plan.has_changes() {
        Ok(exit_codes::DRIFT_DETECTED)
    } else {
        Ok(exit_codes::SUCCESS)
    }
}
