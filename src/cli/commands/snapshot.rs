//! Snapshot command - Read the allowed-actions settings only

use anyhow::Result;

use super::{CommandContext, SnapshotArgs};
use crate::cli::exit_codes;
use crate::cli::GlobalArgs;
use crate::error::ActionsGateError;

pub async fn execute(args: SnapshotArgs, global: &GlobalArgs) -> Result<i32> {
    let ctx = CommandContext::load(global)?;
    let org = ctx.organization().map_err(ActionsGateError::from)?;

    let snapshot = ctx.reconciler()?.read_snapshot(org).await?;
    print!("{}", args.format.renderer().render_snapshot(org, &snapshot)?);

    Ok(exit_codes::SUCCESS)
}
