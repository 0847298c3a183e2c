//! Fire-and-forget command runs.

use bcm_core::types::DeviceId;

use crate::cli::{RunArgs, RunRoleArgs};
use crate::error::CliError;
use crate::output::get_formatter;
use crate::session::Context;

/// Run the run command
pub async fn run_run(args: RunArgs, ctx: &Context) -> Result<(), CliError> {
    let formatter = get_formatter(ctx.json);
    let directory = ctx.directory().await?;

    let response = directory.run_commands(DeviceId(args.device_id)).await?;

    println!(
        "{}",
        formatter.format_trigger(&format!("device {}", args.device_id), &response)
    );
    Ok(())
}

/// Run the run-role command
pub async fn run_run_role(args: RunRoleArgs, ctx: &Context) -> Result<(), CliError> {
    let formatter = get_formatter(ctx.json);
    let directory = ctx.directory().await?;

    let response = directory.run_commands_by_role(&args.role).await?;

    println!(
        "{}",
        formatter.format_trigger(&format!("role {}", args.role), &response)
    );
    Ok(())
}
