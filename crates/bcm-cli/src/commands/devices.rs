//! Device and role listing.

use bcm_core::types::{DeviceId, RoleFilter};
use bcm_core::viewmodel::DeviceSelection;

use crate::cli::{DeviceArgs, DevicesArgs};
use crate::error::CliError;
use crate::output::get_formatter;
use crate::session::Context;

/// Run the devices command
pub async fn run_devices(args: DevicesArgs, ctx: &Context) -> Result<(), CliError> {
    let formatter = get_formatter(ctx.json);
    let directory = ctx.loaded_directory().await?;

    directory.filter_by_role(&args.role).await;

    let state = directory.snapshot().await;
    let filter = state
        .role_filter
        .unwrap_or_else(|| RoleFilter::parse(&args.role));
    let devices = state.devices_by_role.unwrap_or_default();

    println!("{}", formatter.format_devices(&devices, &filter));
    Ok(())
}

/// Run the roles command
pub async fn run_roles(ctx: &Context) -> Result<(), CliError> {
    let formatter = get_formatter(ctx.json);
    let directory = ctx.loaded_directory().await?;

    let state = directory.snapshot().await;
    println!("{}", formatter.format_roles(&state.device_roles));
    Ok(())
}

/// Run the device command
pub async fn run_device(args: DeviceArgs, ctx: &Context) -> Result<(), CliError> {
    let formatter = get_formatter(ctx.json);
    let directory = ctx.loaded_directory().await?;

    directory.filter_by_role(&args.role).await;

    match directory.select_device(DeviceId(args.id)).await {
        DeviceSelection::Selected(device) => {
            println!("{}", formatter.format_device(&device));
            Ok(())
        }
        _ => Err(CliError::NotFound(format!(
            "device {} with role '{}'",
            args.id, args.role
        ))),
    }
}
