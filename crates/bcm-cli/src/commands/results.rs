//! Per-command device results.

use bcm_core::types::DeviceId;
use bcm_core::viewmodel::{CommandSelection, DeviceSelection};

use crate::cli::ResultsArgs;
use crate::error::CliError;
use crate::output::get_formatter;
use crate::session::Context;

/// Run the results command
pub async fn run_results(args: ResultsArgs, ctx: &Context) -> Result<(), CliError> {
    let formatter = get_formatter(ctx.json);
    let directory = ctx.loaded_directory().await?;

    directory.filter_by_role(&args.role).await;

    let device = match directory.select_device(DeviceId(args.device_id)).await {
        DeviceSelection::Selected(device) => device,
        _ => {
            return Err(CliError::NotFound(format!(
                "device {} with role '{}'",
                args.device_id, args.role
            )))
        }
    };

    if let CommandSelection::NotFound { syntax } = directory.select_command(&args.command).await? {
        return Err(CliError::NotFound(format!(
            "command '{}' on device {}",
            syntax, args.device_id
        )));
    }

    let results = directory.snapshot().await.results.unwrap_or_default();
    println!(
        "{}",
        formatter.format_results(&device, &args.command, &results)
    );
    Ok(())
}
