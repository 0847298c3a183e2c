//! Result comparison.

use bcm_core::types::ResultId;

use crate::cli::CompareArgs;
use crate::error::CliError;
use crate::output::get_formatter;
use crate::session::Context;

/// Run the compare command
pub async fn run_compare(args: CompareArgs, ctx: &Context) -> Result<(), CliError> {
    let formatter = get_formatter(ctx.json);
    let directory = ctx.directory().await?;

    let ids: Vec<ResultId> = args.result_ids.iter().copied().map(ResultId).collect();
    let comparison = directory.compare_results(&ids).await?;

    println!(
        "{}",
        formatter.format_comparison(ids[0], ids[1], &comparison)
    );
    Ok(())
}
