//! Client configuration management.

use crate::cli::{ConfigArgs, ConfigCommands, ConfigSetArgs};
use crate::error::CliError;
use crate::output::get_formatter;
use crate::session::Context;

/// Run config command
pub async fn run_config(args: ConfigArgs, ctx: &Context) -> Result<(), CliError> {
    match args.command {
        ConfigCommands::Show => show_config(ctx).await,
        ConfigCommands::Set(set_args) => set_config(set_args, ctx).await,
    }
}

async fn show_config(ctx: &Context) -> Result<(), CliError> {
    let formatter = get_formatter(ctx.json);
    let store = ctx.config_store()?;
    let config = ctx.client_config().await?;

    println!("{}", formatter.format_config(&config, &store.path()));
    Ok(())
}

async fn set_config(args: ConfigSetArgs, ctx: &Context) -> Result<(), CliError> {
    let formatter = get_formatter(ctx.json);
    let store = ctx.config_store()?;

    let config = store.load().await?.with_overrides(args.url, args.timeout_ms);
    store.save(&config).await?;

    println!(
        "{}",
        formatter.format_message(&format!("Saved configuration to {}", store.path().display()))
    );
    Ok(())
}
