//! BCM CLI - command-line front end for the BCM device command/result
//! comparison page.
//!
//! Each invocation is one session: it loads the device directory from the
//! backend, applies the requested role filter and selections, and prints the
//! resulting state.

mod cli;
mod commands;
mod error;
mod output;
mod session;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use error::{exit_codes, CliError};
use session::Context;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

/// Logs go to stderr so `--json` output on stdout stays parseable.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let ctx = Context::from_cli(&cli);

    match cli.command {
        Commands::Devices(args) => commands::run_devices(args, &ctx).await,
        Commands::Roles => commands::run_roles(&ctx).await,
        Commands::Device(args) => commands::run_device(args, &ctx).await,
        Commands::Results(args) => commands::run_results(args, &ctx).await,
        Commands::Run(args) => commands::run_run(args, &ctx).await,
        Commands::RunRole(args) => commands::run_run_role(args, &ctx).await,
        Commands::Compare(args) => commands::run_compare(args, &ctx).await,
        Commands::Config(args) => commands::run_config(args, &ctx).await,
    }
}
