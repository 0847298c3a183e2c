//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// BCM CLI - browse devices, run commands and compare results
#[derive(Parser, Debug)]
#[command(name = "bcm-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Backend base URL, e.g. http://127.0.0.1:8000 (overrides the config file)
    #[arg(long, global = true, env = "BCM_BASE_URL")]
    pub base_url: Option<String>,

    /// Request timeout in milliseconds (overrides the config file)
    #[arg(long, global = true, env = "BCM_TIMEOUT")]
    pub timeout: Option<u64>,

    /// Directory holding client.json
    #[arg(long, global = true, env = "BCM_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List devices, optionally filtered by role
    Devices(DevicesArgs),

    /// List device roles
    Roles,

    /// Show one device of the filtered list
    Device(DeviceArgs),

    /// Show a device's results for one command
    Results(ResultsArgs),

    /// Run the configured commands on one device
    Run(RunArgs),

    /// Run the configured commands on every device of a role
    RunRole(RunRoleArgs),

    /// Compare two results
    Compare(CompareArgs),

    /// Client configuration
    Config(ConfigArgs),
}

// ==================== Directory ====================

#[derive(Args, Debug)]
pub struct DevicesArgs {
    /// Role to filter by ("ALL" disables filtering)
    #[arg(short, long, default_value = "ALL")]
    pub role: String,
}

#[derive(Args, Debug)]
pub struct DeviceArgs {
    /// Device id
    pub id: i64,

    /// Role filter the device is looked up in
    #[arg(short, long, default_value = "ALL")]
    pub role: String,
}

#[derive(Args, Debug)]
pub struct ResultsArgs {
    /// Device id
    pub device_id: i64,

    /// Exact command syntax, e.g. "show version"
    pub command: String,

    /// Role filter the device is looked up in
    #[arg(short, long, default_value = "ALL")]
    pub role: String,
}

// ==================== Actions ====================

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Device id
    pub device_id: i64,
}

#[derive(Args, Debug)]
pub struct RunRoleArgs {
    /// Device role
    pub role: String,
}

#[derive(Args, Debug)]
pub struct CompareArgs {
    /// Result ids to compare (exactly two)
    pub result_ids: Vec<i64>,
}

// ==================== Config ====================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Update the stored configuration
    Set(ConfigSetArgs),
}

#[derive(Args, Debug)]
pub struct ConfigSetArgs {
    /// Backend base URL to store
    #[arg(long)]
    pub url: Option<String>,

    /// Request timeout in milliseconds to store
    #[arg(long)]
    pub timeout_ms: Option<u64>,
}
