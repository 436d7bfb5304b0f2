use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::logging::TracingLevel;

/// Command-line client for the farmhand data proxy
#[derive(Debug, Parser)]
#[command(name = "farmhand", version, about)]
pub struct Cli {
    /// TOML config file
    #[arg(long, global = true, env = "FARMHAND_CONFIG")]
    pub config: Option<PathBuf>,

    /// Proxy endpoint, overriding config and environment
    #[arg(long, global = true)]
    pub proxy_url: Option<String>,

    /// Token store directory, overriding config and environment
    #[arg(long, global = true)]
    pub store_dir: Option<PathBuf>,

    /// Bearer token for this invocation only; takes precedence over the stored token
    #[arg(long, global = true, env = "FARMHAND_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Raise log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Explicit log level
    #[arg(long, global = true, env = "FARMHAND_LOG")]
    pub log_level: Option<TracingLevel>,

    /// Also write logs to this file, created on first event
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Persist a bearer token (and optionally the user info JSON)
    Login {
        /// Bearer token issued by the auth service
        #[arg(value_name = "TOKEN")]
        new_token: String,
        /// User info as a JSON object
        #[arg(long)]
        user_info: Option<String>,
    },
    /// Forget the persisted token and user info
    Logout,
    /// Show the persisted user and selected farm
    Whoami,
    /// Persist the farm subsequent commands are scoped to
    SelectFarm {
        /// Farm identifier
        farm_id: String,
    },
    /// Call any backend function and print the response
    Call {
        /// Backend function name, e.g. `get_farms`
        function: String,
        /// Parameter object as JSON
        #[arg(long, default_value = "{}")]
        params: String,
        /// Strip the response envelope before printing
        #[arg(long)]
        unwrap: bool,
    },
    /// List farms visible to the signed-in user
    Farms,
    /// Call one function once per parameter object in a JSON array file
    Batch {
        /// Backend function name
        function: String,
        /// File holding a JSON array of parameter objects
        #[arg(long)]
        params_file: PathBuf,
        /// Calls issued concurrently
        #[arg(long, default_value_t = 10)]
        batch_size: usize,
        /// Pause between batches in milliseconds
        #[arg(long, default_value_t = 500)]
        delay_ms: u64,
    },
}

impl Cli {
    /// Effective log level: `--log-level` (or `FARMHAND_LOG`) when given, else `-v`
    pub const fn tracing_level(&self) -> TracingLevel {
        match self.log_level {
            Some(level) => level,
            None => TracingLevel::from_verbosity(self.verbose),
        }
    }
}
