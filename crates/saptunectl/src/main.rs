//! saptunectl - command line front end for SAP tuning arbitration.
//!
//! Thin caller over saptune_core: renders orchestrator outcomes and owns
//! the disk I/O for the `config` subcommands (the core edits documents in
//! memory only).

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "saptunectl")]
#[command(about = "Arbitrates between saptune and sapconf system tuning", long_about = None)]
#[command(version)]
struct Cli {
    /// Render results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show saptune activation state and service enablement
    Status,

    /// Disable sapconf, then enable and start saptune
    Enable,

    /// Disable and stop saptune
    Disable,

    /// Detect installed SAP workloads and auto-configure tuning
    Auto,

    /// Replay a desired tuning state unattended (the import flow)
    Apply {
        /// Desired state to apply
        state: DesiredState,
    },

    /// Inspect or edit a sysconfig-style file
    Config {
        #[command(subcommand)]
        op: ConfigOp,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum DesiredState {
    Enabled,
    Disabled,
}

#[derive(Subcommand)]
enum ConfigOp {
    /// List the distinct key names in the file
    Keys { file: PathBuf },

    /// Print a scalar value (empty if absent)
    Get { file: PathBuf, key: String },

    /// Set a scalar value, creating the key if needed
    Set {
        file: PathBuf,
        key: String,
        value: String,
    },

    /// Print the length of an array key
    ArrayLen { file: PathBuf, key: String },

    /// Print one array element (empty if absent)
    ArrayGet {
        file: PathBuf,
        key: String,
        index: usize,
    },

    /// Set one array element, creating it if needed
    ArraySet {
        file: PathBuf,
        key: String,
        index: usize,
        value: String,
    },

    /// Shrink or grow an array to an exact length
    ArrayResize {
        file: PathBuf,
        key: String,
        len: usize,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Status => commands::status(cli.json),
        Commands::Enable => commands::set_enabled(true),
        Commands::Disable => commands::set_enabled(false),
        Commands::Auto => commands::auto_configure(cli.json),
        Commands::Apply { state } => commands::apply(matches!(state, DesiredState::Enabled)),
        Commands::Config { op } => commands::config(op),
    }
}
