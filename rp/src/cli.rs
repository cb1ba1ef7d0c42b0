//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// Retreat planner - staged group travel planning
#[derive(Parser)]
#[command(
    name = "rp",
    about = "Plan group retreats: analyze requirements, rank vendor packages, build and check out a cart",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the whole pipeline for one request
    Plan {
        /// Requirements file (YAML or JSON)
        #[arg(short, long)]
        requirements: PathBuf,

        /// Vendor catalog file (YAML or JSON)
        #[arg(short = 'C', long)]
        catalog: PathBuf,

        /// Weight overrides file
        #[arg(short, long)]
        weights: Option<PathBuf>,

        /// Package to build the cart from (defaults to the top package)
        #[arg(short, long)]
        package: Option<String>,

        /// Cart modifications file (list of modifications)
        #[arg(short, long)]
        modify: Option<PathBuf>,

        /// Checkout request file; without it the session stops at the cart
        #[arg(long)]
        checkout: Option<PathBuf>,

        /// Session directory (overrides config)
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Rank packages without creating a stored session
    Rank {
        /// Requirements file (YAML or JSON)
        #[arg(short, long)]
        requirements: PathBuf,

        /// Vendor catalog file (YAML or JSON)
        #[arg(short = 'C', long)]
        catalog: PathBuf,

        /// Weight overrides file
        #[arg(short, long)]
        weights: Option<PathBuf>,

        /// Number of packages to show
        #[arg(short = 'n', long, default_value = "5")]
        top: usize,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Inspect stored sessions
    Session {
        #[command(subcommand)]
        command: SessionCommand,

        /// Session directory (overrides config)
        #[arg(short, long, global = true)]
        store: Option<PathBuf>,
    },

    /// Print the effective weight profile as YAML
    Weights,
}

/// Session subcommands
#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// List sessions
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one session
    Show {
        /// Session id
        id: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Delete a session
    Delete {
        /// Session id
        id: String,
    },
}

/// Output format for plan/rank/session commands
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use: text, json", s)),
        }
    }
}

/// Path of the log file written by the binary
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("retreatplan")
        .join("logs")
        .join("retreatplan.log")
}
