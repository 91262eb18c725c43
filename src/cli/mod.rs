//! CLI interface using clap

mod commands;

pub use commands::*;

use clap::{Parser, Subcommand};

/// SnipSync - Markdown snippet extraction and synchronization tool
#[derive(Parser, Debug)]
#[command(name = "snipsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Snippet file or directory (overrides the configured path)
    #[arg(short, long, global = true)]
    pub path: Option<String>,

    /// Config file location (defaults to the user config directory)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format (text, json)
    #[arg(short = 'o', long, global = true, default_value = "text")]
    pub format: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Synchronize snippets from the configured path
    Sync,

    /// List snippet keys
    List,

    /// Print one snippet value
    Get(GetArgs),

    /// Write the Alfred snippet list, regardless of changes
    Export,

    /// Watch the snippet path and re-sync on change
    Watch(WatchArgs),

    /// Show or change configuration
    Config(ConfigArgs),
}

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Arguments for get command
#[derive(Parser, Debug)]
pub struct GetArgs {
    /// Snippet key to look up
    pub key: String,
}

/// Arguments for watch command
#[derive(Parser, Debug)]
pub struct WatchArgs {
    /// Debounce interval in milliseconds
    #[arg(short, long, default_value = "1000")]
    pub debounce: u64,
}

/// Arguments for config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Show current configuration
    #[arg(long)]
    pub show: bool,

    /// Set the snippet file or directory path
    #[arg(long, value_name = "PATH")]
    pub set_path: Option<String>,

    /// Enable or disable the Alfred export (on, off)
    #[arg(long, value_name = "on|off")]
    pub export: Option<String>,

    /// Reset configuration to defaults
    #[arg(long)]
    pub reset: bool,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
