//! CLI command definitions and subcommands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

/// promptx - seeded wildcard prompt expansion
#[derive(Parser)]
#[command(name = "px", version, about = "Seeded wildcard prompt expansion engine")]
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
    /// Expand a prompt's wildcard and choice syntax
    Expand {
        /// Prompt text to expand
        prompt: String,

        /// Seed for reproducible expansion (random when omitted)
        #[arg(short, long)]
        seed: Option<i64>,

        /// Drop tokens marked disabled before expanding
        #[arg(long)]
        skip_disabled: bool,

        /// Wildcard root directory (overrides config)
        #[arg(short, long)]
        root: Option<PathBuf>,

        /// Fixpoint iteration cap (overrides config)
        #[arg(short, long)]
        iterations: Option<usize>,
    },

    /// Print a prompt's top-level tokens
    Tokens {
        /// Prompt text to tokenize
        prompt: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for token listings
#[derive(Clone, Debug, Default)]
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
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}
