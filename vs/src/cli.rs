//! CLI argument parsing for vocabstore

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::DEFAULT_ROOT;

#[derive(Parser, Debug)]
#[command(name = "vs")]
#[command(version, about = "Wildcard vocabulary store browser", long_about = None)]
pub struct Cli {
    /// Vocabulary root directory
    #[arg(short, long, default_value = DEFAULT_ROOT)]
    pub root: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List all known wildcard names
    Names {
        /// Optional glob filter, e.g. "poses/*"
        pattern: Option<String>,
    },

    /// Print the candidate lines for a name or glob
    Cat {
        /// Wildcard name, e.g. "poses/style_action"
        #[arg(required = true)]
        name: String,
    },

    /// Show store statistics
    Stats,
}
