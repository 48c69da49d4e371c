//! px - seeded wildcard prompt expansion
//!
//! CLI entry point for resolving prompts against a wildcard vocabulary.

use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result};
use rand::Rng;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use promptx::cli::{Cli, Command, OutputFormat};
use promptx::config::Config;
use promptx::engine::Expander;
use promptx::tokenizer;
use vocabstore::VocabStore;

fn setup_logging(cli_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > RUST_LOG > default (WARN). Diagnostics
    // go to stderr so expansion output stays pipeable.
    let filter = match cli_log_level {
        Some(level) => EnvFilter::try_new(level.to_lowercase()).context("Invalid log level")?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.log_level.as_deref())?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    debug!(?config, "main: configuration loaded");

    match cli.command {
        Command::Expand {
            prompt,
            seed,
            skip_disabled,
            root,
            iterations,
        } => {
            let root = root.unwrap_or_else(|| config.wildcards_root.clone());
            let store = Arc::new(VocabStore::open(&root).context("Failed to open vocabulary store")?);

            // An omitted seed is drawn fresh, like the UI does when the
            // seed is unlocked; it is echoed so the run can be replayed.
            let seed = seed.unwrap_or_else(|| rand::rng().random());
            let cap = iterations.unwrap_or(config.max_iterations);

            let input = if skip_disabled {
                tokenizer::filter_disabled(&tokenizer::tokenize(&prompt))
            } else {
                prompt
            };

            let mut expander = Expander::new(store, seed).with_max_iterations(cap);
            let resolved = expander.process(&input);

            info!(seed, "main: prompt expanded");
            eprintln!("{} {}", "seed:".dimmed(), seed.to_string().cyan());
            println!("{resolved}");
        }
        Command::Tokens { prompt, format } => {
            let tokens = tokenizer::tokenize(&prompt);
            match format {
                OutputFormat::Text => {
                    for token in &tokens {
                        println!("{token}");
                    }
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&tokens)?);
                }
            }
        }
    }

    Ok(())
}
