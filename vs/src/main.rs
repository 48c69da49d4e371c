use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;

use vocabstore::VocabStore;
use vocabstore::cli::{Cli, Command};

fn setup_logging() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    setup_logging().context("Failed to setup logging")?;

    let cli = Cli::parse();

    info!("vocabstore starting");

    let store = VocabStore::open(&cli.root).context("Failed to open vocabulary store")?;

    match cli.command {
        Command::Names { pattern } => {
            let names = match pattern {
                Some(pattern) => store.matching_names(&pattern),
                None => store.all_names().to_vec(),
            };
            for name in names {
                println!("{}", name.yellow());
            }
        }
        Command::Cat { name } => {
            let lines = store.lines(&name);
            if lines.is_empty() {
                eprintln!("{} no candidates for '{}'", "!".red(), name.yellow());
            }
            for line in lines.iter() {
                println!("{line}");
            }
        }
        Command::Stats => {
            let stats = store.stats();
            println!("{} {}", "root:".dimmed(), store.root().display().to_string().cyan());
            println!("{} {}", "names:".dimmed(), stats.name_count.to_string().cyan());
            println!("{} {}", "candidates:".dimmed(), stats.candidate_count.to_string().cyan());
        }
    }

    Ok(())
}
