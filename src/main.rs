//! tictoc — hierarchical per-object timing registry.
//!
//! Attaches named timing counters to objects and their methods, accumulates
//! count/total/mean/std per block, and renders a nested fixed-width report.
//! Run `tictoc --help` for usage.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod bench;
mod cli;
mod config;
mod demo;
mod pipeline;

use cli::{Cli, Commands};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let cli = Cli::parse();

    // Load config if present; demo/bench fall back to defaults otherwise.
    let config = match &cli.command {
        Commands::Init => None,
        _ => {
            if cli.config.exists() {
                Some(config::BenchConfig::load(&cli.config)?)
            } else {
                tracing::debug!("no config at {}, using defaults", cli.config.display());
                Some(config::BenchConfig::default())
            }
        }
    };

    match cli.command {
        Commands::Init => {
            let example = config::BenchConfig::default_example();
            print!("{}", toml::to_string_pretty(&example)?);
        }
        Commands::Demo => {
            demo::run(config.as_ref().unwrap())?;
        }
        Commands::Bench { iterations, output } => {
            bench::run(config.as_ref().unwrap(), iterations, output)?;
        }
    }

    Ok(())
}
