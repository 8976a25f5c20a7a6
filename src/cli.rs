//! CLI definitions for tictoc.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[clap(
    name = "tictoc",
    version,
    about = "Hierarchical per-object timing registry\n\nInstrument methods and nested blocks, accumulate count/total/mean/std per block, and render the timings as a nested report.",
    long_about = None
)]
pub struct Cli {
    /// Path to tictoc.toml config file
    #[clap(long, short, default_value = "tictoc.toml")]
    pub config: PathBuf,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the instrumented demo pipeline once and print its timing report
    Demo,

    /// Run the pipeline repeatedly and emit a structured timing report
    Bench {
        /// Number of iterations (overrides the config value)
        #[clap(long)]
        iterations: Option<u64>,

        /// Write JSON report to this file (default: stdout)
        #[clap(long)]
        output: Option<PathBuf>,
    },

    /// Print an example tictoc.toml to stdout
    Init,
}
