//! Command-line interface for pairdraw.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pairdraw - gift-exchange pairings and letters from a plan file
#[derive(Parser, Debug)]
#[command(name = "pairdraw")]
#[command(about = "Assigns gift-exchange pairings and letters", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the whole draw at once and print the result report
    Run {
        /// Path to the draw plan (TOML)
        #[arg(short, long, default_value = "draw_plan.toml")]
        plan: PathBuf,

        /// Seed for a reproducible draw (overrides the plan's seed)
        #[arg(long)]
        seed: Option<u64>,

        /// Write the report to this file as well as printing it
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write the report to a timestamped file in the current directory
        #[arg(long, conflicts_with = "output")]
        save: bool,

        /// Print the pairings as JSON instead of the text report
        #[arg(long)]
        json: bool,
    },

    /// Play the draw turn by turn in roster order, printing each turn
    Turns {
        /// Path to the draw plan (TOML)
        #[arg(short, long, default_value = "draw_plan.toml")]
        plan: PathBuf,

        /// Seed for a reproducible draw (overrides the plan's seed)
        #[arg(long)]
        seed: Option<u64>,
    },
}
