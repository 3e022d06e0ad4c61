//! Pairdraw - gift-exchange pairings from the command line.
//!
//! Reads a draw plan (participants, restrictions, excluded letters) from a
//! TOML file, runs the draw, and prints the result report.

#![warn(missing_docs)]

mod cli;
mod plan;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use plan::DrawPlan;
use std::path::{Path, PathBuf};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run {
            plan,
            seed,
            output,
            save,
            json,
        } => run_draw(&plan, seed, output, save, json),
        Command::Turns { plan, seed } => run_turns(&plan, seed),
    }
}

/// Runs the whole draw at once and prints or writes the report.
#[instrument(skip_all, fields(plan = %plan_path.display()))]
fn run_draw(
    plan_path: &Path,
    seed: Option<u64>,
    output: Option<PathBuf>,
    save: bool,
    json: bool,
) -> Result<()> {
    let plan = DrawPlan::from_file(plan_path)?;
    let session = plan.build_session(seed)?;

    let outcome = session.compute_batch_assignment()?;
    if outcome.degraded() {
        warn!("Draw completed with relaxed rules");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", session.export_results()?);
    }

    let destination = if save { Some(default_report_path()) } else { output };
    if let Some(path) = destination {
        std::fs::write(&path, session.export_results()?)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
        info!(path = %path.display(), "Report written");
    }

    Ok(())
}

/// Plays the draw turn by turn in roster order, printing each turn.
#[instrument(skip_all, fields(plan = %plan_path.display()))]
fn run_turns(plan_path: &Path, seed: Option<u64>) -> Result<()> {
    let plan = DrawPlan::from_file(plan_path)?;
    let session = plan.build_session(seed)?;
    session.start_game()?;

    while let Some(drawer) = session.next_drawer() {
        let record = session.draw_letter_and_assign(&drawer)?;

        let mut notes = String::new();
        if let Some(degradation) = record.degradation() {
            notes.push_str(&format!("  ({degradation})"));
        }
        if *record.swap_repaired() {
            notes.push_str("  (an earlier pairing was reassigned to free this target)");
        }
        println!("{}{}", record.assignment(), notes);
    }

    print!("{}", session.export_results()?);
    Ok(())
}

/// Report filename carrying the draw date, for the --save flag.
fn default_report_path() -> PathBuf {
    PathBuf::from(format!(
        "pairdraw-results-{}.txt",
        chrono::Local::now().format("%Y-%m-%d_%H-%M")
    ))
}
