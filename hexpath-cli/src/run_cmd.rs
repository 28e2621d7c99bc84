//! Run command - step one search and report how it ended
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration (reads like a table of contents)
//! - Level 2: build_session(), drive_search(), print_*_results()
//! - Level 3: step_delay()
//! - Level 4: hexpath-core Session

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;

use hexpath_core::{Cell, SearchPath, SearchStatus, Session, Topology};

use crate::board_cmd::{load_board, parse_cell, parse_density, parse_topology};
use crate::render;

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct RunArgs {
    /// Board JSON file (defaults to the 8x8 reference board)
    #[arg(long, value_name = "FILE")]
    pub board: Option<PathBuf>,

    /// Override the board topology (rhombus or offset-rows)
    #[arg(long, value_parser = parse_topology)]
    pub topology: Option<Topology>,

    /// Scatter random walls at this density (0.0 - 1.0)
    #[arg(long, value_parser = parse_density)]
    pub density: Option<f64>,

    /// Toggle a wall at COL,ROW (repeatable)
    #[arg(long = "wall", value_name = "COL,ROW", value_parser = parse_cell)]
    pub walls: Vec<Cell>,

    /// Move the start to COL,ROW
    #[arg(long, value_name = "COL,ROW", value_parser = parse_cell)]
    pub start: Option<Cell>,

    /// Move the end to COL,ROW
    #[arg(long, value_name = "COL,ROW", value_parser = parse_cell)]
    pub end: Option<Cell>,

    /// Step speed: 1 = slow, 2 = medium, 3 = fast
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u8).range(1..=3))]
    pub speed: u8,

    /// Stop after this many steps even if the search is still running
    #[arg(long, default_value = "1000")]
    pub max_steps: usize,

    /// Print the board after every step
    #[arg(long)]
    pub show: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// How a run ended
#[derive(Debug, Clone, PartialEq)]
pub struct RunOutcome {
    pub status: SearchStatus,
    pub steps: usize,
    pub explored: usize,
    pub path: Option<SearchPath>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run search command
pub fn run(args: RunArgs, seed: Option<u64>) -> Result<()> {
    let mut session = build_session(&args, seed)?;

    tracing::info!(
        "Searching {}x{} board from {} to {}",
        session.grid().width(),
        session.grid().height(),
        session.start(),
        session.end()
    );

    let outcome = drive_search(&mut session, &args)?;

    if args.json {
        print_json_results(&outcome)?;
    } else {
        print_text_results(&session, &outcome, args.show);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load the board, then apply command-line edits in order: walls, start, end
pub fn build_session(args: &RunArgs, seed: Option<u64>) -> Result<Session> {
    let mut config = load_board(args.board.as_ref(), args.density, seed)?;
    if let Some(topology) = args.topology {
        config.topology = topology;
    }

    let mut session = Session::new(&config).context("Invalid board")?;

    for &cell in &args.walls {
        session
            .toggle_wall(cell)
            .with_context(|| format!("Cannot toggle wall at {}", cell))?;
    }
    if let Some(cell) = args.start {
        session
            .set_start(cell)
            .with_context(|| format!("Cannot move start to {}", cell))?;
    }
    if let Some(cell) = args.end {
        session
            .set_end(cell)
            .with_context(|| format!("Cannot move end to {}", cell))?;
    }

    Ok(session)
}

/// Step until the search stops or the step limit is reached
pub fn drive_search(session: &mut Session, args: &RunArgs) -> Result<RunOutcome> {
    let delay = step_delay(args.speed);
    let mut steps = 0;

    while !session.status().is_terminal() && steps < args.max_steps {
        let report = session.step()?;
        steps += 1;

        if args.show && !args.json {
            println!("Step {} ({} explored)", steps, report.explored);
            print!("{}", render::board_to_text(&session.snapshot()));
            println!();
        }
        if !delay.is_zero() && !report.status.is_terminal() {
            thread::sleep(delay);
        }
    }

    Ok(RunOutcome {
        status: session.status(),
        steps,
        explored: session.explored(),
        path: session.path().cloned(),
    })
}

fn print_text_results(session: &Session, outcome: &RunOutcome, shown: bool) {
    println!("\n=== Search Results ===");
    if !shown {
        print!("{}", render::board_to_text(&session.snapshot()));
    }
    println!(
        "{}",
        render::outcome_message(outcome.status, outcome.explored, outcome.steps)
    );
    if let Some(path) = &outcome.path {
        println!("{}", path);
    }
}

fn print_json_results(outcome: &RunOutcome) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        status: SearchStatus,
        steps: usize,
        explored: usize,
        path: Option<&'a SearchPath>,
        message: String,
    }

    let output = JsonOutput {
        status: outcome.status,
        steps: outcome.steps,
        explored: outcome.explored,
        path: outcome.path.as_ref(),
        message: render::outcome_message(outcome.status, outcome.explored, outcome.steps),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ============================================================================
// LEVEL 3 - UTILITIES
// ============================================================================

/// Pause between steps for each speed setting
pub fn step_delay(speed: u8) -> Duration {
    match speed {
        1 => Duration::from_millis(500),
        2 => Duration::from_millis(250),
        _ => Duration::ZERO,
    }
}

// ============================================================================
// TESTS
// ============================================================================
