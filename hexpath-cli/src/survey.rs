//! Survey command - run many random boards in parallel and summarize
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration (reads like a table of contents)
//! - Level 2: survey_boards(), summarize(), print_*_results()
//! - Level 3: search_board()
//! - Level 4: hexpath-core Session

use anyhow::{bail, Context, Result};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;

use hexpath_core::grid::check_dimensions;
use hexpath_core::{BoardConfig, SearchStatus, Session, Topology};

use crate::board_cmd::{parse_density, parse_topology};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct SurveyArgs {
    /// Number of random boards to search
    #[arg(long, default_value = "100")]
    pub boards: usize,

    /// Board width in cells
    #[arg(long, default_value = "8")]
    pub width: usize,

    /// Board height in cells
    #[arg(long, default_value = "8")]
    pub height: usize,

    /// Wall density (0.0 - 1.0)
    #[arg(long, default_value = "0.3", value_parser = parse_density)]
    pub density: f64,

    /// Board topology (rhombus or offset-rows)
    #[arg(long, default_value = "rhombus", value_parser = parse_topology)]
    pub topology: Topology,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

/// Outcome of one board
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardResult {
    pub seed: u64,
    pub status: SearchStatus,
    pub explored: usize,
    pub path_len: Option<usize>,
}

/// Aggregate over every surveyed board
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SurveySummary {
    pub boards: usize,
    pub found: usize,
    pub exhausted: usize,
    pub mean_explored: f64,
    pub max_explored: usize,
    pub mean_path_len: Option<f64>,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run survey command
pub fn run(args: SurveyArgs, seed: Option<u64>) -> Result<()> {
    if args.boards == 0 {
        bail!("--boards must be at least 1");
    }
    check_dimensions(args.width, args.height)
        .with_context(|| format!("Cannot survey {}x{} boards", args.width, args.height))?;
    let base_seed = seed.unwrap_or(42);

    tracing::info!(
        "Surveying {} boards ({}x{}, density {:.2}, {:?})",
        args.boards,
        args.width,
        args.height,
        args.density,
        args.topology
    );

    let progress = if args.json {
        ProgressBar::hidden()
    } else {
        create_progress_bar(args.boards as u64)
    };
    let results = survey_boards(&args, base_seed, &progress)?;
    progress.finish_and_clear();

    let summary = summarize(&results);

    if args.json {
        print_json_results(&args, base_seed, &summary)?;
    } else {
        print_text_results(&args, base_seed, &summary);
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Search each seeded board on the rayon pool
pub fn survey_boards(
    args: &SurveyArgs,
    base_seed: u64,
    progress: &ProgressBar,
) -> Result<Vec<BoardResult>> {
    (0..args.boards as u64)
        .into_par_iter()
        .map(|i| {
            let seed = base_seed.wrapping_add(i);
            let result = search_board(args, seed);
            progress.inc(1);
            result
        })
        .collect()
}

pub fn summarize(results: &[BoardResult]) -> SurveySummary {
    let boards = results.len();
    let found = results.iter().filter(|r| r.status == SearchStatus::Found).count();
    let exhausted = results.iter().filter(|r| r.status == SearchStatus::Exhausted).count();

    let total_explored: usize = results.iter().map(|r| r.explored).sum();
    let path_lens: Vec<usize> = results.iter().filter_map(|r| r.path_len).collect();

    SurveySummary {
        boards,
        found,
        exhausted,
        mean_explored: if boards == 0 {
            0.0
        } else {
            total_explored as f64 / boards as f64
        },
        max_explored: results.iter().map(|r| r.explored).max().unwrap_or(0),
        mean_path_len: if path_lens.is_empty() {
            None
        } else {
            Some(path_lens.iter().sum::<usize>() as f64 / path_lens.len() as f64)
        },
    }
}

fn print_text_results(args: &SurveyArgs, base_seed: u64, summary: &SurveySummary) {
    println!("\n=== Survey Results ===");
    println!(
        "Boards: {} ({}x{}, density {:.2}, {:?}, base seed {})",
        summary.boards, args.width, args.height, args.density, args.topology, base_seed
    );
    println!(
        "Found: {} ({:.1}%)",
        summary.found,
        100.0 * summary.found as f64 / summary.boards as f64
    );
    println!("Exhausted: {}", summary.exhausted);
    println!(
        "Explored: mean {:.1}, max {}",
        summary.mean_explored, summary.max_explored
    );
    match summary.mean_path_len {
        Some(len) => println!("Mean path length: {:.1} hexes", len),
        None => println!("Mean path length: n/a"),
    }
}

fn print_json_results(args: &SurveyArgs, base_seed: u64, summary: &SurveySummary) -> Result<()> {
    #[derive(serde::Serialize)]
    struct JsonOutput<'a> {
        width: usize,
        height: usize,
        density: f64,
        topology: Topology,
        base_seed: u64,
        #[serde(flatten)]
        summary: &'a SurveySummary,
    }

    let output = JsonOutput {
        width: args.width,
        height: args.height,
        density: args.density,
        topology: args.topology,
        base_seed,
        summary,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

// ============================================================================
// LEVEL 3 - SINGLE BOARD
// ============================================================================

fn search_board(args: &SurveyArgs, seed: u64) -> Result<BoardResult> {
    let mut config = BoardConfig::random(args.width, args.height, args.density, seed);
    config.topology = args.topology;

    let mut session = Session::new(&config)?;
    // Every step closes one node, so this bound always reaches a terminal status
    let report = session.run(session.grid().len() + 1)?;

    Ok(BoardResult {
        seed,
        status: report.status,
        explored: session.explored(),
        path_len: session.path().map(|p| p.len()),
    })
}

fn create_progress_bar(len: u64) -> ProgressBar {
    let bar = ProgressBar::new(len);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner} [{elapsed_precise}] {bar:40} {pos}/{len} boards")
    {
        bar.set_style(style);
    }
    bar
}

// ============================================================================
// TESTS
// ============================================================================
