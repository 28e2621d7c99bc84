//! HEXPATH CLI - Command-line driver for the hex search engine
//!
//! Commands:
//! - run: step a search on one board and report the outcome
//! - survey: run many random boards in parallel and summarize
//! - board: print board geometry or save a board file

mod board_cmd;
mod render;
mod run_cmd;
mod survey;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexpath")]
#[command(about = "Step-by-step shortest-path search on a hex board")]
struct Cli {
    /// Random seed for reproducible wall layouts
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Step a search on a single board
    Run(run_cmd::RunArgs),
    /// Run random boards in parallel and summarize the outcomes
    Survey(survey::SurveyArgs),
    /// Print board geometry as JSON
    Board(board_cmd::BoardArgs),
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run(args) => run_cmd::run(args, cli.seed),
        Commands::Survey(args) => survey::run(args, cli.seed),
        Commands::Board(args) => board_cmd::run(args, cli.seed),
    }
}
