//! Board command - print board geometry, optionally save the board file
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: load_board(), describe_board()
//! - Level 3: (delegated to hexpath-core)
//! - Level 4: argument parsers shared by the other commands

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use hexpath_core::{BoardConfig, Cell, NodeState, Session, Topology};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct BoardArgs {
    /// Board JSON file (defaults to the 8x8 reference board)
    #[arg(long, value_name = "FILE")]
    pub board: Option<PathBuf>,

    /// Override the board topology (rhombus or offset-rows)
    #[arg(long, value_parser = parse_topology)]
    pub topology: Option<Topology>,

    /// Scatter random walls at this density (0.0 - 1.0)
    #[arg(long, value_parser = parse_density)]
    pub density: Option<f64>,

    /// Save the effective board config to this file
    #[arg(long, value_name = "FILE")]
    pub write: Option<PathBuf>,
}

/// Geometry description for renderers
#[derive(Serialize)]
struct BoardInfo {
    width: usize,
    height: usize,
    topology: Topology,
    x_spacing: f64,
    y_spacing: f64,
    even_row_offsets: Vec<[i32; 2]>,
    odd_row_offsets: Vec<[i32; 2]>,
    cells: Vec<CellInfo>,
}

#[derive(Serialize)]
struct CellInfo {
    col: i32,
    row: i32,
    x: f64,
    y: f64,
    state: NodeState,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run board command
pub fn run(args: BoardArgs, seed: Option<u64>) -> Result<()> {
    let mut config = load_board(args.board.as_ref(), args.density, seed)?;
    if let Some(topology) = args.topology {
        config.topology = topology;
    }

    let session = Session::new(&config).context("Invalid board")?;
    let info = describe_board(&session);
    println!("{}", serde_json::to_string_pretty(&info)?);

    if let Some(path) = &args.write {
        session.config().save(path)?;
        tracing::info!("Saved board to {}", path.display());
    }

    Ok(())
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Load the board file or fall back to the reference board, then apply a
/// random wall scatter if requested
pub fn load_board(
    path: Option<&PathBuf>,
    density: Option<f64>,
    seed: Option<u64>,
) -> Result<BoardConfig> {
    let config = match path {
        Some(path) => BoardConfig::load(path)
            .with_context(|| format!("Failed to load board: {}", path.display()))?,
        None => BoardConfig::default(),
    };

    Ok(match density {
        Some(density) => {
            let mut rng = create_rng(seed);
            config.with_random_walls(density, &mut rng)
        }
        None => config,
    })
}

fn describe_board(session: &Session) -> BoardInfo {
    let grid = session.grid();
    let topology = grid.topology();
    let layout = session.layout();

    BoardInfo {
        width: grid.width(),
        height: grid.height(),
        topology,
        x_spacing: layout.x_spacing,
        y_spacing: layout.y_spacing,
        even_row_offsets: topology.neighbor_offsets(0).iter().map(|&(c, r)| [c, r]).collect(),
        odd_row_offsets: topology.neighbor_offsets(1).iter().map(|&(c, r)| [c, r]).collect(),
        cells: grid
            .nodes()
            .map(|node| {
                let (x, y) = node.position();
                CellInfo {
                    col: node.cell().col,
                    row: node.cell().row,
                    x,
                    y,
                    state: node.state(),
                }
            })
            .collect(),
    }
}

// ============================================================================
// LEVEL 4 - UTILITIES
// ============================================================================

pub fn create_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(s) => ChaCha8Rng::seed_from_u64(s),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Parse "COL,ROW" into a cell
pub fn parse_cell(s: &str) -> Result<Cell, String> {
    let (col, row) = s
        .split_once(',')
        .ok_or_else(|| format!("expected COL,ROW but got '{}'", s))?;
    let col = col
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad column '{}': {}", col, e))?;
    let row = row
        .trim()
        .parse::<i32>()
        .map_err(|e| format!("bad row '{}': {}", row, e))?;
    Ok(Cell::from((col, row)))
}

pub fn parse_topology(s: &str) -> Result<Topology, String> {
    match s.to_ascii_lowercase().as_str() {
        "rhombus" => Ok(Topology::Rhombus),
        "offset-rows" | "offset_rows" | "offset" => Ok(Topology::OffsetRows),
        other => Err(format!("unknown topology '{}' (rhombus, offset-rows)", other)),
    }
}

pub fn parse_density(s: &str) -> Result<f64, String> {
    let density: f64 = s.parse().map_err(|e| format!("bad density '{}': {}", s, e))?;
    if (0.0..=1.0).contains(&density) {
        Ok(density)
    } else {
        Err(format!("density must be between 0 and 1, got {}", density))
    }
}

// ============================================================================
// TESTS
// ============================================================================
