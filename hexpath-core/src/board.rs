//! Hex board geometry: cells, adjacency tables and the layout mapper

use serde::{Deserialize, Serialize};
use std::fmt;

/// Logical grid coordinate (column, row)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    /// Cell shifted by a (dcol, drow) offset
    pub fn offset(&self, (dc, dr): (i32, i32)) -> Cell {
        Cell::new(self.col + dc, self.row + dr)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

impl From<(i32, i32)> for Cell {
    fn from((col, row): (i32, i32)) -> Self {
        Cell::new(col, row)
    }
}

// ============================================================================
// ADJACENCY TABLES
// ============================================================================

/// Offsets (dcol, drow) for a rhombus board, identical for both row parities.
/// Index: 0=upper-left, 1=upper-right, 2=right, 3=lower-right, 4=lower-left, 5=left
pub const RHOMBUS_OFFSETS: [(i32, i32); 6] = [
    (0, -1),  // upper-left
    (1, -1),  // upper-right
    (1, 0),   // right
    (0, 1),   // lower-right
    (-1, 1),  // lower-left
    (-1, 0),  // left
];

/// Offsets for even rows of an offset-rows board
pub const EVEN_ROW_OFFSETS: [(i32, i32); 6] = [
    (-1, -1), // upper-left
    (0, -1),  // upper-right
    (1, 0),   // right
    (0, 1),   // lower-right
    (-1, 1),  // lower-left
    (-1, 0),  // left
];

/// Offsets for odd rows of an offset-rows board (odd rows sit half a hex right)
pub const ODD_ROW_OFFSETS: [(i32, i32); 6] = [
    (0, -1),  // upper-left
    (1, -1),  // upper-right
    (1, 0),   // right
    (1, 1),   // lower-right
    (0, 1),   // lower-left
    (-1, 0),  // left
];

/// How rows are skewed against each other, which fixes adjacency
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Every row sits half a hex further right than the one above it
    #[default]
    Rhombus,
    /// Odd rows sit half a hex right, even rows are flush
    OffsetRows,
}

impl Topology {
    /// Neighbor offset table for cells in `row`, in deterministic order
    pub fn neighbor_offsets(&self, row: i32) -> &'static [(i32, i32); 6] {
        match self {
            Topology::Rhombus => &RHOMBUS_OFFSETS,
            Topology::OffsetRows if row.rem_euclid(2) == 0 => &EVEN_ROW_OFFSETS,
            Topology::OffsetRows => &ODD_ROW_OFFSETS,
        }
    }

    /// Horizontal shift of `row` in hex units
    pub fn skew(&self, row: i32) -> f64 {
        match self {
            Topology::Rhombus => 0.5 * row as f64,
            Topology::OffsetRows => 0.5 * row.rem_euclid(2) as f64,
        }
    }

    /// Axial (q, r) coordinates of a cell
    fn axial(&self, cell: Cell) -> (i32, i32) {
        match self {
            Topology::Rhombus => (cell.col, cell.row),
            Topology::OffsetRows => (cell.col - cell.row.div_euclid(2), cell.row),
        }
    }

    /// Number of single-hex moves between two cells on an open board
    pub fn distance(&self, a: Cell, b: Cell) -> u32 {
        let (aq, ar) = self.axial(a);
        let (bq, br) = self.axial(b);
        let dq = (aq - bq).abs();
        let dr = (ar - br).abs();
        let ds = ((aq + ar) - (bq + br)).abs();
        ((dq + dr + ds) / 2) as u32
    }
}

// ============================================================================
// LAYOUT MAPPER
// ============================================================================

/// Maps grid cells to a continuous 2D layout space and back.
///
/// `offset_x`/`offset_y` are in hex units and keep the board in positive
/// space; the spacings scale hex units to layout units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub topology: Topology,
    pub x_spacing: f64,
    pub y_spacing: f64,
    pub offset_x: f64,
    pub offset_y: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            topology: Topology::Rhombus,
            x_spacing: 70.0,
            y_spacing: 60.0,
            offset_x: 1.0,
            offset_y: 1.0,
        }
    }
}

impl Layout {
    /// Centre of `cell` in layout space
    pub fn to_layout(&self, cell: Cell) -> (f64, f64) {
        let x = (cell.col as f64 + self.topology.skew(cell.row) + self.offset_x) * self.x_spacing;
        let y = (cell.row as f64 + self.offset_y) * self.y_spacing;
        (x, y)
    }

    /// Nearest cell to a layout point. Not bounds-checked.
    pub fn to_grid(&self, x: f64, y: f64) -> Cell {
        let row = (y / self.y_spacing - self.offset_y).round() as i32;
        let col = (x / self.x_spacing - self.offset_x - self.topology.skew(row)).round() as i32;
        Cell::new(col, row)
    }
}
