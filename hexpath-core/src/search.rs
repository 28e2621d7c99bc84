//! Step-wise frontier search
//!
//! One call to [`SearchEngine::step`] is one expansion:
//! - pick the open node with the lowest `g` (first inserted wins ties)
//! - stop with `Found` if it is the end node, tracing the path back
//! - otherwise close it and open every unvisited, non-wall neighbor
//!
//! Selection uses `g` alone, so the search behaves like uniform-cost search
//! even though `h` and `f` are recorded for display.

use crate::board::Cell;
use crate::error::{Rejection, Result};
use crate::grid::Grid;
use crate::node::{Mark, NodeId, Role};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// RESULT TYPES
// ============================================================================

/// Overall state of a search
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SearchStatus {
    #[default]
    Running,
    Found,
    Exhausted,
}

impl SearchStatus {
    /// `Found` and `Exhausted` accept no further steps
    pub fn is_terminal(self) -> bool {
        self != SearchStatus::Running
    }
}

/// Outcome of a single step
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepReport {
    pub status: SearchStatus,
    /// Nodes opened since the search was seeded, start excluded
    pub explored: usize,
    /// Node taken from the open set this step
    pub selected: Option<Cell>,
    /// Nodes opened this step, in neighbor order
    pub opened: Vec<Cell>,
}

/// Reconstructed route from start to end
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPath {
    pub cells: Vec<Cell>,
    /// Moves from start to end
    pub cost: u32,
}

impl SearchPath {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn first(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn last(&self) -> Option<Cell> {
        self.cells.last().copied()
    }
}

impl fmt::Display for SearchPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Path[Cost = {}]: ", self.cost)?;
        let mut cells = self.cells.iter();
        match cells.next() {
            None => write!(f, "<empty>"),
            Some(first) => {
                write!(f, "{}", first)?;
                for cell in cells {
                    write!(f, " -> {}", cell)?;
                }
                Ok(())
            }
        }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Open/closed bookkeeping for one search over a [`Grid`].
///
/// The engine holds node ids only; all node data lives in the grid, and
/// [`crate::node::Node`] marks always agree with set membership.
#[derive(Clone, Debug, Default)]
pub struct SearchEngine {
    open: Vec<NodeId>,
    closed: Vec<NodeId>,
    explored: usize,
    status: SearchStatus,
    path: Option<SearchPath>,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self::default()
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn explored(&self) -> usize {
        self.explored
    }

    /// Open set in insertion order
    pub fn open_set(&self) -> &[NodeId] {
        &self.open
    }

    /// Closed set in expansion order
    pub fn closed_set(&self) -> &[NodeId] {
        &self.closed
    }

    pub fn path(&self) -> Option<&SearchPath> {
        self.path.as_ref()
    }

    fn report(&self, selected: Option<Cell>, opened: Vec<Cell>) -> StepReport {
        StepReport {
            status: self.status,
            explored: self.explored,
            selected,
            opened,
        }
    }

    // ========================================================================
    // LIFECYCLE
    // ========================================================================

    /// Forget all bookkeeping. Node data is reset by the owner of the grid.
    pub fn clear(&mut self) {
        self.open.clear();
        self.closed.clear();
        self.explored = 0;
        self.status = SearchStatus::Running;
        self.path = None;
    }

    /// Give `start` its costs and put it on the frontier
    pub fn seed(&mut self, grid: &mut Grid, start: NodeId, end: NodeId) {
        let h = grid.distance(start, end);
        grid[start].update(None, h);
        self.open_node(grid, start);
    }

    // ========================================================================
    // STEP
    // ========================================================================

    /// Run one expansion towards `end`
    pub fn step(&mut self, grid: &mut Grid, end: NodeId) -> Result<StepReport> {
        if self.status.is_terminal() {
            return Err(Rejection::SearchFinished(self.status).into());
        }

        let index = match self.lowest_cost_index(grid) {
            Some(index) => index,
            None => {
                self.status = SearchStatus::Exhausted;
                tracing::info!("Search exhausted after exploring {} hexes", self.explored);
                return Ok(self.report(None, Vec::new()));
            }
        };

        let current = self.open[index];
        let current_cell = grid[current].cell();

        if grid[current].role() == Role::End {
            let path = trace_path(grid, current);
            tracing::info!(
                "Found target after exploring {} hexes ({} moves)",
                self.explored,
                path.cost
            );
            self.path = Some(path);
            self.status = SearchStatus::Found;
            return Ok(self.report(Some(current_cell), Vec::new()));
        }

        self.close_at(grid, index);

        let parent_g = grid[current].g_cost();
        let neighbors: Vec<NodeId> = grid.neighbors_of(current).collect();
        let mut opened = Vec::new();

        for neighbor in neighbors {
            let node = &grid[neighbor];
            if node.is_wall() || node.mark() != Mark::Unvisited {
                continue;
            }

            let h = grid.distance(neighbor, end);
            let node = &mut grid[neighbor];
            node.update(parent_g, h);
            node.set_parent(current);
            opened.push(node.cell());

            self.open_node(grid, neighbor);
            self.explored += 1;
        }

        tracing::debug!(
            "Expanded {} (g={:?}), opened {}, frontier {}",
            current_cell,
            parent_g,
            opened.len(),
            self.open.len()
        );

        Ok(self.report(Some(current_cell), opened))
    }

    /// Position in the open set of the lowest `g`; earliest entry wins ties
    fn lowest_cost_index(&self, grid: &Grid) -> Option<usize> {
        self.open
            .iter()
            .enumerate()
            .min_by_key(|&(_, &id)| grid[id].g_cost().unwrap_or(u32::MAX))
            .map(|(index, _)| index)
    }

    fn open_node(&mut self, grid: &mut Grid, id: NodeId) {
        grid[id].open();
        self.open.push(id);
    }

    fn close_at(&mut self, grid: &mut Grid, index: usize) {
        // keep insertion order for tie-breaking
        let id = self.open.remove(index);
        grid[id].close();
        self.closed.push(id);
    }
}

/// Follow parent links from `end` back to the seed and flag every node on
/// the way. The returned cells run start to end.
fn trace_path(grid: &mut Grid, end: NodeId) -> SearchPath {
    let cost = grid[end].g_cost().unwrap_or(0);
    let mut cells = Vec::new();
    let mut current = Some(end);

    while let Some(id) = current {
        if cells.len() > grid.len() {
            break;
        }
        let node = &mut grid[id];
        node.mark_path();
        cells.push(node.cell());
        current = node.parent();
    }

    cells.reverse();
    SearchPath { cells, cost }
}
