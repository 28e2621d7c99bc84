//! Session controller: one grid, one search, and the editing commands
//! that keep both consistent.

use crate::board::{Cell, Layout, Topology};
use crate::config::{BoardConfig, LayoutConfig};
use crate::error::{HexPathError, Rejection, Result};
use crate::grid::Grid;
use crate::node::{Mark, Node, NodeId, NodeState, Paint, Role};
use crate::search::{SearchEngine, SearchPath, SearchStatus, StepReport};
use serde::Serialize;

/// An interactive search over a single board.
///
/// Independent sessions share nothing and may run on separate threads.
#[derive(Clone, Debug)]
pub struct Session {
    grid: Grid,
    engine: SearchEngine,
    layout_config: LayoutConfig,
    start: NodeId,
    end: NodeId,
}

impl Session {
    // ========================================================================
    // CONSTRUCTORS
    // ========================================================================

    /// Build the board described by `config` and seed the search
    pub fn new(config: &BoardConfig) -> Result<Self> {
        config.validate()?;

        let mut grid = Grid::generate(config.width, config.height, config.layout())?;
        for wall in config.unique_walls() {
            let id = grid.id_of(wall)?;
            grid[id].set_role(Role::Wall);
        }

        let start = grid.id_of(config.start)?;
        let end = grid.id_of(config.end)?;
        grid[start].set_role(Role::Start);
        grid[end].set_role(Role::End);

        let mut session = Self {
            grid,
            engine: SearchEngine::new(),
            layout_config: config.layout,
            start,
            end,
        };
        session.engine.seed(&mut session.grid, start, end);

        tracing::debug!(
            "Session ready: {}x{} board, start {}, end {}",
            config.width,
            config.height,
            config.start,
            config.end
        );

        Ok(session)
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn status(&self) -> SearchStatus {
        self.engine.status()
    }

    pub fn explored(&self) -> usize {
        self.engine.explored()
    }

    pub fn path(&self) -> Option<&SearchPath> {
        self.engine.path()
    }

    pub fn start(&self) -> Cell {
        self.grid[self.start].cell()
    }

    pub fn end(&self) -> Cell {
        self.grid[self.end].cell()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn layout(&self) -> &Layout {
        self.grid.layout()
    }

    pub fn node(&self, cell: Cell) -> Result<&Node> {
        self.grid.node(cell)
    }

    /// Open cells in insertion order
    pub fn open_cells(&self) -> Vec<Cell> {
        self.engine.open_set().iter().map(|&id| self.grid[id].cell()).collect()
    }

    /// Closed cells in expansion order
    pub fn closed_cells(&self) -> Vec<Cell> {
        self.engine.closed_set().iter().map(|&id| self.grid[id].cell()).collect()
    }

    /// Cell under a layout-space point, if it is on the board
    pub fn cell_at(&self, x: f64, y: f64) -> Result<Cell> {
        let cell = self.layout().to_grid(x, y);
        self.grid.id_of(cell)?;
        Ok(cell)
    }

    /// Board as it stands now, walls and endpoints included
    pub fn config(&self) -> BoardConfig {
        BoardConfig {
            width: self.grid.width(),
            height: self.grid.height(),
            start: self.start(),
            end: self.end(),
            walls: self
                .grid
                .nodes()
                .filter(|n| n.is_wall())
                .map(Node::cell)
                .collect(),
            topology: self.grid.topology(),
            layout: self.layout_config,
        }
    }

    // ========================================================================
    // SEARCH COMMANDS
    // ========================================================================

    /// One expansion step
    pub fn step(&mut self) -> Result<StepReport> {
        self.engine.step(&mut self.grid, self.end)
    }

    /// Step until the search finishes or `max_steps` steps have run
    pub fn run(&mut self, max_steps: usize) -> Result<StepReport> {
        let mut last = StepReport {
            status: self.status(),
            explored: self.explored(),
            selected: None,
            opened: Vec::new(),
        };
        for _ in 0..max_steps {
            last = self.step()?;
            if last.status.is_terminal() {
                break;
            }
        }
        Ok(last)
    }

    /// Drop all search progress and re-seed from the start node
    pub fn restart(&mut self) {
        self.engine.clear();
        for node in self.grid.nodes_mut() {
            node.reset();
        }
        self.engine.seed(&mut self.grid, self.start, self.end);
        tracing::debug!("Search restarted from {}", self.start());
    }

    // ========================================================================
    // EDIT COMMANDS
    // ========================================================================

    /// Flip a cell between wall and empty. Returns whether it is now a wall.
    ///
    /// The search restarts so no wall is ever in the open or closed set.
    pub fn toggle_wall(&mut self, cell: Cell) -> Result<bool> {
        let id = self.grid.id_of(cell)?;
        let role = match self.grid[id].role() {
            Role::Start | Role::End => return Err(reject(Rejection::WallOnEndpoint, cell)),
            Role::Wall => Role::Plain,
            Role::Plain => Role::Wall,
        };
        self.grid[id].set_role(role);
        self.restart();
        Ok(role == Role::Wall)
    }

    /// Move the start node, demoting the old one to empty
    pub fn set_start(&mut self, cell: Cell) -> Result<()> {
        let id = self.check_endpoint_target(cell, self.end)?;
        if id == self.start {
            return Ok(());
        }
        self.grid[self.start].set_role(Role::Plain);
        self.grid[id].set_role(Role::Start);
        self.start = id;
        self.restart();
        Ok(())
    }

    /// Move the end node, demoting the old one to empty
    pub fn set_end(&mut self, cell: Cell) -> Result<()> {
        let id = self.check_endpoint_target(cell, self.start)?;
        if id == self.end {
            return Ok(());
        }
        self.grid[self.end].set_role(Role::Plain);
        self.grid[id].set_role(Role::End);
        self.end = id;
        self.restart();
        Ok(())
    }

    fn check_endpoint_target(&self, cell: Cell, other: NodeId) -> Result<NodeId> {
        let id = self.grid.id_of(cell)?;
        if self.grid[id].is_wall() {
            return Err(reject(Rejection::EndpointOnWall, cell));
        }
        if id == other {
            return Err(reject(Rejection::EndpointsOverlap, cell));
        }
        Ok(id)
    }

    // ========================================================================
    // SNAPSHOT
    // ========================================================================

    /// Read-only view of every node for renderers
    pub fn snapshot(&self) -> BoardSnapshot {
        let cells = self
            .grid
            .nodes()
            .map(|node| {
                let (x, y) = node.position();
                CellSnapshot {
                    cell: node.cell(),
                    x,
                    y,
                    state: node.state(),
                    mark: node.mark(),
                    paint: node.paint(),
                    g_cost: node.g_cost(),
                    h_cost: node.h_cost(),
                    f_cost: node.f_cost(),
                    parent: node.parent().map(|p| self.grid[p].cell()),
                }
            })
            .collect();

        BoardSnapshot {
            width: self.grid.width(),
            height: self.grid.height(),
            topology: self.grid.topology(),
            status: self.status(),
            explored: self.explored(),
            start: self.start(),
            end: self.end(),
            path: self.path().cloned(),
            cells,
        }
    }
}

fn reject(rejection: Rejection, cell: Cell) -> HexPathError {
    tracing::warn!("Rejected edit at {}: {}", cell, rejection);
    rejection.into()
}

/// Render-facing copy of a node
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CellSnapshot {
    pub cell: Cell,
    pub x: f64,
    pub y: f64,
    pub state: NodeState,
    pub mark: Mark,
    pub paint: Paint,
    pub g_cost: Option<u32>,
    pub h_cost: Option<u32>,
    pub f_cost: Option<u32>,
    pub parent: Option<Cell>,
}

/// Render-facing copy of a whole session
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BoardSnapshot {
    pub width: usize,
    pub height: usize,
    pub topology: Topology,
    pub status: SearchStatus,
    pub explored: usize,
    pub start: Cell,
    pub end: Cell,
    pub path: Option<SearchPath>,
    pub cells: Vec<CellSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(&BoardConfig::default()).unwrap()
    }

    #[test]
    fn test_new_session_is_seeded() {
        let s = session();
        assert_eq!(s.status(), SearchStatus::Running);
        assert_eq!(s.explored(), 0);
        assert_eq!(s.open_cells(), vec![Cell::new(0, 0)]);
        assert_eq!(s.node(Cell::new(0, 0)).unwrap().state(), NodeState::Start);
        assert_eq!(s.node(Cell::new(7, 7)).unwrap().state(), NodeState::End);
    }

    #[test]
    fn test_wall_on_endpoint_rejected() {
        let mut s = session();
        s.step().unwrap();
        let before = s.snapshot();

        let err = s.toggle_wall(Cell::new(0, 0)).unwrap_err();
        assert_eq!(err, HexPathError::InvalidOperation(Rejection::WallOnEndpoint));
        assert!(s.toggle_wall(Cell::new(7, 7)).is_err());
        assert_eq!(s.snapshot(), before);
    }

    #[test]
    fn test_toggle_wall_restarts() {
        let mut s = session();
        s.step().unwrap();
        assert!(s.toggle_wall(Cell::new(3, 3)).unwrap());
        assert_eq!(s.explored(), 0);
        assert_eq!(s.open_cells(), vec![Cell::new(0, 0)]);
        assert_eq!(s.node(Cell::new(3, 3)).unwrap().state(), NodeState::Wall);

        assert!(!s.toggle_wall(Cell::new(3, 3)).unwrap());
        assert_eq!(s.node(Cell::new(3, 3)).unwrap().state(), NodeState::Empty);
    }

    #[test]
    fn test_out_of_bounds_edit_rejected() {
        let mut s = session();
        assert!(matches!(
            s.toggle_wall(Cell::new(8, 8)),
            Err(HexPathError::InvalidCoordinate { .. })
        ));
        assert!(s.set_start(Cell::new(-1, 0)).is_err());
        assert_eq!(s.start(), Cell::new(0, 0));
    }

    #[test]
    fn test_move_start() {
        let mut s = session();
        s.set_start(Cell::new(2, 2)).unwrap();
        assert_eq!(s.start(), Cell::new(2, 2));
        assert_eq!(s.node(Cell::new(0, 0)).unwrap().state(), NodeState::Empty);
        assert_eq!(s.node(Cell::new(2, 2)).unwrap().state(), NodeState::Start);
        assert_eq!(s.open_cells(), vec![Cell::new(2, 2)]);
    }

    #[test]
    fn test_move_endpoints_rejections() {
        let mut s = session();
        s.toggle_wall(Cell::new(4, 4)).unwrap();

        assert_eq!(
            s.set_end(Cell::new(4, 4)),
            Err(HexPathError::InvalidOperation(Rejection::EndpointOnWall))
        );
        assert_eq!(
            s.set_start(Cell::new(7, 7)),
            Err(HexPathError::InvalidOperation(Rejection::EndpointsOverlap))
        );
        assert_eq!(s.start(), Cell::new(0, 0));
        assert_eq!(s.end(), Cell::new(7, 7));
    }

    #[test]
    fn test_move_end_to_same_cell_is_noop() {
        let mut s = session();
        s.step().unwrap();
        s.set_end(Cell::new(7, 7)).unwrap();
        assert_eq!(s.explored(), 2);
    }

    #[test]
    fn test_run_to_found() {
        let mut s = session();
        let report = s.run(64).unwrap();
        assert_eq!(report.status, SearchStatus::Found);
        let path = s.path().unwrap();
        assert_eq!(path.first(), Some(Cell::new(0, 0)));
        assert_eq!(path.last(), Some(Cell::new(7, 7)));
        assert_eq!(path.cost, 14);
    }

    #[test]
    fn test_cell_at() {
        let s = session();
        let (x, y) = s.layout().to_layout(Cell::new(5, 2));
        assert_eq!(s.cell_at(x, y).unwrap(), Cell::new(5, 2));
        assert!(s.cell_at(0.0, 0.0).is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let mut s = session();
        s.toggle_wall(Cell::new(1, 1)).unwrap();
        s.set_end(Cell::new(5, 6)).unwrap();
        let config = s.config();
        assert_eq!(config.walls, vec![Cell::new(1, 1)]);
        assert_eq!(config.end, Cell::new(5, 6));
        assert_eq!(s.node(Cell::new(7, 7)).unwrap().state(), NodeState::Empty);
        assert_eq!(s.node(Cell::new(5, 6)).unwrap().state(), NodeState::End);

        let rebuilt = Session::new(&config).unwrap();
        assert_eq!(rebuilt.snapshot(), s.snapshot());
    }
}
