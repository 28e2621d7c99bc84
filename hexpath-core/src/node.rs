//! Grid nodes: role, search mark and path costs

use crate::board::Cell;
use serde::{Deserialize, Serialize};

/// Index of a node inside the grid arena (`row * width + col`)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

/// User-editable role of a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    #[default]
    Plain,
    Wall,
    Start,
    End,
}

/// Membership in the search frontier
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    #[default]
    Unvisited,
    Open,
    Closed,
}

/// Search classification of a node.
///
/// Endpoints keep reporting `Start`/`End` while in the open or closed set;
/// use [`Node::mark`] for their membership.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeState {
    Empty,
    Wall,
    Start,
    End,
    Open,
    Closed,
}

/// What a renderer should draw for a node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Paint {
    Empty,
    Wall,
    Start,
    End,
    Open,
    Closed,
    Path,
}

/// Path costs of a discovered node
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Costs {
    /// Moves taken from start along the discovered path
    pub g: u32,
    /// Hex distance left to the end
    pub h: u32,
}

impl Costs {
    pub fn f(&self) -> u32 {
        self.g + self.h
    }
}

/// A single hex on the board
#[derive(Clone, Debug)]
pub struct Node {
    cell: Cell,
    position: (f64, f64),
    role: Role,
    mark: Mark,
    costs: Option<Costs>,
    parent: Option<NodeId>,
    on_path: bool,
}

impl Node {
    pub fn new(cell: Cell, position: (f64, f64)) -> Self {
        Self {
            cell,
            position,
            role: Role::Plain,
            mark: Mark::Unvisited,
            costs: None,
            parent: None,
            on_path: false,
        }
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn cell(&self) -> Cell {
        self.cell
    }

    /// Cached layout position of the hex centre
    pub fn position(&self) -> (f64, f64) {
        self.position
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn mark(&self) -> Mark {
        self.mark
    }

    pub fn costs(&self) -> Option<Costs> {
        self.costs
    }

    pub fn g_cost(&self) -> Option<u32> {
        self.costs.map(|c| c.g)
    }

    pub fn h_cost(&self) -> Option<u32> {
        self.costs.map(|c| c.h)
    }

    pub fn f_cost(&self) -> Option<u32> {
        self.costs.map(|c| c.f())
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_on_path(&self) -> bool {
        self.on_path
    }

    pub fn is_wall(&self) -> bool {
        self.role == Role::Wall
    }

    /// Search classification derived from role and mark
    pub fn state(&self) -> NodeState {
        match (self.role, self.mark) {
            (Role::Wall, _) => NodeState::Wall,
            (Role::Start, _) => NodeState::Start,
            (Role::End, _) => NodeState::End,
            (Role::Plain, Mark::Unvisited) => NodeState::Empty,
            (Role::Plain, Mark::Open) => NodeState::Open,
            (Role::Plain, Mark::Closed) => NodeState::Closed,
        }
    }

    /// Render classification; the start hex is never painted over
    pub fn paint(&self) -> Paint {
        if self.role == Role::Start {
            return Paint::Start;
        }
        if self.on_path {
            return Paint::Path;
        }
        match self.state() {
            NodeState::Empty => Paint::Empty,
            NodeState::Wall => Paint::Wall,
            NodeState::Start => Paint::Start,
            NodeState::End => Paint::End,
            NodeState::Open => Paint::Open,
            NodeState::Closed => Paint::Closed,
        }
    }

    // ========================================================================
    // MUTATORS
    // ========================================================================

    pub(crate) fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Record costs on first discovery: one move past `parent_g`, `h` to go.
    /// Costs already present are kept, so a path is never relaxed.
    pub(crate) fn update(&mut self, parent_g: Option<u32>, h: u32) {
        if self.costs.is_some() {
            return;
        }
        let g = parent_g.map_or(0, |g| g + 1);
        self.costs = Some(Costs { g, h });
    }

    pub(crate) fn set_parent(&mut self, parent: NodeId) {
        self.parent = Some(parent);
    }

    pub(crate) fn open(&mut self) {
        debug_assert!(!self.is_wall(), "walls are never opened");
        self.mark = Mark::Open;
    }

    pub(crate) fn close(&mut self) {
        debug_assert_eq!(self.mark, Mark::Open);
        self.mark = Mark::Closed;
    }

    pub(crate) fn mark_path(&mut self) {
        self.on_path = true;
    }

    /// Drop all search data; role and position stay
    pub(crate) fn reset(&mut self) {
        self.mark = Mark::Unvisited;
        self.costs = None;
        self.parent = None;
        self.on_path = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_node() {
        let node = Node::new(Cell::new(2, 3), (1.0, 2.0));
        assert_eq!(node.state(), NodeState::Empty);
        assert_eq!(node.paint(), Paint::Empty);
        assert_eq!(node.costs(), None);
        assert_eq!(node.parent(), None);
    }

    #[test]
    fn test_update_only_once() {
        let mut node = Node::new(Cell::new(0, 0), (0.0, 0.0));
        node.update(Some(3), 5);
        assert_eq!(node.g_cost(), Some(4));
        assert_eq!(node.h_cost(), Some(5));
        assert_eq!(node.f_cost(), Some(9));

        node.update(Some(0), 5);
        assert_eq!(node.g_cost(), Some(4));
    }

    #[test]
    fn test_endpoint_keeps_state_when_open() {
        let mut node = Node::new(Cell::new(0, 0), (0.0, 0.0));
        node.set_role(Role::End);
        node.open();
        assert_eq!(node.state(), NodeState::End);
        assert_eq!(node.mark(), Mark::Open);
    }

    #[test]
    fn test_paint_precedence() {
        let mut start = Node::new(Cell::new(0, 0), (0.0, 0.0));
        start.set_role(Role::Start);
        start.mark_path();
        assert_eq!(start.paint(), Paint::Start);

        let mut end = Node::new(Cell::new(1, 0), (0.0, 0.0));
        end.set_role(Role::End);
        end.mark_path();
        assert_eq!(end.paint(), Paint::Path);

        let mut plain = Node::new(Cell::new(2, 0), (0.0, 0.0));
        plain.open();
        plain.close();
        assert_eq!(plain.paint(), Paint::Closed);
        plain.mark_path();
        assert_eq!(plain.paint(), Paint::Path);
    }

    #[test]
    fn test_reset_keeps_role() {
        let mut node = Node::new(Cell::new(0, 0), (0.0, 0.0));
        node.set_role(Role::Start);
        node.update(None, 4);
        node.open();
        node.mark_path();
        node.reset();
        assert_eq!(node.role(), Role::Start);
        assert_eq!(node.mark(), Mark::Unvisited);
        assert_eq!(node.costs(), None);
        assert!(!node.is_on_path());
    }
}
