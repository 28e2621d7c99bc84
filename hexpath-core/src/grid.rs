//! Node arena for a rectangular hex board

use crate::board::{Cell, Layout, Topology};
use crate::error::{HexPathError, Rejection, Result};
use crate::node::{Node, NodeId};

/// Upper bound on `width * height`
pub const MAX_CELLS: usize = 1 << 24;

/// Check that a `width x height` board can be built. Both dimensions must be
/// non-zero and fit in `i32`, and the cell count must stay within `MAX_CELLS`.
pub fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Rejection::EmptyGrid.into());
    }
    let fits = i32::try_from(width).is_ok()
        && i32::try_from(height).is_ok()
        && width.checked_mul(height).is_some_and(|cells| cells <= MAX_CELLS);
    if !fits {
        return Err(Rejection::GridTooLarge { width, height }.into());
    }
    Ok(())
}

/// Fixed `width x height` board of nodes, stored row-major
#[derive(Clone, Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    layout: Layout,
    nodes: Vec<Node>,
}

impl Grid {
    /// Build every node once, caching its layout position
    pub fn generate(width: usize, height: usize, layout: Layout) -> Result<Self> {
        check_dimensions(width, height)?;

        let mut nodes = Vec::with_capacity(width * height);
        for row in 0..height as i32 {
            for col in 0..width as i32 {
                let cell = Cell::new(col, row);
                nodes.push(Node::new(cell, layout.to_layout(cell)));
            }
        }

        Ok(Self {
            width,
            height,
            layout,
            nodes,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn topology(&self) -> Topology {
        self.layout.topology
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.col >= 0
            && cell.row >= 0
            && (cell.col as usize) < self.width
            && (cell.row as usize) < self.height
    }

    /// Arena index of `cell`
    pub fn id_of(&self, cell: Cell) -> Result<NodeId> {
        if !self.contains(cell) {
            return Err(HexPathError::InvalidCoordinate {
                col: cell.col,
                row: cell.row,
                width: self.width,
                height: self.height,
            });
        }
        Ok(NodeId(cell.row as usize * self.width + cell.col as usize))
    }

    pub fn node(&self, cell: Cell) -> Result<&Node> {
        let id = self.id_of(cell)?;
        Ok(&self[id])
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.iter()
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.nodes.iter().map(Node::cell)
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> + '_ {
        self.nodes.iter_mut()
    }

    // ========================================================================
    // ADJACENCY
    // ========================================================================

    /// In-bounds neighbors of `id`, in offset-table order
    pub fn neighbors_of(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        let cell = self[id].cell();
        self.topology()
            .neighbor_offsets(cell.row)
            .iter()
            .map(move |&offset| cell.offset(offset))
            .filter(move |&other| self.contains(other))
            .map(move |other| NodeId(other.row as usize * self.width + other.col as usize))
    }

    /// Hex distance between two nodes on an open board
    pub fn distance(&self, a: NodeId, b: NodeId) -> u32 {
        self.topology().distance(self[a].cell(), self[b].cell())
    }
}

use std::ops::{Index, IndexMut};

impl Index<NodeId> for Grid {
    type Output = Node;
    #[track_caller]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

impl IndexMut<NodeId> for Grid {
    #[track_caller]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }
}
