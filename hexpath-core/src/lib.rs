//! HEXPATH Core - Step-able shortest-path search on a hex board
//!
//! This crate provides the search engine behind the visualizer:
//! - Board geometry (column/row cells, hex adjacency, layout mapping)
//! - Node arena with per-node classification and path costs
//! - Frontier search that advances one expansion per call
//! - Session controller for restarts and board edits
//! - JSON board configuration

pub mod board;
pub mod config;
pub mod error;
pub mod grid;
pub mod node;
pub mod search;
pub mod session;

// Re-exports for convenient access
pub use board::{Cell, Layout, Topology};
pub use config::{BoardConfig, LayoutConfig};
pub use error::{HexPathError, Rejection, Result};
pub use grid::{Grid, MAX_CELLS};
pub use node::{Costs, Mark, Node, NodeId, NodeState, Paint, Role};
pub use search::{SearchEngine, SearchPath, SearchStatus, StepReport};
pub use session::{BoardSnapshot, CellSnapshot, Session};
