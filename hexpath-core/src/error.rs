//! Error types for grid access and session commands

use crate::search::SearchStatus;

/// Why a command was refused. The session is left untouched.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("start and end cannot be walled")]
    WallOnEndpoint,

    #[error("start and end cannot be placed on a wall")]
    EndpointOnWall,

    #[error("start and end must be different cells")]
    EndpointsOverlap,

    #[error("search already finished ({0:?}); restart first")]
    SearchFinished(SearchStatus),

    #[error("grid must be at least 1x1")]
    EmptyGrid,

    #[error("grid {width}x{height} is too large")]
    GridTooLarge { width: usize, height: usize },
}

/// Errors raised by the core
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum HexPathError {
    #[error("cell ({col}, {row}) is outside the {width}x{height} grid")]
    InvalidCoordinate {
        col: i32,
        row: i32,
        width: usize,
        height: usize,
    },

    #[error("invalid operation: {0}")]
    InvalidOperation(#[from] Rejection),
}

pub type Result<T> = std::result::Result<T, HexPathError>;
