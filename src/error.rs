//! Errors raised while building grids and piece shapes.
//!
//! Search outcomes (no solution, timeout) are not errors; see
//! [`crate::solver::SolveOutcome`] and [`crate::solver::CountReport`].

use thiserror::Error;

use crate::pieces::PieceId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("grid dimensions must be positive, got {width}x{height}")]
    InvalidDimension { width: i32, height: i32 },

    #[error("cell ({x}, {y}) lies outside the {width}x{height} grid")]
    CellOutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },

    #[error("piece {id} has no cells")]
    EmptyShape { id: PieceId },

    #[error("piece {id} has a negative cell coordinate ({x}, {y})")]
    NegativeCoordinate { id: PieceId, x: i32, y: i32 },

    #[error("unexpected character '{ch}' found at location ({x}, {y})")]
    UnexpectedTile { x: usize, y: usize, ch: char },

    #[error("map has no rows")]
    EmptyMap,
}
