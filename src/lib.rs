//! Polyomino Grid-Filling Library
//!
//! Counts and finds exact tilings of a set of free grid cells by shaped
//! pieces. Callers supply a [`GridMask`] of buildable cells and a piece
//! catalog; the searches return [`Solution`]s as lists of placements
//! (piece, anchor cell, orientation).

pub mod enumerator;
pub mod error;
pub mod geometry;
pub mod grid;
pub mod pieces;
pub mod solver;

pub use error::SolverError;
pub use geometry::Orientation;
pub use grid::{format_solution, GridMask};
pub use pieces::{Cell, PieceId, PieceShape, Placement, Solution, SolutionSignature};
