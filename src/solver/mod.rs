//! Backtracking tiling searches.
//!
//! Every search owns a private copy of the grid and its piece budgets, so
//! independent calls can run on separate threads with cloned inputs.

mod budget;
mod constrained;
mod deadline;
mod exhaustive;
mod select;

pub use budget::PieceBudget;
pub use constrained::{solve, solve_until, FillerPiece, RequiredPiece, SolveOutcome};
pub use deadline::{seconds, Deadline};
pub use exhaustive::{count, CountMode, CountOptions, CountReport, PieceStock};
pub use select::{select_best, SelectOptions, SelectionPolicy};
