//! First-success search with required and filler piece pools.
//!
//! Required pieces are placed first, larger pieces before smaller ones.
//! Once every required instance is down, the remaining free cells are
//! filled from the filler pool, whose order is shuffled once per call.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use super::budget::PieceBudget;
use super::deadline::Deadline;
use crate::enumerator::candidates_for;
use crate::grid::GridMask;
use crate::pieces::{PieceShape, Placement, Solution};

/// A piece that must be placed exactly `count` times.
#[derive(Debug, Clone)]
pub struct RequiredPiece {
    pub shape: Arc<PieceShape>,
    pub count: usize,
}

impl RequiredPiece {
    pub fn new(shape: Arc<PieceShape>, count: usize) -> Self {
        Self { shape, count }
    }
}

/// An optional piece used to complete coverage, at most `max_count` times.
#[derive(Debug, Clone)]
pub struct FillerPiece {
    pub shape: Arc<PieceShape>,
    pub max_count: usize,
}

impl FillerPiece {
    pub fn new(shape: Arc<PieceShape>, max_count: usize) -> Self {
        Self { shape, max_count }
    }
}

/// Result of a constrained solve. Only `Solved` carries a solution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    Solved(Solution),
    /// The search space was fully explored without a covering.
    Exhausted,
    /// The deadline expired first; a covering may still exist.
    TimedOut,
    /// Both pools were empty, so no search was attempted.
    EmptyCatalog,
}

impl SolveOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved(_))
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn into_solution(self) -> Option<Solution> {
        match self {
            SolveOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }
}

/// Why the search stopped early.
enum Halt {
    Solved(Solution),
    TimedOut,
}

/// Finds one covering of `grid` that uses every required piece.
///
/// `timeout` is the wall-clock budget for this call; `rng` decides the
/// filler order, so pass a seeded generator for reproducible results.
pub fn solve<R: Rng + ?Sized>(
    grid: &GridMask,
    required: &[RequiredPiece],
    fillers: &[FillerPiece],
    timeout: Option<Duration>,
    rng: &mut R,
) -> SolveOutcome {
    solve_until(grid, required, fillers, Deadline::start(timeout), rng)
}

/// [`solve`] against an explicit deadline, e.g. one carrying a cancellation flag.
pub fn solve_until<R: Rng + ?Sized>(
    grid: &GridMask,
    required: &[RequiredPiece],
    fillers: &[FillerPiece],
    deadline: Deadline,
    rng: &mut R,
) -> SolveOutcome {
    if grid.first_free().is_none() && required.iter().all(|piece| piece.count == 0) {
        return SolveOutcome::Solved(Solution::default());
    }
    if required.is_empty() && fillers.is_empty() {
        log::warn!("constrained solve requested with no required or filler pieces");
        return SolveOutcome::EmptyCatalog;
    }

    let mut required_order: Vec<&RequiredPiece> = required.iter().collect();
    // stable: equal sizes keep the caller's order
    required_order.sort_by_key(|piece| std::cmp::Reverse(piece.shape.cell_count()));

    let mut filler_order: Vec<&FillerPiece> = fillers.iter().collect();
    filler_order.shuffle(rng);

    let mut search = ConstrainedSearch {
        grid: grid.clone(),
        required: PieceBudget::new(
            required_order
                .into_iter()
                .map(|piece| (Arc::clone(&piece.shape), piece.count)),
        ),
        fillers: PieceBudget::new(
            filler_order
                .into_iter()
                .map(|piece| (Arc::clone(&piece.shape), piece.max_count)),
        ),
        deadline,
        placements: Vec::new(),
        nodes: 0,
    };

    let outcome = match search.search() {
        ControlFlow::Break(Halt::Solved(solution)) => SolveOutcome::Solved(solution),
        ControlFlow::Break(Halt::TimedOut) => SolveOutcome::TimedOut,
        ControlFlow::Continue(()) => SolveOutcome::Exhausted,
    };

    log::debug!(
        "constrained solve finished after {} nodes in {:?}: {}",
        search.nodes,
        search.deadline.elapsed(),
        match &outcome {
            SolveOutcome::Solved(solution) => format!("solved with {} pieces", solution.len()),
            SolveOutcome::Exhausted => "exhausted".to_string(),
            SolveOutcome::TimedOut => "timed out".to_string(),
            SolveOutcome::EmptyCatalog => "empty catalog".to_string(),
        }
    );

    outcome
}

/// Search-local state for one [`solve`] call.
struct ConstrainedSearch {
    grid: GridMask,
    required: PieceBudget,
    fillers: PieceBudget,
    deadline: Deadline,
    placements: Vec<Placement>,
    nodes: u64,
}

impl ConstrainedSearch {
    fn pool(&mut self, required_phase: bool) -> &mut PieceBudget {
        if required_phase {
            &mut self.required
        } else {
            &mut self.fillers
        }
    }

    /// Breaks with the first complete covering, or on timeout.
    fn search(&mut self) -> ControlFlow<Halt> {
        self.nodes += 1;
        if self.deadline.expired() {
            return ControlFlow::Break(Halt::TimedOut);
        }

        let required_phase = self.required.total_remaining() > 0;
        let Some(target) = self.grid.first_free() else {
            if required_phase {
                return ControlFlow::Continue(());
            }
            return ControlFlow::Break(Halt::Solved(Solution::from(self.placements.clone())));
        };

        for slot in 0..self.pool(required_phase).len() {
            if self.pool(required_phase).remaining(slot) == 0 {
                continue;
            }
            let shape = Arc::clone(self.pool(required_phase).shape(slot));

            for candidate in candidates_for(&self.grid, target, &shape) {
                let duplicate = self.placements.iter().any(|placed| {
                    placed.is_same(shape.id(), candidate.anchor, candidate.orientation)
                });
                if duplicate || !self.pool(required_phase).take(slot) {
                    continue;
                }

                self.grid.occupy(&candidate.footprint);
                self.placements.push(Placement::new(
                    Arc::clone(&shape),
                    candidate.anchor,
                    candidate.orientation,
                ));

                let flow = self.search();

                self.placements.pop();
                self.grid.vacate(&candidate.footprint);
                self.pool(required_phase).give_back(slot);

                flow?;
            }
        }

        ControlFlow::Continue(())
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::pieces::builtin;

    fn required(name: &str, count: usize) -> RequiredPiece {
        RequiredPiece::new(builtin(name).unwrap(), count)
    }

    fn filler(name: &str, max_count: usize) -> FillerPiece {
        FillerPiece::new(builtin(name).unwrap(), max_count)
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[test]
    fn test_required_dominoes_tile_a_row() {
        let grid = GridMask::full(4, 1).unwrap();
        let outcome = solve(&grid, &[required("domino", 2)], &[], None, &mut rng());

        let solution = outcome.into_solution().unwrap();
        assert_eq!(solution.len(), 2);
        assert!(solution.is_exact_cover(&grid));
        assert_eq!(solution.placements[0].anchor, (0, 0));
        assert_eq!(solution.placements[1].anchor, (2, 0));
    }

    #[test]
    fn test_too_few_pieces_is_exhausted() {
        let grid = GridMask::full(4, 1).unwrap();
        let outcome = solve(&grid, &[required("domino", 1)], &[], None, &mut rng());
        assert_eq!(outcome, SolveOutcome::Exhausted);
    }

    #[test]
    fn test_fillers_complete_the_covering() {
        let grid = GridMask::full(4, 1).unwrap();
        let outcome = solve(
            &grid,
            &[required("domino", 1)],
            &[filler("domino", 1)],
            None,
            &mut rng(),
        );
        assert_eq!(outcome.solution().map(Solution::len), Some(2));

        let outcome = solve(
            &grid,
            &[required("domino", 1)],
            &[filler("domino", 0)],
            None,
            &mut rng(),
        );
        assert_eq!(outcome, SolveOutcome::Exhausted);
    }

    #[test]
    fn test_required_pieces_place_largest_first() {
        let grid = GridMask::full(3, 2).unwrap();
        let outcome = solve(
            &grid,
            &[required("monomino", 2), required("o", 1)],
            &[],
            None,
            &mut rng(),
        );

        let solution = outcome.into_solution().unwrap();
        assert!(solution.is_exact_cover(&grid));
        assert_eq!(solution.placements[0].piece.name(), "o");
    }

    #[test]
    fn test_required_pieces_must_all_be_used() {
        // the grid fills up before the second domino can go down
        let grid = GridMask::full(2, 1).unwrap();
        let outcome = solve(&grid, &[required("domino", 2)], &[], None, &mut rng());
        assert_eq!(outcome, SolveOutcome::Exhausted);
    }

    #[test]
    fn test_empty_grid_without_requirements_is_solved() {
        let grid = GridMask::new(2, 2, []).unwrap();
        let outcome = solve(&grid, &[], &[], None, &mut rng());
        assert_eq!(outcome, SolveOutcome::Solved(Solution::default()));
    }

    #[test]
    fn test_empty_catalog() {
        let grid = GridMask::full(2, 2).unwrap();
        assert_eq!(
            solve(&grid, &[], &[], None, &mut rng()),
            SolveOutcome::EmptyCatalog
        );
    }

    #[test]
    fn test_zero_timeout() {
        let grid = GridMask::full(4, 4).unwrap();
        let outcome = solve(
            &grid,
            &[],
            &[filler("domino", 8)],
            Some(Duration::ZERO),
            &mut rng(),
        );
        assert_eq!(outcome, SolveOutcome::TimedOut);
    }

    #[test]
    fn test_same_seed_same_solution() {
        let grid = GridMask::full(4, 4).unwrap();
        let fillers = [filler("monomino", 16), filler("domino", 8), filler("l", 4), filler("o", 4)];

        let first = solve(&grid, &[required("t", 1)], &fillers, None, &mut rng());
        let second = solve(&grid, &[required("t", 1)], &fillers, None, &mut rng());
        let first = first.into_solution().unwrap();
        assert!(first.is_exact_cover(&grid));
        assert_eq!(Some(first.signature()), second.solution().map(Solution::signature));
    }

    #[test]
    fn test_grid_is_left_untouched() {
        let grid = GridMask::parse("..#\n...").unwrap();
        let before = grid.clone();
        let _ = solve(&grid, &[required("tromino-l", 1)], &[filler("domino", 1)], None, &mut rng());
        assert_eq!(grid, before);
    }
}
