//! Exhaustive backtracking counter.
//!
//! Fills the grid completely in every possible way, always branching on the
//! first free cell, and counts the complete coverings found. In
//! [`CountMode::UniqueLayouts`] completed branches are deduplicated by
//! canonical signature; in [`CountMode::AllPermutations`] no signatures are
//! computed and every completed branch counts.

use std::ops::ControlFlow;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use rustc_hash::FxHashSet;

use super::budget::PieceBudget;
use super::deadline::Deadline;
use crate::enumerator::candidates_for;
use crate::grid::GridMask;
use crate::pieces::{PieceShape, Placement, Solution, SolutionSignature};

/// What counts as a distinct solution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountMode {
    /// Count each canonical layout once.
    #[default]
    UniqueLayouts,
    /// Count every completed search branch, without signature checks.
    AllPermutations,
}

#[derive(Debug, Clone)]
pub struct CountOptions {
    pub mode: CountMode,
    /// Maximum number of solutions kept in [`CountReport::solutions`].
    /// Counting continues past this cap.
    pub max_stored: usize,
    /// Wall-clock budget for the whole call. `None` means no limit.
    pub timeout: Option<Duration>,
    /// External cancellation, polled alongside the timeout.
    pub cancel: Option<Arc<AtomicBool>>,
}

impl Default for CountOptions {
    fn default() -> Self {
        Self {
            mode: CountMode::default(),
            max_stored: 100,
            timeout: None,
            cancel: None,
        }
    }
}

/// A catalog entry with the number of instances available.
#[derive(Debug, Clone)]
pub struct PieceStock {
    pub shape: Arc<PieceShape>,
    pub count: usize,
}

impl PieceStock {
    pub fn new(shape: Arc<PieceShape>, count: usize) -> Self {
        Self { shape, count }
    }
}

#[derive(Debug, Clone, Default)]
pub struct CountReport {
    /// Accepted complete coverings. Saturates instead of overflowing.
    pub count: u64,
    /// Snapshots of the first `max_stored` accepted coverings, in search order.
    pub solutions: Vec<Solution>,
    /// The timeout or cancellation cut the search short; `count` is partial.
    pub timed_out: bool,
    /// Recursive calls made.
    pub nodes: u64,
    pub elapsed: Duration,
}

/// Counts the ways `catalog` can exactly cover the free cells of `grid`.
///
/// The search works on its own copy of the grid. Given the same grid,
/// catalog order and options, the count and the order of stored solutions
/// are reproducible.
pub fn count(grid: &GridMask, catalog: &[PieceStock], options: &CountOptions) -> CountReport {
    let mut deadline = Deadline::start(options.timeout);
    if let Some(flag) = &options.cancel {
        deadline = deadline.with_cancel_flag(Arc::clone(flag));
    }

    let mut search = ExhaustiveSearch {
        grid: grid.clone(),
        budget: PieceBudget::new(
            catalog
                .iter()
                .map(|stock| (Arc::clone(&stock.shape), stock.count)),
        ),
        mode: options.mode,
        max_stored: options.max_stored,
        deadline,
        placements: Vec::new(),
        seen: FxHashSet::default(),
        report: CountReport::default(),
    };

    let flow = search.search();
    let mut report = search.report;
    report.timed_out = flow.is_break();
    report.elapsed = search.deadline.elapsed();

    log::debug!(
        "exhaustive count finished: {} solutions, {} nodes, {:?}{}",
        report.count,
        report.nodes,
        report.elapsed,
        if report.timed_out { " (timed out)" } else { "" }
    );

    report
}

/// Search-local state for one [`count`] call.
struct ExhaustiveSearch {
    grid: GridMask,
    budget: PieceBudget,
    mode: CountMode,
    max_stored: usize,
    deadline: Deadline,
    placements: Vec<Placement>,
    seen: FxHashSet<SolutionSignature>,
    report: CountReport,
}

impl ExhaustiveSearch {
    /// Explores every completion of the current partial covering.
    ///
    /// Breaks when the deadline expires; every level undoes its own
    /// placement before passing the break upward.
    fn search(&mut self) -> ControlFlow<()> {
        self.report.nodes += 1;
        if self.deadline.expired() {
            return ControlFlow::Break(());
        }

        let Some(target) = self.grid.first_free() else {
            self.record_solution();
            return ControlFlow::Continue(());
        };

        for slot in 0..self.budget.len() {
            if self.budget.remaining(slot) == 0 {
                continue;
            }
            let shape = Arc::clone(self.budget.shape(slot));

            for candidate in candidates_for(&self.grid, target, &shape) {
                let duplicate = self.placements.iter().any(|placed| {
                    placed.is_same(shape.id(), candidate.anchor, candidate.orientation)
                });
                if duplicate || !self.budget.take(slot) {
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
                self.budget.give_back(slot);

                flow?;
            }
        }

        ControlFlow::Continue(())
    }

    /// Handles a complete covering of the grid.
    fn record_solution(&mut self) {
        if self.mode == CountMode::UniqueLayouts
            && !self.seen.insert(SolutionSignature::of(&self.placements))
        {
            return;
        }

        self.report.count = self.report.count.saturating_add(1);
        if self.report.solutions.len() < self.max_stored {
            self.report
                .solutions
                .push(Solution::from(self.placements.clone()));
        }
    }
}
