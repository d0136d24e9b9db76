//! Repeated randomized solving with a selection policy.

use std::time::{Duration, Instant};

use rand::Rng;

use super::constrained::{solve, FillerPiece, RequiredPiece, SolveOutcome};
use crate::grid::GridMask;
use crate::pieces::Solution;

/// Which successful attempt to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Stop at the first success.
    #[default]
    FirstFound,
    /// Keep the success with the fewest placements; ties go to the earlier one.
    FewestPieces,
    /// Keep the success with the most placements; ties go to the earlier one.
    MostPieces,
}

#[derive(Debug, Clone)]
pub struct SelectOptions {
    /// Maximum number of independent attempts.
    pub iterations: usize,
    /// Budget for each attempt.
    pub per_call_timeout: Option<Duration>,
    /// No new attempt starts once this much time has passed in total.
    pub overall_timeout: Option<Duration>,
    pub policy: SelectionPolicy,
}

impl Default for SelectOptions {
    fn default() -> Self {
        Self {
            iterations: 10,
            per_call_timeout: None,
            overall_timeout: None,
            policy: SelectionPolicy::default(),
        }
    }
}

/// Runs [`solve`] up to `options.iterations` times and picks one success.
///
/// Every attempt draws a fresh filler order from `rng`. Returns `None` if no
/// attempt succeeded.
pub fn select_best<R: Rng + ?Sized>(
    grid: &GridMask,
    required: &[RequiredPiece],
    fillers: &[FillerPiece],
    options: &SelectOptions,
    rng: &mut R,
) -> Option<Solution> {
    let started = Instant::now();
    let mut best: Option<Solution> = None;
    let mut attempts = 0;
    let mut successes = 0;
    let mut timeouts = 0;

    while attempts < options.iterations {
        if options
            .overall_timeout
            .is_some_and(|overall| started.elapsed() >= overall)
        {
            log::debug!("overall timeout reached after {attempts} attempts");
            break;
        }
        attempts += 1;

        let solution = match solve(grid, required, fillers, options.per_call_timeout, rng) {
            SolveOutcome::Solved(solution) => solution,
            SolveOutcome::TimedOut => {
                timeouts += 1;
                continue;
            }
            SolveOutcome::Exhausted => continue,
            // every further attempt would report the same
            SolveOutcome::EmptyCatalog => break,
        };
        successes += 1;

        if options.policy == SelectionPolicy::FirstFound {
            best = Some(solution);
            break;
        }
        if best
            .as_ref()
            .map_or(true, |current| is_better(options.policy, &solution, current))
        {
            best = Some(solution);
        }
    }

    log::info!(
        "{successes} of {attempts} attempts succeeded ({timeouts} timed out) in {:?}",
        started.elapsed()
    );

    best
}

/// Strict improvement, so earlier successes win ties.
fn is_better(policy: SelectionPolicy, candidate: &Solution, current: &Solution) -> bool {
    match policy {
        SelectionPolicy::FirstFound => false,
        SelectionPolicy::FewestPieces => candidate.len() < current.len(),
        SelectionPolicy::MostPieces => candidate.len() > current.len(),
    }
}
