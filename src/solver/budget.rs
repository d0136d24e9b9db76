//! Per-piece remaining counts for a search.

use std::sync::Arc;

use crate::pieces::{PieceId, PieceShape};

/// Remaining-allowed counts for an ordered pool of pieces.
///
/// Slots keep the order they were built in; that order is the order the
/// search tries pieces. Counts are decremented on placement and restored on
/// backtrack.
#[derive(Debug, Clone, Default)]
pub struct PieceBudget {
    shapes: Vec<Arc<PieceShape>>,
    remaining: Vec<usize>,
    total: usize,
}

impl PieceBudget {
    pub fn new(entries: impl IntoIterator<Item = (Arc<PieceShape>, usize)>) -> Self {
        let (shapes, remaining): (Vec<_>, Vec<_>) = entries.into_iter().unzip();
        let total = remaining.iter().fold(0usize, |sum, &count| sum.saturating_add(count));
        Self {
            shapes,
            remaining,
            total,
        }
    }

    /// Number of slots.
    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn shape(&self, slot: usize) -> &Arc<PieceShape> {
        &self.shapes[slot]
    }

    pub fn remaining(&self, slot: usize) -> usize {
        self.remaining[slot]
    }

    /// Sum of remaining counts over all slots.
    pub fn total_remaining(&self) -> usize {
        self.total
    }

    /// Remaining count summed over every slot holding piece `id`.
    pub fn remaining_for(&self, id: PieceId) -> usize {
        self.shapes
            .iter()
            .zip(&self.remaining)
            .filter(|(shape, _)| shape.id() == id)
            .map(|(_, &count)| count)
            .sum()
    }

    /// Uses one instance from `slot`. Returns false if none are left.
    #[inline]
    pub fn take(&mut self, slot: usize) -> bool {
        if self.remaining[slot] == 0 {
            return false;
        }
        self.remaining[slot] -= 1;
        self.total -= 1;
        true
    }

    /// Returns an instance previously obtained with [`Self::take`].
    #[inline]
    pub fn give_back(&mut self, slot: usize) {
        self.remaining[slot] += 1;
        self.total += 1;
    }
}
