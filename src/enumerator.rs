//! Candidate placements covering a target cell.
//!
//! The search always branches on the grid's first free cell, so only
//! placements whose footprint includes that cell are worth trying. For each
//! orientation and each rotated cell `r` of a piece, the implied anchor is
//! `target - r`; the placement is kept when its whole footprint is free.

use std::sync::Arc;

use crate::geometry::Orientation;
use crate::grid::GridMask;
use crate::pieces::{Cell, PieceShape, Placement};

/// A legal placement of one piece, with its absolute footprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub anchor: Cell,
    pub orientation: Orientation,
    pub footprint: Vec<Cell>,
}

impl Candidate {
    pub fn into_placement(self, piece: Arc<PieceShape>) -> Placement {
        Placement::new(piece, self.anchor, self.orientation)
    }
}

/// Every legal placement of `shape` that covers `target`.
///
/// Order: distinct orientations in [`Orientation::ALL`] order, then the
/// piece's own cell order.
pub fn candidates_for(grid: &GridMask, target: Cell, shape: &PieceShape) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for &orientation in shape.orientations() {
        for &(rotated_x, rotated_y) in shape.rotated_cells(orientation) {
            let anchor = (target.0 - rotated_x, target.1 - rotated_y);
            if let Some(footprint) = try_footprint(grid, shape, anchor, orientation) {
                candidates.push(Candidate {
                    anchor,
                    orientation,
                    footprint,
                });
            }
        }
    }

    candidates
}

/// Builds the footprint of `shape` at `anchor`.
///
/// Returns `None` if any cell would fall outside the grid or on an occupied cell.
fn try_footprint(
    grid: &GridMask,
    shape: &PieceShape,
    anchor: Cell,
    orientation: Orientation,
) -> Option<Vec<Cell>> {
    let rotated = shape.rotated_cells(orientation);
    let mut footprint = Vec::with_capacity(rotated.len());

    for &(x, y) in rotated {
        let cell = (anchor.0 + x, anchor.1 + y);
        if !grid.is_free(cell) {
            return None;
        }
        footprint.push(cell);
    }

    Some(footprint)
}

/// Enumerates candidates over a whole piece catalog.
#[derive(Debug, Clone, Copy)]
pub struct PlacementEnumerator<'a> {
    catalog: &'a [Arc<PieceShape>],
}

impl<'a> PlacementEnumerator<'a> {
    pub fn new(catalog: &'a [Arc<PieceShape>]) -> Self {
        Self { catalog }
    }

    /// Candidates covering `target`, in catalog order, each tagged with the
    /// index of its piece in the catalog.
    pub fn candidates(&self, grid: &GridMask, target: Cell) -> Vec<(usize, Candidate)> {
        self.catalog
            .iter()
            .enumerate()
            .flat_map(|(index, shape)| {
                candidates_for(grid, target, shape)
                    .into_iter()
                    .map(move |candidate| (index, candidate))
            })
            .collect()
    }

    /// Candidates at the grid's first free cell, or `None` when the grid is full.
    pub fn candidates_at_first_free(&self, grid: &GridMask) -> Option<Vec<(usize, Candidate)>> {
        grid.first_free().map(|target| self.candidates(grid, target))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::builtin;

    #[test]
    fn test_every_candidate_covers_target() {
        let grid = GridMask::full(4, 4).unwrap();
        let catalog = vec![builtin("l").unwrap(), builtin("t").unwrap()];
        let enumerator = PlacementEnumerator::new(&catalog);

        let candidates = enumerator.candidates(&grid, (1, 1));
        assert!(!candidates.is_empty());
        for (_, candidate) in &candidates {
            assert!(candidate.footprint.contains(&(1, 1)));
            assert!(grid.can_place(&candidate.footprint));
        }
    }

    #[test]
    fn test_domino_at_corner() {
        let grid = GridMask::full(3, 3).unwrap();
        let domino = builtin("domino").unwrap();

        let candidates = candidates_for(&grid, (0, 0), &domino);
        assert_eq!(
            candidates,
            vec![
                Candidate {
                    anchor: (0, 0),
                    orientation: Orientation::R0,
                    footprint: vec![(0, 0), (1, 0)],
                },
                Candidate {
                    anchor: (0, 0),
                    orientation: Orientation::R90,
                    footprint: vec![(0, 0), (0, 1)],
                },
            ]
        );
    }

    #[test]
    fn test_domino_in_open_space_orders_by_orientation_then_cell() {
        let grid = GridMask::full(3, 3).unwrap();
        let domino = builtin("domino").unwrap();

        let anchors: Vec<_> = candidates_for(&grid, (1, 1), &domino)
            .into_iter()
            .map(|c| (c.orientation, c.anchor))
            .collect();
        assert_eq!(
            anchors,
            vec![
                (Orientation::R0, (1, 1)),
                (Orientation::R0, (0, 1)),
                (Orientation::R90, (1, 1)),
                (Orientation::R90, (1, 0)),
            ]
        );
    }

    #[test]
    fn test_skips_occupied_and_out_of_bounds() {
        let mut grid = GridMask::full(2, 2).unwrap();
        grid.occupy(&[(1, 0)]);
        let domino = builtin("domino").unwrap();

        let candidates = candidates_for(&grid, (0, 0), &domino);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].footprint, vec![(0, 0), (0, 1)]);
    }

    #[test]
    fn test_catalog_order_is_preserved() {
        let grid = GridMask::full(2, 2).unwrap();
        let catalog = vec![builtin("domino").unwrap(), builtin("monomino").unwrap()];
        let enumerator = PlacementEnumerator::new(&catalog);

        let pieces: Vec<usize> = enumerator
            .candidates_at_first_free(&grid)
            .unwrap()
            .into_iter()
            .map(|(index, _)| index)
            .collect();
        assert_eq!(pieces, vec![0, 0, 1]);
    }

    #[test]
    fn test_no_candidates_on_full_grid() {
        let grid = GridMask::new(2, 2, []).unwrap();
        let catalog = vec![builtin("monomino").unwrap()];
        assert!(PlacementEnumerator::new(&catalog)
            .candidates_at_first_free(&grid)
            .is_none());
    }
}
