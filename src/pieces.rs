//! Piece shapes, placements and solutions.
//!
//! Each piece is defined as a list of cells relative to its local origin.
//! Shapes are read-only once built and are shared between placements
//! through [`Arc`].

use std::fmt;
use std::sync::Arc;

use crate::error::SolverError;
use crate::geometry::{distinct_orientations, rotate_cells, rotated_dimensions, Orientation};
use crate::grid::GridMask;

/// A 2D grid coordinate `(x, y)`.
pub type Cell = (i32, i32);

/// Stable identity of a piece shape.
///
/// Identity, not geometry, decides whether two placements refer to the same
/// piece: two catalog entries with equal cells but different ids are
/// distinguishable pieces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An immutable polyomino description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PieceShape {
    id: PieceId,
    name: String,
    cells: Vec<Cell>,
    width: i32,
    height: i32,
    /// Cells per orientation, indexed by `Orientation::quarter_turns`.
    rotated: [Vec<Cell>; 4],
    orientations: Vec<Orientation>,
}

impl PieceShape {
    /// Builds a shape from its relative cells.
    ///
    /// Cells must be non-empty and non-negative. The bounding width and
    /// height are the maximum coordinate plus one along each axis.
    pub fn new(id: u32, name: impl Into<String>, cells: &[Cell]) -> Result<Self, SolverError> {
        let id = PieceId(id);
        if cells.is_empty() {
            return Err(SolverError::EmptyShape { id });
        }
        if let Some(&(x, y)) = cells.iter().find(|&&(x, y)| x < 0 || y < 0) {
            return Err(SolverError::NegativeCoordinate { id, x, y });
        }

        let width = cells.iter().map(|&(x, _)| x).max().unwrap_or(0) + 1;
        let height = cells.iter().map(|&(_, y)| y).max().unwrap_or(0) + 1;
        let rotated =
            Orientation::ALL.map(|orientation| rotate_cells(cells, orientation, width, height));
        let orientations = distinct_orientations(cells, width, height);

        Ok(Self {
            id,
            name: name.into(),
            cells: cells.to_vec(),
            width,
            height,
            rotated,
            orientations,
        })
    }

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Relative cells in declaration order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Bounding dimensions after rotating into `orientation`.
    pub fn dimensions(&self, orientation: Orientation) -> (i32, i32) {
        rotated_dimensions(orientation, self.width, self.height)
    }

    /// Relative cells after rotation, in the same order as [`Self::cells`].
    #[inline]
    pub fn rotated_cells(&self, orientation: Orientation) -> &[Cell] {
        &self.rotated[orientation.quarter_turns() as usize]
    }

    /// Orientations that give distinct footprints, in search order.
    pub fn orientations(&self) -> &[Orientation] {
        &self.orientations
    }

    /// Absolute cells covered when the rotated origin sits on `anchor`.
    pub fn footprint(&self, anchor: Cell, orientation: Orientation) -> Vec<Cell> {
        self.rotated_cells(orientation)
            .iter()
            .map(|&(x, y)| (anchor.0 + x, anchor.1 + y))
            .collect()
    }
}

/// A placed piece instance.
#[derive(Debug, Clone)]
pub struct Placement {
    pub piece: Arc<PieceShape>,
    /// Grid position of the shape's local origin after rotation.
    pub anchor: Cell,
    pub orientation: Orientation,
}

impl Placement {
    pub fn new(piece: Arc<PieceShape>, anchor: Cell, orientation: Orientation) -> Self {
        Self {
            piece,
            anchor,
            orientation,
        }
    }

    pub fn footprint(&self) -> Vec<Cell> {
        self.piece.footprint(self.anchor, self.orientation)
    }

    /// True when both refer to the same piece at the same anchor and orientation.
    #[inline]
    pub fn is_same(&self, piece: PieceId, anchor: Cell, orientation: Orientation) -> bool {
        self.piece.id() == piece && self.anchor == anchor && self.orientation == orientation
    }
}

impl PartialEq for Placement {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other.piece.id(), other.anchor, other.orientation)
    }
}

impl Eq for Placement {}

/// The placements produced by one completed search branch, in search order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    pub placements: Vec<Placement>,
}

impl Solution {
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Order-independent identity of this layout.
    pub fn signature(&self) -> SolutionSignature {
        SolutionSignature::of(&self.placements)
    }

    /// Checks that footprints are in bounds, pairwise disjoint, and cover
    /// exactly the free cells of `grid`.
    pub fn is_exact_cover(&self, grid: &GridMask) -> bool {
        let mut covered = vec![false; grid.cell_count()];
        let mut covered_count = 0;

        for placement in &self.placements {
            for cell in placement.footprint() {
                let Some(index) = grid.index_of(cell) else {
                    return false;
                };
                if !grid.is_free(cell) || covered[index] {
                    return false;
                }
                covered[index] = true;
                covered_count += 1;
            }
        }

        covered_count == grid.free_count()
    }
}

impl From<Vec<Placement>> for Solution {
    fn from(placements: Vec<Placement>) -> Self {
        Self { placements }
    }
}

/// Canonical signature of a solution.
///
/// Entries are sorted by piece identity, then anchor x, then anchor y, so two
/// solutions that place the same pieces in a different order share a
/// signature. Orientation breaks remaining ties.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SolutionSignature(Vec<(PieceId, i32, i32, Orientation)>);

impl SolutionSignature {
    pub fn of(placements: &[Placement]) -> Self {
        let mut entries: Vec<_> = placements
            .iter()
            .map(|p| (p.piece.id(), p.anchor.0, p.anchor.1, p.orientation))
            .collect();
        entries.sort_unstable();
        Self(entries)
    }
}

/// Renders as `pieceId(anchorX,anchorY)Dorientation;` per placement.
impl fmt::Display for SolutionSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (id, x, y, orientation) in &self.0 {
            write!(f, "{id}({x},{y})D{orientation};")?;
        }
        Ok(())
    }
}

/// Built-in polyominoes, in catalog order. The index is the piece id.
pub const BUILTIN_PIECES: &[(&str, &[Cell])] = &[
    ("monomino", &[(0, 0)]),
    ("domino", &[(0, 0), (1, 0)]),
    ("tromino-i", &[(0, 0), (1, 0), (2, 0)]),
    ("tromino-l", &[(0, 0), (0, 1), (1, 1)]),
    ("i", &[(0, 0), (1, 0), (2, 0), (3, 0)]),
    ("o", &[(0, 0), (1, 0), (0, 1), (1, 1)]),
    ("t", &[(0, 0), (1, 0), (2, 0), (1, 1)]),
    ("s", &[(1, 0), (2, 0), (0, 1), (1, 1)]),
    ("z", &[(0, 0), (1, 0), (1, 1), (2, 1)]),
    ("l", &[(0, 0), (0, 1), (0, 2), (1, 2)]),
    ("j", &[(1, 0), (1, 1), (1, 2), (0, 2)]),
];

/// Looks up a built-in piece by case-insensitive name.
pub fn builtin(name: &str) -> Option<Arc<PieceShape>> {
    BUILTIN_PIECES
        .iter()
        .enumerate()
        .find(|(_, (piece_name, _))| piece_name.eq_ignore_ascii_case(name))
        .and_then(|(index, (piece_name, cells))| {
            PieceShape::new(index as u32, *piece_name, cells).ok()
        })
        .map(Arc::new)
}

/// All built-in pieces in catalog order.
pub fn builtin_catalog() -> Vec<Arc<PieceShape>> {
    BUILTIN_PIECES
        .iter()
        .enumerate()
        .filter_map(|(index, (name, cells))| PieceShape::new(index as u32, *name, cells).ok())
        .map(Arc::new)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domino() -> Arc<PieceShape> {
        Arc::new(PieceShape::new(1, "domino", &[(0, 0), (1, 0)]).unwrap())
    }

    #[test]
    fn test_bounding_dimensions() {
        let shape = PieceShape::new(0, "l", &[(0, 0), (0, 1), (0, 2), (1, 2)]).unwrap();
        assert_eq!((shape.width(), shape.height()), (2, 3));
        assert_eq!(shape.dimensions(Orientation::R90), (3, 2));
    }

    #[test]
    fn test_rejects_invalid_cells() {
        assert_eq!(
            PieceShape::new(3, "empty", &[]),
            Err(SolverError::EmptyShape { id: PieceId(3) })
        );
        assert_eq!(
            PieceShape::new(4, "bad", &[(0, 0), (-1, 2)]),
            Err(SolverError::NegativeCoordinate {
                id: PieceId(4),
                x: -1,
                y: 2
            })
        );
    }

    #[test]
    fn test_rotation_preserves_cell_count() {
        for shape in builtin_catalog() {
            for orientation in Orientation::ALL {
                assert_eq!(
                    shape.rotated_cells(orientation).len(),
                    shape.cell_count(),
                    "{} lost cells under {orientation:?}",
                    shape.name()
                );
            }
        }
    }

    #[test]
    fn test_footprint_offsets_by_anchor() {
        let shape = domino();
        assert_eq!(shape.footprint((2, 1), Orientation::R0), vec![(2, 1), (3, 1)]);
        assert_eq!(shape.footprint((2, 1), Orientation::R90), vec![(2, 1), (2, 2)]);
    }

    #[test]
    fn test_signature_ignores_placement_order() {
        let shape = domino();
        let a = Placement::new(Arc::clone(&shape), (0, 0), Orientation::R0);
        let b = Placement::new(Arc::clone(&shape), (0, 1), Orientation::R0);

        let forward = SolutionSignature::of(&[a.clone(), b.clone()]);
        let backward = SolutionSignature::of(&[b, a]);
        assert_eq!(forward, backward);
        assert_eq!(forward.to_string(), "1(0,0)D0;1(0,1)D0;");
    }

    #[test]
    fn test_signature_sorts_by_piece_then_anchor() {
        let mono = Arc::new(PieceShape::new(0, "monomino", &[(0, 0)]).unwrap());
        let placements = [
            Placement::new(domino(), (0, 0), Orientation::R90),
            Placement::new(Arc::clone(&mono), (1, 1), Orientation::R0),
            Placement::new(mono, (1, 0), Orientation::R0),
        ];
        assert_eq!(
            SolutionSignature::of(&placements).to_string(),
            "0(1,0)D0;0(1,1)D0;1(0,0)D1;"
        );
    }

    #[test]
    fn test_builtin_lookup() {
        let t = builtin("T").unwrap();
        assert_eq!(t.id(), PieceId(6));
        assert_eq!(t.cell_count(), 4);
        assert!(builtin("heptomino").is_none());
        assert_eq!(builtin_catalog().len(), BUILTIN_PIECES.len());
    }
}
