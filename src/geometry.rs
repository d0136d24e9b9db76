//! Planar rotation of piece cells.
//!
//! A piece can be placed in one of four quarter-turn orientations. Rotation
//! keeps cells inside the rotated bounding box, so rotated coordinates stay
//! non-negative and an anchor always names the box's local origin.

use std::fmt;

use crate::pieces::Cell;

/// One of the four quarter-turn orientations of a piece.
///
/// The declaration order is the enumeration order used by the search, which
/// decides which solution is found first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Orientation {
    /// Unrotated ("down").
    R0,
    /// One clockwise quarter turn ("left").
    R90,
    /// Half turn ("up").
    R180,
    /// Three clockwise quarter turns ("right").
    R270,
}

impl Orientation {
    /// All orientations in search order.
    pub const ALL: [Orientation; 4] = [
        Orientation::R0,
        Orientation::R90,
        Orientation::R180,
        Orientation::R270,
    ];

    /// Number of clockwise quarter turns, 0..=3.
    #[inline]
    pub const fn quarter_turns(self) -> u8 {
        match self {
            Orientation::R0 => 0,
            Orientation::R90 => 1,
            Orientation::R180 => 2,
            Orientation::R270 => 3,
        }
    }

    /// Builds an orientation from a quarter-turn count, wrapping modulo 4.
    #[inline]
    pub const fn from_quarter_turns(turns: u8) -> Self {
        match turns % 4 {
            0 => Orientation::R0,
            1 => Orientation::R90,
            2 => Orientation::R180,
            _ => Orientation::R270,
        }
    }

    /// Composes two rotations: `self` followed by `other`.
    #[inline]
    pub const fn then(self, other: Orientation) -> Self {
        Self::from_quarter_turns(self.quarter_turns() + other.quarter_turns())
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.quarter_turns())
    }
}

/// Rotates a cell of a `width` x `height` shape into the given orientation.
///
/// The result lies inside the rotated bounding box (see
/// [`rotated_dimensions`]), so it is non-negative whenever the input is.
#[inline]
pub const fn rotate_cell((x, y): Cell, orientation: Orientation, width: i32, height: i32) -> Cell {
    match orientation {
        Orientation::R0 => (x, y),
        Orientation::R90 => (height - 1 - y, x),
        Orientation::R180 => (width - 1 - x, height - 1 - y),
        Orientation::R270 => (y, width - 1 - x),
    }
}

/// Bounding dimensions `(width, height)` of a shape after rotation.
#[inline]
pub const fn rotated_dimensions(orientation: Orientation, width: i32, height: i32) -> (i32, i32) {
    match orientation {
        Orientation::R0 | Orientation::R180 => (width, height),
        Orientation::R90 | Orientation::R270 => (height, width),
    }
}

/// Rotates every cell of a shape, preserving the input cell order.
pub fn rotate_cells(
    cells: &[Cell],
    orientation: Orientation,
    width: i32,
    height: i32,
) -> Vec<Cell> {
    cells
        .iter()
        .map(|&cell| rotate_cell(cell, orientation, width, height))
        .collect()
}

/// Returns the orientations of a shape that produce distinct footprints.
///
/// Each orientation is compared against the earlier ones after translating
/// its cells to the origin, so symmetric shapes keep only their first
/// representative: one orientation for a monomino, two for a domino.
pub fn distinct_orientations(cells: &[Cell], width: i32, height: i32) -> Vec<Orientation> {
    let mut seen: Vec<Vec<Cell>> = Vec::with_capacity(Orientation::ALL.len());
    let mut distinct = Vec::with_capacity(Orientation::ALL.len());

    for orientation in Orientation::ALL {
        let mut normalized = normalize_to_origin(rotate_cells(cells, orientation, width, height));
        normalized.sort_unstable();

        if !seen.contains(&normalized) {
            seen.push(normalized);
            distinct.push(orientation);
        }
    }

    distinct
}

/// Translates cells so the minimum x and y are both zero.
fn normalize_to_origin(mut cells: Vec<Cell>) -> Vec<Cell> {
    let min_x = cells.iter().map(|&(x, _)| x).min().unwrap_or(0);
    let min_y = cells.iter().map(|&(_, y)| y).min().unwrap_or(0);

    for (x, y) in &mut cells {
        *x -= min_x;
        *y -= min_y;
    }

    cells
}
