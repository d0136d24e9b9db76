//! Occupancy grid for the search.
//!
//! The grid is a flat row-major buffer indexed by `y * width + x`. A cell is
//! either free (available for filling) or occupied, where occupied covers
//! both cells outside the buildable set and cells taken by placed pieces.

use crate::error::SolverError;
use crate::pieces::{Cell, Solution};

/// Mutable boolean occupancy grid over `width` x `height` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridMask {
    width: i32,
    height: i32,
    free: Vec<bool>,
}

impl GridMask {
    /// Creates a grid where only `free_cells` are available.
    pub fn new(
        width: i32,
        height: i32,
        free_cells: impl IntoIterator<Item = Cell>,
    ) -> Result<Self, SolverError> {
        if width <= 0 || height <= 0 {
            return Err(SolverError::InvalidDimension { width, height });
        }

        let mut grid = Self {
            width,
            height,
            free: vec![false; width as usize * height as usize],
        };

        for (x, y) in free_cells {
            let index = grid.index_of((x, y)).ok_or(SolverError::CellOutOfBounds {
                x,
                y,
                width,
                height,
            })?;
            grid.free[index] = true;
        }

        Ok(grid)
    }

    /// Creates a grid with every cell free.
    pub fn full(width: i32, height: i32) -> Result<Self, SolverError> {
        let cells = (0..height.max(0)).flat_map(|y| (0..width.max(0)).map(move |x| (x, y)));
        Self::new(width, height, cells)
    }

    /// Parses a text map: one line per row (row 0 first), `.` for a free
    /// cell and `#` for a blocked one. Short lines are padded with blocked
    /// cells; trailing blank lines are ignored.
    pub fn parse(text: &str) -> Result<Self, SolverError> {
        let mut rows: Vec<&str> = text.lines().collect();
        while rows.last().is_some_and(|row| row.trim().is_empty()) {
            rows.pop();
        }
        if rows.is_empty() {
            return Err(SolverError::EmptyMap);
        }

        let width = rows.iter().map(|row| row.chars().count()).max().unwrap_or(0);
        let mut free_cells = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                match ch {
                    '.' => free_cells.push((x as i32, y as i32)),
                    '#' => {}
                    _ => return Err(SolverError::UnexpectedTile { x, y, ch }),
                }
            }
        }

        Self::new(width as i32, rows.len() as i32, free_cells)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells, free or not.
    pub fn cell_count(&self) -> usize {
        self.free.len()
    }

    pub fn free_count(&self) -> usize {
        self.free.iter().filter(|&&free| free).count()
    }

    /// Iterates free cells in scan order.
    pub fn free_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.free
            .iter()
            .enumerate()
            .filter(|(_, free)| **free)
            .map(|(index, _)| self.cell_at(index))
    }

    /// Linear index of `cell`, or `None` when it lies outside the grid.
    #[inline]
    pub fn index_of(&self, (x, y): Cell) -> Option<usize> {
        if (0..self.width).contains(&x) && (0..self.height).contains(&y) {
            Some((y * self.width + x) as usize)
        } else {
            None
        }
    }

    #[inline]
    fn cell_at(&self, index: usize) -> Cell {
        let index = index as i32;
        (index % self.width, index / self.width)
    }

    /// False for out-of-bounds cells.
    #[inline]
    pub fn is_free(&self, cell: Cell) -> bool {
        self.index_of(cell).is_some_and(|index| self.free[index])
    }

    /// First free cell scanning rows top to bottom (y ascending), each row
    /// left to right (x ascending).
    ///
    /// The scan order decides which cell the search branches on, and so
    /// which solution is found first.
    #[inline]
    pub fn first_free(&self) -> Option<Cell> {
        self.free
            .iter()
            .position(|&free| free)
            .map(|index| self.cell_at(index))
    }

    /// True iff every cell of `footprint` is in bounds and free.
    #[inline]
    pub fn can_place(&self, footprint: &[Cell]) -> bool {
        footprint.iter().all(|&cell| self.is_free(cell))
    }

    /// Marks `footprint` as taken. The caller must have checked
    /// [`Self::can_place`] first.
    #[inline]
    pub fn occupy(&mut self, footprint: &[Cell]) {
        self.set(footprint, false);
    }

    /// Releases a footprint previously passed to [`Self::occupy`].
    #[inline]
    pub fn vacate(&mut self, footprint: &[Cell]) {
        self.set(footprint, true);
    }

    #[inline]
    fn set(&mut self, footprint: &[Cell], free: bool) {
        for &(x, y) in footprint {
            debug_assert!(self.index_of((x, y)).is_some(), "cell ({x}, {y}) out of bounds");
            self.free[(y * self.width + x) as usize] = free;
        }
    }
}

/// Label for the n-th placement of a rendered solution.
fn placement_label(placement_index: usize) -> char {
    const LABELS: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";
    LABELS
        .get(placement_index)
        .map_or('*', |&label| char::from(label))
}

/// Formats a solution over its grid as a human-readable string.
///
/// Rows are printed from y = 0 down, matching the text map layout. Blocked
/// cells show as '#', uncovered free cells as '.', and covered cells as the
/// label of the placement covering them (0-9, then A-Z, then a-z).
pub fn format_solution(grid: &GridMask, solution: &Solution) -> String {
    let mut labels: Vec<char> = (0..grid.cell_count())
        .map(|index| if grid.free[index] { '.' } else { '#' })
        .collect();

    for (placement_index, placement) in solution.placements.iter().enumerate() {
        for cell in placement.footprint() {
            if let Some(index) = grid.index_of(cell) {
                labels[index] = placement_label(placement_index);
            }
        }
    }

    let mut output = String::with_capacity(labels.len() + grid.height as usize);
    for row in labels.chunks(grid.width as usize) {
        output.extend(row);
        output.push('\n');
    }

    output
}
