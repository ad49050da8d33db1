//! Pieces module - the piece catalog and matrix rotation
//!
//! Every piece kind has exactly one canonical shape matrix. Other
//! orientations are never stored: rotating transposes the current matrix and
//! then reverses each row (90° clockwise), so four rotations return the
//! original cell-for-cell. There are no wall kicks.

use serde::{Serialize, Serializer};

use crate::types::{PieceKind, BOARD_WIDTH};

/// Largest bounding box any catalog shape needs.
pub const MAX_SHAPE: usize = 4;

/// Boolean occupancy matrix inside a bounding box of `rows` x `cols`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Shape {
    rows: u8,
    cols: u8,
    cells: [[bool; MAX_SHAPE]; MAX_SHAPE],
}

impl Shape {
    /// Build a shape from rows of `0`/`1` values.
    ///
    /// Anything past `MAX_SHAPE` rows or columns is ignored.
    pub fn from_grid(grid: &[&[u8]]) -> Self {
        let rows = grid.len().min(MAX_SHAPE);
        let cols = grid
            .iter()
            .map(|row| row.len())
            .max()
            .unwrap_or(0)
            .min(MAX_SHAPE);

        let mut cells = [[false; MAX_SHAPE]; MAX_SHAPE];
        for (r, row) in grid.iter().take(rows).enumerate() {
            for (c, &v) in row.iter().take(cols).enumerate() {
                cells[r][c] = v != 0;
            }
        }

        Self {
            rows: rows as u8,
            cols: cols as u8,
            cells,
        }
    }

    /// Height of the bounding box.
    pub fn rows(&self) -> u8 {
        self.rows
    }

    /// Width of the bounding box.
    pub fn cols(&self) -> u8 {
        self.cols
    }

    /// Whether the cell at (row, col) is occupied. Out-of-box cells are empty.
    pub fn is_filled(&self, row: u8, col: u8) -> bool {
        row < self.rows && col < self.cols && self.cells[row as usize][col as usize]
    }

    /// Occupied cells as `(dx, dy)` offsets from the top-left anchor, row by row.
    pub fn minos(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        (0..self.rows).flat_map(move |r| {
            (0..self.cols)
                .filter(move |&c| self.cells[r as usize][c as usize])
                .map(move |c| (c as i8, r as i8))
        })
    }

    /// Number of occupied cells.
    pub fn mino_count(&self) -> usize {
        self.minos().count()
    }

    /// Rotate 90° clockwise: transpose, then reverse each row.
    ///
    /// `rotated[i][j] = self[rows - 1 - j][i]`; a rectangular box swaps its
    /// row and column counts.
    pub fn rotated(&self) -> Self {
        let mut cells = [[false; MAX_SHAPE]; MAX_SHAPE];
        let rows = self.rows as usize;
        for (i, out_row) in cells.iter_mut().enumerate().take(self.cols as usize) {
            for (j, out) in out_row.iter_mut().enumerate().take(rows) {
                *out = self.cells[rows - 1 - j][i];
            }
        }

        Self {
            rows: self.cols,
            cols: self.rows,
            cells,
        }
    }

    /// Rows of `0`/`1` values, the inverse of [`Shape::from_grid`].
    pub fn to_grid(&self) -> Vec<Vec<u8>> {
        (0..self.rows)
            .map(|r| (0..self.cols).map(|c| self.is_filled(r, c) as u8).collect())
            .collect()
    }
}

impl Serialize for Shape {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_grid().serialize(serializer)
    }
}

/// Canonical shape matrix for a piece kind.
pub fn shape_of(kind: PieceKind) -> Shape {
    match kind {
        PieceKind::I => Shape::from_grid(&[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]]),
        PieceKind::J => Shape::from_grid(&[&[1, 0, 0], &[1, 1, 1], &[0, 0, 0]]),
        PieceKind::L => Shape::from_grid(&[&[0, 0, 1], &[1, 1, 1], &[0, 0, 0]]),
        PieceKind::O => Shape::from_grid(&[&[1, 1], &[1, 1]]),
        PieceKind::S => Shape::from_grid(&[&[0, 1, 1], &[1, 1, 0], &[0, 0, 0]]),
        PieceKind::T => Shape::from_grid(&[&[0, 1, 0], &[1, 1, 1], &[0, 0, 0]]),
        PieceKind::Z => Shape::from_grid(&[&[1, 1, 0], &[0, 1, 1], &[0, 0, 0]]),
    }
}

/// Catalog entry: canonical shape plus color tag.
pub fn lookup(kind: PieceKind) -> (Shape, &'static str) {
    (shape_of(kind), kind.color())
}

/// Horizontally centered spawn column for a shape: `COLS/2 - width/2`.
pub fn spawn_x(shape: &Shape) -> i8 {
    (BOARD_WIDTH / 2) as i8 - (shape.cols() / 2) as i8
}

/// Spawn row for every piece.
pub const SPAWN_Y: i8 = 0;
