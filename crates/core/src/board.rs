//! The well: a fixed 10x20 grid of locked cells.
//!
//! A cell is either empty or remembers the kind of piece that filled it.
//! `x` grows to the right and `y` grows downward, so row 0 is the top.

use arrayvec::ArrayVec;

use crate::pieces::Shape;
use crate::types::{Cell, PieceKind, BOARD_HEIGHT, BOARD_WIDTH};

const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

/// Row indices removed by one line clear (bottom to top).
pub type ClearedRows = ArrayVec<usize, { BOARD_HEIGHT as usize }>;

/// Row-major `[Cell; 200]`, indexed `y * 10 + x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    #[inline]
    fn index(x: i8, y: i8) -> Option<usize> {
        let in_cols = (0..BOARD_WIDTH as i8).contains(&x);
        let in_rows = (0..BOARD_HEIGHT as i8).contains(&y);
        (in_cols && in_rows).then(|| y as usize * BOARD_WIDTH as usize + x as usize)
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// `None` outside the grid, `Some(cell)` inside.
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Writes one cell; `false` when (x, y) is off the grid.
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        let Some(idx) = Self::index(x, y) else {
            return false;
        };
        self.cells[idx] = cell;
        true
    }

    /// In bounds and filled.
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    pub fn color_at(&self, x: i8, y: i8) -> Option<&'static str> {
        self.get(x, y).flatten().map(|kind| kind.color())
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        y < BOARD_HEIGHT as usize && self.row(y).iter().all(Option::is_some)
    }

    /// Row `y`, clamped to the bottom row.
    pub fn row(&self, y: usize) -> &[Cell] {
        let width = BOARD_WIDTH as usize;
        let y = y.min(BOARD_HEIGHT as usize - 1);
        &self.cells[y * width..(y + 1) * width]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks_exact(BOARD_WIDTH as usize)
    }

    /// Drops every full row and lets the rows above fall into place, with
    /// empty rows entering at the top. Returns the removed indices, bottom
    /// row first.
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let w = BOARD_WIDTH as usize;
        let mut removed = ClearedRows::new();
        // Next row (exclusive) to fill with a surviving row.
        let mut keep = BOARD_HEIGHT as usize;

        for y in (0..BOARD_HEIGHT as usize).rev() {
            if self.is_row_full(y) {
                removed.push(y);
                continue;
            }
            keep -= 1;
            if keep != y {
                self.cells.copy_within(y * w..(y + 1) * w, keep * w);
            }
        }
        self.cells[..keep * w].fill(None);

        removed
    }

    /// Write a shape's occupied cells at (x, y) with the given kind.
    ///
    /// Cells above the top edge (`y + dy < 0`) are skipped and never reach the
    /// grid, as are any outside the side/bottom bounds. Returns how many cells
    /// were written.
    pub fn lock_shape(&mut self, shape: &Shape, x: i8, y: i8, kind: PieceKind) -> usize {
        let mut written = 0;
        for (dx, dy) in shape.minos() {
            let py = y + dy;
            if py < 0 {
                continue;
            }
            if self.set(x + dx, py, Some(kind)) {
                written += 1;
            }
        }
        written
    }

    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// All 200 cells, row-major.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Copy into a `[row][col]` grid.
    pub fn write_grid(&self, out: &mut [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize]) {
        for (dst, src) in out.iter_mut().zip(self.rows()) {
            dst.copy_from_slice(src);
        }
    }

    pub fn clear(&mut self) {
        self.cells.fill(None);
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::shape_of;

    #[test]
    fn test_board_index_calculation() {
        assert_eq!(Board::index(0, 0), Some(0));
        assert_eq!(Board::index(9, 0), Some(9));
        assert_eq!(Board::index(0, 1), Some(10));
        assert_eq!(Board::index(9, 19), Some(199));
        assert_eq!(Board::index(-1, 0), None);
        assert_eq!(Board::index(10, 0), None);
        assert_eq!(Board::index(0, 20), None);
    }

    #[test]
    fn test_board_flat_array() {
        let mut board = Board::new();

        board.set(0, 0, Some(PieceKind::I));
        board.set(5, 10, Some(PieceKind::T));

        assert_eq!(board.cells[0], Some(PieceKind::I));
        assert_eq!(board.cells[10 * 10 + 5], Some(PieceKind::T));
        assert_eq!(board.color_at(5, 10), Some("#a000f0"));
    }

    #[test]
    fn test_lock_shape_skips_cells_above_top() {
        let mut board = Board::new();
        // I bar sits on row 1 of its box; anchored at y = -1 it lands on row 0.
        let written = board.lock_shape(&shape_of(PieceKind::I), 3, -1, PieceKind::I);
        assert_eq!(written, 4);
        assert!(board.is_occupied(3, 0));

        // O anchored at y = -1 only writes its bottom row.
        let mut board = Board::new();
        let written = board.lock_shape(&shape_of(PieceKind::O), 4, -1, PieceKind::O);
        assert_eq!(written, 2);
        assert_eq!(board.filled_count(), 2);
    }

    #[test]
    fn test_clear_keeps_non_full_rows_in_order() {
        let mut board = Board::new();
        for x in 0..10 {
            board.set(x, 19, Some(PieceKind::I));
            board.set(x, 17, Some(PieceKind::I));
        }
        board.set(0, 18, Some(PieceKind::T));
        board.set(1, 16, Some(PieceKind::Z));

        let cleared = board.clear_full_rows();
        assert_eq!(cleared.as_slice(), &[19, 17]);
        assert_eq!(board.get(0, 19), Some(Some(PieceKind::T)));
        assert_eq!(board.get(1, 18), Some(Some(PieceKind::Z)));
        assert_eq!(board.filled_count(), 2);
        assert_eq!(board.rows().count(), BOARD_HEIGHT as usize);
    }
}
