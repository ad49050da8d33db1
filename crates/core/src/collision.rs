//! Collision predicate shared by every movement, rotation, drop and spawn.

use crate::board::Board;
use crate::pieces::Shape;
use crate::types::{BOARD_HEIGHT, BOARD_WIDTH};

/// Does `shape` anchored at (x, y) overlap a filled cell or leave the board?
///
/// Cells above the top edge (`y + dy < 0`) are only checked against the side
/// walls, so a piece may hang partly off the top while spawning.
pub fn collides(shape: &Shape, x: i8, y: i8, board: &Board) -> bool {
    shape.minos().any(|(dx, dy)| {
        let bx = x as i16 + dx as i16;
        let by = y as i16 + dy as i16;

        if bx < 0 || bx >= BOARD_WIDTH as i16 || by >= BOARD_HEIGHT as i16 {
            return true;
        }
        by >= 0 && board.is_occupied(bx as i8, by as i8)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pieces::shape_of;
    use crate::types::PieceKind;

    #[test]
    fn test_walls_and_floor() {
        let board = Board::new();
        let o = shape_of(PieceKind::O);

        assert!(!collides(&o, 0, 0, &board));
        assert!(!collides(&o, 8, 18, &board));
        assert!(collides(&o, -1, 0, &board));
        assert!(collides(&o, 9, 0, &board));
        assert!(collides(&o, 0, 19, &board));
    }

    #[test]
    fn test_above_top_only_checks_sides() {
        let mut board = Board::new();
        for x in 0..10 {
            board.set(x, 0, Some(PieceKind::Z));
        }
        let o = shape_of(PieceKind::O);

        // Fully above the board: the filled top row is never consulted.
        assert!(!collides(&o, 4, -2, &board));
        // Still bounded horizontally.
        assert!(collides(&o, -1, -2, &board));
        // Bottom row of the O reaches row 0.
        assert!(collides(&o, 4, -1, &board));
    }

    #[test]
    fn test_empty_rows_of_box_do_not_collide() {
        let board = Board::new();
        let i = shape_of(PieceKind::I);
        // Only row 1 of the 4x4 box is filled; rows 2-3 may hang below the floor.
        assert!(!collides(&i, 0, 18, &board));
        assert!(collides(&i, 0, 19, &board));
    }
}
