//! Piece controller - the falling piece and its validated transforms
//!
//! Every transform is computed tentatively and only returned when
//! [`collides`] is false for the result. The session decides what to do with
//! a rejection (nothing, or lock on a blocked downward step).

use serde::Serialize;

use crate::board::Board;
use crate::collision::collides;
use crate::pieces::{shape_of, spawn_x, Shape, SPAWN_Y};
use crate::types::{PieceKind, BOARD_HEIGHT};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ActivePiece {
    pub kind: PieceKind,
    /// Current matrix, after any rotations.
    pub shape: Shape,
    /// Top-left anchor column.
    pub x: i8,
    /// Top-left anchor row.
    pub y: i8,
}

impl ActivePiece {
    /// A fresh piece at the centered spawn position, canonical orientation
    pub fn spawn(kind: PieceKind) -> Self {
        let shape = shape_of(kind);
        Self {
            kind,
            shape,
            x: spawn_x(&shape),
            y: SPAWN_Y,
        }
    }

    pub fn color(&self) -> &'static str {
        self.kind.color()
    }

    pub fn collides(&self, board: &Board) -> bool {
        collides(&self.shape, self.x, self.y, board)
    }

    /// Absolute board coordinates of the occupied cells.
    pub fn cells(&self) -> impl Iterator<Item = (i8, i8)> + '_ {
        self.shape.minos().map(move |(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Translated copy, if it fits.
    pub fn shifted(&self, dx: i8, dy: i8, board: &Board) -> Option<Self> {
        let x = self.x.checked_add(dx)?;
        let y = self.y.checked_add(dy)?;
        if collides(&self.shape, x, y, board) {
            return None;
        }
        Some(Self { x, y, ..*self })
    }

    /// Copy rotated 90° clockwise in place, if it fits. No kicks are tried.
    pub fn rotated(&self, board: &Board) -> Option<Self> {
        let shape = self.shape.rotated();
        if collides(&shape, self.x, self.y, board) {
            return None;
        }
        Some(Self { shape, ..*self })
    }

    /// Lowest non-colliding row reachable by falling straight down.
    pub fn ghost_y(&self, board: &Board) -> i8 {
        let mut y = self.y;
        // Bounded so a degenerate (empty) shape cannot spin forever.
        while y < BOARD_HEIGHT as i8 && !collides(&self.shape, self.x, y + 1, board) {
            y += 1;
        }
        y
    }

    /// Copy moved to its ghost row.
    pub fn dropped(&self, board: &Board) -> Self {
        Self {
            y: self.ghost_y(board),
            ..*self
        }
    }

    /// Check if the piece is resting on something
    pub fn is_grounded(&self, board: &Board) -> bool {
        collides(&self.shape, self.x, self.y + 1, board)
    }
}
