//! Terminal view of a game session.
//!
//! Rendering is split in two: [`GameView`] turns a [`crate::core::GameSnapshot`]
//! into a [`FrameBuffer`] of styled characters (pure, unit-testable), and
//! [`TerminalRenderer`] flushes frames to the terminal, redrawing only the
//! runs that changed since the previous frame.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use neon_tetris_core as core;
pub use neon_tetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};
