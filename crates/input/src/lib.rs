//! Terminal input module.
//!
//! Maps `crossterm` key events onto the abstract [`crate::types::Command`]
//! set. There is no repeat handling here: every key press (including
//! terminal auto-repeat) is one command.

pub mod map;

pub use neon_tetris_types as types;

pub use map::{command_for_key, is_press, should_quit};
