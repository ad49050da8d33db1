//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules and state management. It has no
//! dependencies on timing, UI or I/O: every transition is driven by an
//! explicit call, and the only side channel is the `log` facade.
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 grid of locked cells, locking and line clearing
//! - [`collision`]: the single validity predicate for a placement
//! - [`piece`]: the falling piece and its validated transforms
//! - [`pieces`]: the seven tetromino matrices, colors and spawn rules
//! - [`rng`]: injectable piece sources (uniform LCG or fixed sequence)
//! - [`scoring`]: line-clear points, level steps and gravity speed
//! - [`session`]: the session state machine tying it all together
//! - [`snapshot`]: plain value copy of the state for presentation
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: independent draws over the seven kinds
//! - **Plain rotation**: 90° clockwise matrix rotation, rejected on collision
//! - **Immediate lock**: a blocked downward step locks the piece at once
//! - **Ghost Piece**: shows where the current piece will land
//! - **Hold**: store one piece for later use (once per spawn)
//! - **Scoring**: `[0, 100, 300, 500, 800][rows] * level`
//!
//! # Example
//!
//! ```
//! use neon_tetris_core::{GameSession, SequenceSource};
//! use neon_tetris_types::{Command, PieceKind};
//!
//! let mut game = GameSession::new(SequenceSource::repeat(PieceKind::O));
//!
//! game.apply(Command::MoveRight);
//! game.apply(Command::Rotate);
//! game.apply(Command::HardDrop);
//!
//! assert_eq!(game.board().filled_count(), 4);
//! assert_eq!(game.score(), 0);
//! ```

pub mod board;
pub mod collision;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;

pub use neon_tetris_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use collision::collides;
pub use piece::ActivePiece;
pub use pieces::{shape_of, Shape};
pub use rng::{PieceSource, SequenceSource, SimpleRng};
pub use scoring::{gravity_interval_ms, level_after, line_clear_points};
pub use session::{GameSession, LockEvent, Phase};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
