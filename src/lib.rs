//! Neon Tetris (workspace facade crate).
//!
//! The game lives in dedicated crates under `crates/`; this package re-exports
//! them as `neon_tetris::{core,engine,input,term,types}` and adds the host
//! pieces shared by the binary and the integration tests: configuration, the
//! JSONL event log and headless replay.

pub mod config;
pub mod event_log;
pub mod replay;

pub use neon_tetris_core as core;
pub use neon_tetris_engine as engine;
pub use neon_tetris_input as input;
pub use neon_tetris_term as term;
pub use neon_tetris_types as types;
