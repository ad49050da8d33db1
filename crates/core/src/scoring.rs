//! Scoring module - line-clear points, level progression and gravity speed
//!
//! Rules:
//! - Clearing `n` rows in one lock awards `LINE_SCORES[n] * level`.
//! - Level rises by exactly one when `lines / 10` increases, even if a single
//!   clear crosses two multiples of ten.
//! - Gravity interval is `max(100, 1000 - (level - 1) * 100)` milliseconds.

use crate::types::{
    BASE_DROP_MS, DROP_INTERVAL_MIN_MS, DROP_STEP_MS, LINES_PER_LEVEL, LINE_SCORES,
};

/// Points for clearing `lines` rows at `level`.
///
/// More than four rows (only possible on a hand-prepared board) scores as four.
pub fn line_clear_points(lines: usize, level: u32) -> u32 {
    let base = LINE_SCORES[lines.min(LINE_SCORES.len() - 1)];
    base.saturating_mul(level)
}

/// Level after the line total moved from `lines_before` to `lines_after`.
pub fn level_after(level: u32, lines_before: u32, lines_after: u32) -> u32 {
    if lines_after / LINES_PER_LEVEL > lines_before / LINES_PER_LEVEL {
        level.saturating_add(1)
    } else {
        level
    }
}

/// Gravity interval for a level (in milliseconds)
pub fn gravity_interval_ms(level: u32) -> u32 {
    let speedup = level.saturating_sub(1).saturating_mul(DROP_STEP_MS);
    BASE_DROP_MS
        .saturating_sub(speedup)
        .max(DROP_INTERVAL_MIN_MS)
}
