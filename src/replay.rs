//! Headless replay: feed a scripted event list through the scheduler.

use crate::core::{GameSession, GameSnapshot, PieceSource};
use crate::engine::{Event, Scheduler};
use crate::event_log::EventLog;

/// Apply `steps` in order, one scheduler pass each, and return the final
/// snapshot. No wall-clock time passes: gravity only happens on `tick` steps.
pub fn run<S: PieceSource>(
    session: &mut GameSession<S>,
    steps: &[Event],
    log: Option<&EventLog>,
) -> GameSnapshot {
    let mut scheduler = Scheduler::new();

    for &step in steps {
        scheduler.push_event(step);
        scheduler.advance(session, 0);

        for lock in scheduler.drain_locks() {
            if let Some(log) = log {
                log.record_lock(&lock, session);
            }
        }
    }

    session.snapshot()
}
