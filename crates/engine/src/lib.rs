//! Scheduler: gravity timer and command queue in front of a [`GameSession`].
//!
//! The scheduler never looks at a clock. The host measures elapsed time and
//! hands it to [`Scheduler::advance`], which makes headless runs and tests
//! fully deterministic.
//!
//! Ordering per `advance` call:
//! 1. queued events are applied in FIFO order, each one fully;
//! 2. elapsed time accumulates and one gravity step fires per full interval.
//!
//! Accumulated time is dropped while the session is paused or over, and
//! whenever the level changes or the session is reset (the timer re-arms).
//!
//! Lock events raised along the way are collected in order and handed out by
//! [`Scheduler::drain_locks`].

use std::collections::VecDeque;

use log::debug;

use neon_tetris_core::{gravity_interval_ms, GameSession, LockEvent, PieceSource};
use neon_tetris_types::{Command, START_LEVEL};

pub use neon_tetris_core as core;
pub use neon_tetris_types as types;

/// Unit of work delivered to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Gravity,
    Command(Command),
}

/// What one [`Scheduler::advance`] call did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Advance {
    /// Queued events drained.
    pub events: u32,
    /// Gravity steps fired by elapsed time.
    pub gravity_ticks: u32,
    /// Pieces locked.
    pub locks: u32,
    /// Whether any applied event changed session state.
    pub changed: bool,
}

#[derive(Debug, Clone)]
pub struct Scheduler {
    queue: VecDeque<Event>,
    locks: Vec<LockEvent>,
    acc_ms: u32,
    interval_ms: u32,
    level: u32,
    episode_id: u32,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::with_capacity(16),
            locks: Vec::with_capacity(4),
            acc_ms: 0,
            interval_ms: gravity_interval_ms(START_LEVEL),
            level: START_LEVEL,
            episode_id: 0,
        }
    }

    /// Armed gravity interval (in milliseconds).
    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Time accumulated toward the next gravity step.
    pub fn pending_ms(&self) -> u32 {
        self.acc_ms
    }

    pub fn queued(&self) -> usize {
        self.queue.len()
    }

    pub fn push(&mut self, command: Command) {
        self.queue.push_back(Event::Command(command));
    }

    pub fn push_event(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    /// Lock events collected since the last drain, oldest first.
    pub fn drain_locks(&mut self) -> impl Iterator<Item = LockEvent> + '_ {
        self.locks.drain(..)
    }

    /// Apply exactly one gravity step, independent of elapsed time.
    pub fn tick<S: PieceSource>(&mut self, session: &mut GameSession<S>) -> bool {
        let changed = session.step_gravity();
        self.collect(session);
        self.sync(session);
        changed
    }

    /// Drain queued events, then run gravity for `elapsed_ms`.
    pub fn advance<S: PieceSource>(
        &mut self,
        session: &mut GameSession<S>,
        elapsed_ms: u32,
    ) -> Advance {
        let mut out = Advance::default();

        let locks_before = self.locks.len();
        while let Some(event) = self.queue.pop_front() {
            out.events += 1;
            out.changed |= self.dispatch(session, event);
        }

        if session.paused() || session.game_over() {
            self.acc_ms = 0;
            out.locks = (self.locks.len() - locks_before) as u32;
            return out;
        }

        self.acc_ms = self.acc_ms.saturating_add(elapsed_ms);
        while self.acc_ms >= self.interval_ms {
            self.acc_ms -= self.interval_ms;
            out.gravity_ticks += 1;
            out.changed |= session.step_gravity();
            self.collect(session);

            if self.sync(session) || session.game_over() {
                self.acc_ms = 0;
                break;
            }
        }

        out.locks = (self.locks.len() - locks_before) as u32;
        out
    }

    fn dispatch<S: PieceSource>(&mut self, session: &mut GameSession<S>, event: Event) -> bool {
        let changed = match event {
            Event::Gravity => session.step_gravity(),
            Event::Command(command) => session.apply(command),
        };
        self.collect(session);
        self.sync(session);
        changed
    }

    fn collect<S: PieceSource>(&mut self, session: &mut GameSession<S>) {
        if let Some(event) = session.take_last_event() {
            self.locks.push(event);
        }
    }

    /// Re-arm the timer after a level change or reset. Returns true if it did.
    fn sync<S: PieceSource>(&mut self, session: &GameSession<S>) -> bool {
        let level = session.level();
        let episode_id = session.episode_id();
        if level == self.level && episode_id == self.episode_id {
            return false;
        }

        self.level = level;
        self.episode_id = episode_id;
        self.interval_ms = session.gravity_interval_ms();
        self.acc_ms = 0;
        debug!(
            "gravity re-armed: level {} -> {} ms",
            level, self.interval_ms
        );
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use neon_tetris_core::SequenceSource;
    use neon_tetris_types::PieceKind;

    fn session() -> GameSession<SequenceSource> {
        GameSession::new(SequenceSource::repeat(PieceKind::T))
    }

    #[test]
    fn fires_one_tick_per_interval() {
        let mut game = session();
        let mut sched = Scheduler::new();

        assert_eq!(sched.advance(&mut game, 999).gravity_ticks, 0);
        assert_eq!(game.active().unwrap().y, 0);

        assert_eq!(sched.advance(&mut game, 1).gravity_ticks, 1);
        assert_eq!(game.active().unwrap().y, 1);

        assert_eq!(sched.advance(&mut game, 2500).gravity_ticks, 2);
        assert_eq!(game.active().unwrap().y, 3);
        assert_eq!(sched.pending_ms(), 500);
    }

    #[test]
    fn queued_commands_apply_in_order_before_gravity() {
        let mut game = session();
        let mut sched = Scheduler::new();
        let x0 = game.active().unwrap().x;

        sched.push(Command::MoveLeft);
        sched.push(Command::MoveLeft);
        sched.push(Command::MoveRight);
        let adv = sched.advance(&mut game, 0);

        assert_eq!(adv.events, 3);
        assert_eq!(adv.gravity_ticks, 0);
        assert!(adv.changed);
        assert_eq!(game.active().unwrap().x, x0 - 1);
        assert_eq!(sched.queued(), 0);
    }

    #[test]
    fn pause_discards_elapsed_time() {
        let mut game = session();
        let mut sched = Scheduler::new();

        sched.advance(&mut game, 600);
        sched.push(Command::TogglePause);
        let adv = sched.advance(&mut game, 5000);
        assert_eq!(adv.gravity_ticks, 0);
        assert_eq!(sched.pending_ms(), 0);
        assert_eq!(game.active().unwrap().y, 0);

        sched.push(Command::TogglePause);
        assert_eq!(sched.advance(&mut game, 999).gravity_ticks, 0);
        assert_eq!(sched.advance(&mut game, 1).gravity_ticks, 1);
    }

    #[test]
    fn reset_rearms_timer() {
        let mut game = session();
        let mut sched = Scheduler::new();

        sched.advance(&mut game, 900);
        sched.push(Command::Reset);
        let adv = sched.advance(&mut game, 0);
        assert_eq!(adv.events, 1);
        assert_eq!(sched.pending_ms(), 0);
        assert_eq!(sched.interval_ms(), 1000);
    }

    #[test]
    fn explicit_tick_moves_one_row() {
        let mut game = session();
        let mut sched = Scheduler::new();
        assert!(sched.tick(&mut game));
        assert_eq!(game.active().unwrap().y, 1);
        assert_eq!(sched.pending_ms(), 0);
    }

    #[test]
    fn gravity_event_in_queue_is_one_step() {
        let mut game = session();
        let mut sched = Scheduler::new();
        sched.push_event(Event::Gravity);
        sched.push_event(Event::Gravity);
        let adv = sched.advance(&mut game, 0);
        assert_eq!(adv.events, 2);
        assert_eq!(game.active().unwrap().y, 2);
    }

    #[test]
    fn locks_are_collected_in_order() {
        let mut game = GameSession::new(SequenceSource::new(vec![PieceKind::O, PieceKind::I]));
        let mut sched = Scheduler::new();
        sched.push(Command::HardDrop);
        sched.push(Command::HardDrop);
        let adv = sched.advance(&mut game, 0);
        assert_eq!(adv.locks, 2);

        let kinds: Vec<_> = sched.drain_locks().map(|ev| ev.kind).collect();
        assert_eq!(kinds, vec![PieceKind::O, PieceKind::I]);
        assert_eq!(sched.drain_locks().count(), 0);
    }
}
