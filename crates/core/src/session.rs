//! Game session module - the top-level state machine
//!
//! This module ties together the board, the piece controller, the piece
//! source and scoring. It handles spawn, movement, rotation, hold, locking,
//! line clears, level progression, pause, game over and reset.
//!
//! Conceptually a piece cycles `Spawning -> Active -> Locking -> LineClearing
//! -> Spawning`, with `GameOver` reachable from `Spawning`. Every command runs
//! that cycle synchronously, so between commands the session is always either
//! [`Phase::Active`] or [`Phase::GameOver`]. Pause is an orthogonal flag.
//!
//! Rejected commands are silent: they return `false` and leave state alone.

use log::{debug, info};
use serde::Serialize;

use crate::board::Board;
use crate::piece::ActivePiece;
use crate::rng::{PieceSource, SimpleRng};
use crate::scoring::{gravity_interval_ms, level_after, line_clear_points};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::{Command, PieceKind, START_LEVEL};

/// Observable session phase between events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Phase {
    Active,
    GameOver,
}

/// Record of the most recent lock (consumed by observers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LockEvent {
    pub kind: PieceKind,
    pub lines_cleared: u32,
    pub points: u32,
    pub level_up: bool,
    /// Whether the follow-up spawn ended the game.
    pub game_over: bool,
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameSession<S: PieceSource = SimpleRng> {
    board: Board,
    active: Option<ActivePiece>,
    next: PieceKind,
    held: Option<PieceKind>,
    can_hold: bool,
    source: S,
    /// Monotonic episode id (increments on reset).
    episode_id: u32,
    /// Last lock event (consumed by observers).
    last_event: Option<LockEvent>,
    score: u32,
    level: u32,
    lines: u32,
    paused: bool,
    game_over: bool,
}

impl GameSession<SimpleRng> {
    /// Session driven by a seeded uniform source.
    pub fn seeded(seed: u32) -> Self {
        Self::new(SimpleRng::new(seed))
    }
}

impl<S: PieceSource> GameSession<S> {
    /// Create a session on an empty board and spawn the first piece
    pub fn new(source: S) -> Self {
        Self::with_board(Board::new(), source)
    }

    /// Create a session on a prepared board and spawn the first piece.
    ///
    /// If the first spawn collides the session starts in [`Phase::GameOver`].
    pub fn with_board(board: Board, mut source: S) -> Self {
        let next = source.next_kind();
        let mut session = Self {
            board,
            active: None,
            next,
            held: None,
            can_hold: true,
            source,
            episode_id: 0,
            last_event: None,
            score: 0,
            level: START_LEVEL,
            lines: 0,
            paused: false,
            game_over: false,
        };
        session.spawn(None);
        session
    }

    pub fn phase(&self) -> Phase {
        if self.game_over {
            Phase::GameOver
        } else {
            Phase::Active
        }
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn held(&self) -> Option<PieceKind> {
        self.held
    }

    pub fn next(&self) -> PieceKind {
        self.next
    }

    pub fn active(&self) -> Option<ActivePiece> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Current gravity interval, a pure function of level
    pub fn gravity_interval_ms(&self) -> u32 {
        gravity_interval_ms(self.level)
    }

    /// Landing row of the active piece, recomputed from the current board.
    pub fn ghost_y(&self) -> Option<i8> {
        self.active.map(|piece| piece.ghost_y(&self.board))
    }

    /// Take and clear the last lock event.
    pub fn take_last_event(&mut self) -> Option<LockEvent> {
        self.last_event.take()
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);

        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.hold = self.held;
        out.can_hold = self.can_hold;
        out.next = self.next;
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.episode_id = self.episode_id;
        out.score = self.score;
        out.level = self.level;
        out.lines = self.lines;
        out.gravity_ms = self.gravity_interval_ms();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Movement and rotation are only honored while a piece is live and the
    /// session is neither paused nor over.
    fn accepts_input(&self) -> bool {
        self.active.is_some() && !self.paused && !self.game_over
    }

    /// Spawn a piece: the override kind if given (hold swap), otherwise the
    /// queued next kind, after which a new next kind is drawn.
    ///
    /// Returns false and ends the game when the spawn position collides.
    pub fn spawn(&mut self, kind_override: Option<PieceKind>) -> bool {
        if self.game_over {
            return false;
        }

        let kind = match kind_override {
            Some(kind) => kind,
            None => {
                let kind = self.next;
                self.next = self.source.next_kind();
                kind
            }
        };

        let piece = ActivePiece::spawn(kind);
        if piece.collides(&self.board) {
            self.active = None;
            self.game_over = true;
            info!(
                "game over: {} blocked at spawn (score {}, lines {}, level {})",
                kind.as_str(),
                self.score,
                self.lines,
                self.level
            );
            return false;
        }

        debug!("spawn {} at ({}, {})", kind.as_str(), piece.x, piece.y);
        self.active = Some(piece);
        self.can_hold = true;
        true
    }

    /// Try to move the active piece.
    ///
    /// A rejected pure downward step (`dx == 0, dy == 1`) locks the piece.
    /// Returns whether the piece moved.
    pub fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        if let Some(moved) = active.shifted(dx, dy, &self.board) {
            self.active = Some(moved);
            return true;
        }

        if dx == 0 && dy == 1 {
            self.lock();
        }
        false
    }

    /// Try to rotate the active piece 90° clockwise (no wall kicks)
    pub fn try_rotate(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        match active.rotated(&self.board) {
            Some(rotated) => {
                self.active = Some(rotated);
                true
            }
            None => false,
        }
    }

    /// One step down: moves the piece, or locks it when blocked.
    ///
    /// Used by both soft drop and gravity. Returns false only when ignored.
    pub fn soft_drop(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.try_move(0, 1);
        true
    }

    /// A gravity tick. Same effect as a soft drop.
    pub fn step_gravity(&mut self) -> bool {
        self.soft_drop()
    }

    /// Drop the active piece to its ghost row and lock it immediately
    pub fn hard_drop(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let dropped = active.dropped(&self.board);
        debug!(
            "hard drop {} from y={} to y={}",
            active.kind.as_str(),
            active.y,
            dropped.y
        );
        self.active = Some(dropped);
        self.lock();
        true
    }

    /// Swap the active piece with the held piece (or the queue when nothing
    /// is held yet). Allowed once per successful spawn.
    pub fn hold(&mut self) -> bool {
        if !self.can_hold || !self.accepts_input() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let current = active.kind;
        let swapped_in = self.held;
        self.spawn(swapped_in);
        self.held = Some(current);
        self.can_hold = false;

        debug!(
            "hold {} (swapped in {})",
            current.as_str(),
            swapped_in.map_or("queue", |k| k.as_str())
        );
        true
    }

    /// Toggle pause. Ignored once the game is over.
    pub fn toggle_pause(&mut self) -> bool {
        if self.game_over {
            return false;
        }
        self.paused = !self.paused;
        debug!("paused = {}", self.paused);
        true
    }

    /// Reinitialize everything and spawn a fresh piece
    pub fn reset(&mut self) -> bool {
        self.board.clear();
        self.active = None;
        self.held = None;
        self.can_hold = true;
        self.last_event = None;
        self.score = 0;
        self.level = START_LEVEL;
        self.lines = 0;
        self.paused = false;
        self.game_over = false;
        self.episode_id = self.episode_id.wrapping_add(1);
        self.next = self.source.next_kind();

        info!("reset (episode {})", self.episode_id);
        self.spawn(None);
        true
    }

    /// Commit the active piece into the board, clear lines, respawn
    fn lock(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.board
            .lock_shape(&active.shape, active.x, active.y, active.kind);
        debug!("lock {} at ({}, {})", active.kind.as_str(), active.x, active.y);

        let (lines_cleared, points, level_up) = self.clear_lines();
        let spawned = self.spawn(None);

        self.last_event = Some(LockEvent {
            kind: active.kind,
            lines_cleared,
            points,
            level_up,
            game_over: !spawned,
        });
    }

    /// Remove full rows and apply scoring. Returns (rows, points, level up).
    fn clear_lines(&mut self) -> (u32, u32, bool) {
        let cleared = self.board.clear_full_rows().len();
        if cleared == 0 {
            return (0, 0, false);
        }

        let points = line_clear_points(cleared, self.level);
        let before = self.lines;
        self.score = self.score.saturating_add(points);
        self.lines = self.lines.saturating_add(cleared as u32);

        let level = level_after(self.level, before, self.lines);
        let level_up = level != self.level;
        self.level = level;

        debug!(
            "cleared {} line(s) for {} points (score {}, lines {})",
            cleared, points, self.score, self.lines
        );
        if level_up {
            info!("level up: {}", self.level);
        }

        (cleared as u32, points, level_up)
    }

    /// Apply an abstract input command. Returns whether state changed.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.try_move(-1, 0),
            Command::MoveRight => self.try_move(1, 0),
            Command::SoftDrop => self.soft_drop(),
            Command::Rotate => self.try_rotate(),
            Command::HardDrop => self.hard_drop(),
            Command::Hold => self.hold(),
            Command::TogglePause => self.toggle_pause(),
            Command::Reset => self.reset(),
        }
    }
}

impl Default for GameSession<SimpleRng> {
    fn default() -> Self {
        Self::seeded(1)
    }
}
