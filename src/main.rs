//! Neon Tetris runner (default binary).
//!
//! `neon-tetris` plays in the terminal; `neon-tetris replay <script>` runs a
//! comma separated command script headlessly and prints the final snapshot as
//! JSON. See [`neon_tetris::config`] for flags and environment variables.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event as TermEvent};
use log::info;

use neon_tetris::config::{Config, Mode};
use neon_tetris::core::{GameSession, GameSnapshot, SimpleRng};
use neon_tetris::engine::{Event, Scheduler};
use neon_tetris::event_log::EventLog;
use neon_tetris::input::{command_for_key, is_press, should_quit};
use neon_tetris::replay;
use neon_tetris::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};

fn main() -> Result<()> {
    let config = Config::load()?;

    let event_log = match &config.log_path {
        Some(path) => {
            let log = EventLog::open(path)?;
            log.install(config.log_level)?;
            Some(log)
        }
        None => None,
    };

    let seed = config.seed.unwrap_or_else(rand::random);
    info!("starting with seed {}", seed);

    let result = match &config.mode {
        Mode::Play => play(&config, seed, event_log.as_ref()),
        Mode::Replay(steps) => run_replay(steps, seed, event_log.as_ref()),
    };

    if let Some(log) = event_log {
        log.finish();
    }
    result
}

fn run_replay(steps: &[Event], seed: u32, log: Option<&EventLog>) -> Result<()> {
    let mut session = GameSession::new(SimpleRng::new(seed));
    let snapshot = replay::run(&mut session, steps, log);
    println!("{}", serde_json::to_string_pretty(&snapshot)?);
    Ok(())
}

fn play(config: &Config, seed: u32, log: Option<&EventLog>) -> Result<()> {
    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, config, seed, log);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn run(
    term: &mut TerminalRenderer,
    config: &Config,
    seed: u32,
    log: Option<&EventLog>,
) -> Result<()> {
    let mut session = GameSession::new(SimpleRng::new(seed));
    let mut scheduler = Scheduler::new();

    let view = GameView::default();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();

    let frame = Duration::from_millis(config.frame_ms as u64);
    let mut last_advance = Instant::now();

    loop {
        // Render.
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        session.snapshot_into(&mut snap);
        view.render_into(&snap, Viewport::new(w, h), &mut fb);
        term.draw_swap(&mut fb)?;

        // Input with timeout until the next frame.
        let timeout = frame.saturating_sub(last_advance.elapsed());
        if event::poll(timeout)? {
            match event::read()? {
                TermEvent::Key(key) if is_press(&key) => {
                    if should_quit(key) {
                        info!("quit (score {})", session.score());
                        return Ok(());
                    }
                    if let Some(command) = command_for_key(key) {
                        scheduler.push(command);
                    }
                }
                TermEvent::Resize(_, _) => term.invalidate(),
                _ => {}
            }
        }

        // Advance by whole milliseconds; the remainder carries to next frame.
        let elapsed_ms = last_advance.elapsed().as_millis().min(u32::MAX as u128) as u32;
        last_advance += Duration::from_millis(elapsed_ms as u64);
        scheduler.advance(&mut session, elapsed_ms);

        for lock in scheduler.drain_locks() {
            if let Some(log) = log {
                log.record_lock(&lock, &session);
            }
        }
    }
}
