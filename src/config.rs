//! Host configuration: environment variables first, command-line flags on top.
//!
//! | Env var                  | Flag             | Default |
//! |--------------------------|------------------|---------|
//! | `NEON_TETRIS_SEED`       | `--seed N`       | random  |
//! | `NEON_TETRIS_FRAME_MS`   | `--frame-ms N`   | 16      |
//! | `NEON_TETRIS_LOG_PATH`   | `--log PATH`     | none    |
//! | `NEON_TETRIS_LOG_LEVEL`  | `--log-level L`  | debug   |
//!
//! Unparseable environment values fall back to the default; bad flags are
//! errors.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use log::LevelFilter;

use crate::engine::Event;
use crate::types::{Command, FRAME_MS};

pub const ENV_SEED: &str = "NEON_TETRIS_SEED";
pub const ENV_FRAME_MS: &str = "NEON_TETRIS_FRAME_MS";
pub const ENV_LOG_PATH: &str = "NEON_TETRIS_LOG_PATH";
pub const ENV_LOG_LEVEL: &str = "NEON_TETRIS_LOG_LEVEL";

/// What the binary does.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Mode {
    /// Interactive terminal game.
    #[default]
    Play,
    /// Apply a scripted event list headlessly and print the final snapshot.
    Replay(Vec<Event>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Seed for the piece generator; `None` picks one at startup.
    pub seed: Option<u32>,
    /// Host loop frame period (in milliseconds).
    pub frame_ms: u32,
    /// JSONL event log destination.
    pub log_path: Option<PathBuf>,
    pub log_level: LevelFilter,
    pub mode: Mode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: None,
            frame_ms: FRAME_MS,
            log_path: None,
            log_level: LevelFilter::Debug,
            mode: Mode::Play,
        }
    }
}

impl Config {
    /// Environment plus process arguments.
    pub fn load() -> Result<Self> {
        let args: Vec<String> = std::env::args().skip(1).collect();
        let mut config = Self::from_env();
        config.apply_args(&args)?;
        Ok(config)
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create from an arbitrary key lookup (the environment, or a map in tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let seed = lookup(ENV_SEED).and_then(|s| s.trim().parse().ok());

        let frame_ms = lookup(ENV_FRAME_MS)
            .and_then(|s| s.trim().parse().ok())
            .filter(|&ms: &u32| ms > 0)
            .unwrap_or(defaults.frame_ms);

        let log_path = lookup(ENV_LOG_PATH)
            .map(|s| s.trim().to_string())
            .and_then(|s| if s.is_empty() { None } else { Some(s) })
            .map(PathBuf::from);

        let log_level = lookup(ENV_LOG_LEVEL)
            .and_then(|s| LevelFilter::from_str(s.trim()).ok())
            .unwrap_or(defaults.log_level);

        Self {
            seed,
            frame_ms,
            log_path,
            log_level,
            mode: Mode::Play,
        }
    }

    /// Override fields from command-line arguments (program name excluded).
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut i = 0usize;
        while i < args.len() {
            match args[i].as_str() {
                "--seed" => {
                    let v = flag_value(args, i, "--seed")?;
                    self.seed = Some(
                        v.parse::<u32>()
                            .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                    );
                    i += 1;
                }
                "--frame-ms" => {
                    let v = flag_value(args, i, "--frame-ms")?;
                    let ms = v
                        .parse::<u32>()
                        .map_err(|_| anyhow!("invalid --frame-ms value: {}", v))?;
                    if ms == 0 {
                        return Err(anyhow!("--frame-ms must be positive"));
                    }
                    self.frame_ms = ms;
                    i += 1;
                }
                "--log" => {
                    let v = flag_value(args, i, "--log")?;
                    self.log_path = Some(PathBuf::from(v));
                    i += 1;
                }
                "--log-level" => {
                    let v = flag_value(args, i, "--log-level")?;
                    self.log_level = LevelFilter::from_str(v)
                        .map_err(|_| anyhow!("invalid --log-level value: {}", v))?;
                    i += 1;
                }
                "replay" => {
                    let script = flag_value(args, i, "replay")?;
                    self.mode = Mode::Replay(parse_script(script)?);
                    i += 1;
                }
                other => {
                    return Err(anyhow!("unknown argument: {}", other));
                }
            }
            i += 1;
        }
        Ok(())
    }
}

fn flag_value<'a>(args: &'a [String], i: usize, name: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .ok_or_else(|| anyhow!("missing value for {}", name))
}

/// Parse a comma separated replay script: command names or `tick`.
///
/// ```
/// use neon_tetris::config::parse_script;
/// use neon_tetris::engine::Event;
/// use neon_tetris::types::Command;
///
/// let steps = parse_script("moveLeft, tick,hardDrop").unwrap();
/// assert_eq!(
///     steps,
///     vec![
///         Event::Command(Command::MoveLeft),
///         Event::Gravity,
///         Event::Command(Command::HardDrop),
///     ]
/// );
/// ```
pub fn parse_script(script: &str) -> Result<Vec<Event>> {
    script
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            if s.eq_ignore_ascii_case("tick") {
                Ok(Event::Gravity)
            } else {
                Command::from_str(s)
                    .map(Event::Command)
                    .ok_or_else(|| anyhow!("replay: unknown command: {}", s))
            }
        })
        .collect()
}
