//! JSONL event log.
//!
//! Records go through a channel to a writer thread that serializes each one
//! with `serde_json` and appends it as a single line. The game loop never
//! touches the file. Two kinds of record share the stream:
//!
//! - `{"type":"log",...}`: anything emitted through the `log` facade, once the
//!   log is installed as the global logger;
//! - `{"type":"lock",...}`: one per locked piece, with the score afterwards.

use std::fs::OpenOptions;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread::{self, JoinHandle};

use anyhow::{anyhow, Result};
use log::{LevelFilter, Metadata};
use serde::Serialize;

use crate::core::{GameSession, LockEvent, PieceSource};
use crate::types::PieceKind;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Record {
    Log {
        level: String,
        target: String,
        message: String,
    },
    #[serde(rename_all = "camelCase")]
    Lock {
        episode_id: u32,
        piece: PieceKind,
        lines_cleared: u32,
        points: u32,
        level_up: bool,
        game_over: bool,
        score: u32,
        level: u32,
        lines: u32,
    },
}

impl Record {
    /// Lock record with the session totals after the lock.
    pub fn lock<S: PieceSource>(event: &LockEvent, session: &GameSession<S>) -> Self {
        Record::Lock {
            episode_id: session.episode_id(),
            piece: event.kind,
            lines_cleared: event.lines_cleared,
            points: event.points,
            level_up: event.level_up,
            game_over: event.game_over,
            score: session.score(),
            level: session.level(),
            lines: session.lines(),
        }
    }
}

enum Message {
    Record(Record),
    Shutdown,
}

/// Owner of the writer thread. Dropping it flushes and joins.
pub struct EventLog {
    tx: Sender<Message>,
    writer: Option<JoinHandle<()>>,
}

/// Cloneable handle that only sends; also the `log::Log` implementation.
#[derive(Clone)]
pub struct EventSink {
    tx: Sender<Message>,
    level: LevelFilter,
}

impl EventLog {
    /// Append to `path`, creating it if needed.
    pub fn open(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| anyhow!("event log: cannot open {}: {}", path.display(), e))?;
        Self::to_writer(BufWriter::new(file))
    }

    /// Log into any writer (tests use an in-memory buffer).
    pub fn to_writer<W: Write + Send + 'static>(out: W) -> Result<Self> {
        let (tx, rx) = mpsc::channel::<Message>();
        let writer = thread::Builder::new()
            .name("event-log".to_string())
            .spawn(move || write_loop(out, rx))
            .map_err(|e| anyhow!("event log: cannot start writer: {}", e))?;
        Ok(Self {
            tx,
            writer: Some(writer),
        })
    }

    /// Sink accepting records up to `level`.
    pub fn sink(&self, level: LevelFilter) -> EventSink {
        EventSink {
            tx: self.tx.clone(),
            level,
        }
    }

    /// Route the `log` facade into this file.
    ///
    /// Can succeed once per process; later calls return an error.
    pub fn install(&self, level: LevelFilter) -> Result<()> {
        log::set_boxed_logger(Box::new(self.sink(level)))
            .map_err(|e| anyhow!("event log: {}", e))?;
        log::set_max_level(level);
        Ok(())
    }

    pub fn record(&self, record: Record) {
        // A dead writer (disk error) silently drops records.
        let _ = self.tx.send(Message::Record(record));
    }

    pub fn record_lock<S: PieceSource>(&self, event: &LockEvent, session: &GameSession<S>) {
        self.record(Record::lock(event, session));
    }

    /// Flush pending records and stop the writer.
    pub fn finish(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(writer) = self.writer.take() {
            let _ = self.tx.send(Message::Shutdown);
            let _ = writer.join();
        }
    }
}

impl Drop for EventLog {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl log::Log for EventSink {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let _ = self.tx.send(Message::Record(Record::Log {
            level: record.level().to_string(),
            target: record.target().to_string(),
            message: record.args().to_string(),
        }));
    }

    fn flush(&self) {}
}

fn write_loop<W: Write>(mut out: W, rx: Receiver<Message>) {
    let mut buf: Vec<u8> = Vec::with_capacity(512);

    while let Ok(msg) = rx.recv() {
        let record = match msg {
            Message::Record(record) => record,
            Message::Shutdown => break,
        };

        buf.clear();
        if serde_json::to_writer(&mut buf, &record).is_err() {
            continue;
        }
        buf.push(b'\n');
        if out.write_all(&buf).is_err() {
            break;
        }
    }

    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SequenceSource;
    use crate::types::Command;
    use log::{Level, Log};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(data);
            Ok(data.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuf {
        fn lines(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(|l| serde_json::from_str(l).unwrap())
                .collect()
        }
    }

    #[test]
    fn lock_records_are_json_lines() {
        let buf = SharedBuf::default();
        let log = EventLog::to_writer(buf.clone()).unwrap();

        let mut game = GameSession::new(SequenceSource::repeat(PieceKind::O));
        game.apply(Command::HardDrop);
        let event = game.take_last_event().unwrap();
        log.record_lock(&event, &game);
        log.finish();

        let lines = buf.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["type"], "lock");
        assert_eq!(lines[0]["linesCleared"], 0);
        assert_eq!(lines[0]["gameOver"], false);
        assert_eq!(lines[0]["score"], 0);
    }

    #[test]
    fn sink_forwards_log_records() {
        let buf = SharedBuf::default();
        let log = EventLog::to_writer(buf.clone()).unwrap();
        let sink = log.sink(LevelFilter::Info);

        sink.log(
            &log::Record::builder()
                .args(format_args!("filtered"))
                .level(Level::Debug)
                .build(),
        );
        sink.log(
            &log::Record::builder()
                .args(format_args!("level up: {}", 2))
                .level(Level::Error)
                .target("neon_tetris_core::session")
                .build(),
        );
        drop(log);

        let lines = buf.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0]["type"], "log");
        assert_eq!(lines[0]["level"], "ERROR");
        assert_eq!(lines[0]["message"], "level up: 2");
    }

    #[test]
    fn records_after_finish_are_dropped() {
        let buf = SharedBuf::default();
        let log = EventLog::to_writer(buf.clone()).unwrap();
        let sink = log.sink(LevelFilter::Trace);
        log.finish();

        sink.log(
            &log::Record::builder()
                .args(format_args!("late"))
                .level(Level::Error)
                .build(),
        );
        assert!(buf.lines().is_empty());
    }
}
