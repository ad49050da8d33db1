//! Headless replay and configuration wiring

use neon_tetris::config::{parse_script, Config, Mode};
use neon_tetris::core::{GameSession, SequenceSource, SimpleRng};
use neon_tetris::event_log::EventLog;
use neon_tetris::replay;
use neon_tetris::types::PieceKind;

#[test]
fn test_replay_applies_script_in_order() {
    let steps = parse_script("moveLeft,moveLeft,tick,tick,hardDrop").unwrap();
    let mut game = GameSession::new(SequenceSource::new(vec![PieceKind::O, PieceKind::T]));

    let snap = replay::run(&mut game, &steps, None);

    // O dropped two columns left of spawn.
    assert_eq!(snap.board[19][2], Some(PieceKind::O));
    assert_eq!(snap.board[19][3], Some(PieceKind::O));
    assert_eq!(snap.active.unwrap().kind, PieceKind::T);
    assert_eq!(snap.next, PieceKind::O);
}

#[test]
fn test_replay_with_seed_is_reproducible() {
    let mut config = Config::default();
    config
        .apply_args(&[
            "replay".to_string(),
            "hardDrop,hardDrop,rotate,hold,hardDrop".to_string(),
            "--seed".to_string(),
            "77".to_string(),
        ])
        .unwrap();

    let Mode::Replay(steps) = &config.mode else {
        panic!("expected replay mode");
    };
    let seed = config.seed.unwrap();

    let a = replay::run(&mut GameSession::new(SimpleRng::new(seed)), steps, None);
    let b = replay::run(&mut GameSession::new(SimpleRng::new(seed)), steps, None);
    assert_eq!(a, b);
    assert_eq!(
        serde_json::to_string(&a).unwrap(),
        serde_json::to_string(&b).unwrap()
    );
}

#[test]
fn test_replay_writes_lock_records() {
    let dir = std::env::temp_dir().join(format!("neon-tetris-replay-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("events.jsonl");
    let _ = std::fs::remove_file(&path);

    let log = EventLog::open(&path).unwrap();
    let steps = parse_script("hardDrop, hardDrop, hardDrop").unwrap();
    let mut game = GameSession::new(SequenceSource::repeat(PieceKind::O));
    replay::run(&mut game, &steps, Some(&log));
    log.finish();

    let text = std::fs::read_to_string(&path).unwrap();
    let records: Vec<serde_json::Value> = text
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(records.len(), 3);
    assert!(records.iter().all(|r| r["type"] == "lock"));
    assert_eq!(records[2]["piece"], "O");

    let _ = std::fs::remove_dir_all(&dir);
}
