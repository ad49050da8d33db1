use criterion::{black_box, criterion_group, criterion_main, Criterion};
use neon_tetris::core::{Board, GameSession, GameSnapshot, SimpleRng};
use neon_tetris::engine::Scheduler;
use neon_tetris::types::{Command, PieceKind, FRAME_MS};

fn bench_frame(c: &mut Criterion) {
    let mut game = GameSession::new(SimpleRng::new(12345));
    let mut sched = Scheduler::new();

    c.bench_function("scheduler_frame_16ms", |b| {
        b.iter(|| {
            sched.advance(&mut game, black_box(FRAME_MS));
            if game.game_over() {
                game.reset();
            }
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    c.bench_function("clear_4_lines", |b| {
        b.iter(|| {
            let mut board = Board::new();
            // Fill bottom 4 rows
            for y in 16..20 {
                for x in 0..10 {
                    board.set(x, y, Some(PieceKind::I));
                }
            }
            board.clear_full_rows();
        })
    });
}

fn bench_hard_drop(c: &mut Criterion) {
    let mut game = GameSession::new(SimpleRng::new(12345));

    c.bench_function("hard_drop", |b| {
        b.iter(|| {
            game.apply(black_box(Command::HardDrop));
            if game.game_over() {
                game.reset();
            }
        })
    });
}

fn bench_try_move(c: &mut Criterion) {
    let mut game = GameSession::new(SimpleRng::new(12345));
    let mut dir = 1;

    c.bench_function("try_move", |b| {
        b.iter(|| {
            if !game.try_move(dir, 0) {
                dir = -dir;
            }
        })
    });
}

fn bench_try_rotate(c: &mut Criterion) {
    let mut game = GameSession::new(SimpleRng::new(12345));

    c.bench_function("try_rotate", |b| {
        b.iter(|| {
            game.try_rotate();
        })
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let game = GameSession::new(SimpleRng::new(12345));
    let mut snap = GameSnapshot::default();

    c.bench_function("snapshot_into", |b| {
        b.iter(|| {
            game.snapshot_into(black_box(&mut snap));
        })
    });
}

criterion_group!(
    benches,
    bench_frame,
    bench_line_clear,
    bench_hard_drop,
    bench_try_move,
    bench_try_rotate,
    bench_snapshot
);
criterion_main!(benches);
