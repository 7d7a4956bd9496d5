use auto_2048::engine::{self, Board, Move};
use auto_2048::spawn::{RandomSpawner, TileSpawner};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    let mut spawner = RandomSpawner::seeded(42);
    let mut boards = Vec::new();
    // Empty and two-tile starts
    boards.push(Board::EMPTY);
    let mut b = Board::EMPTY;
    for _ in 0..2 {
        b = spawner.spawn(b).unwrap_or(b);
    }
    boards.push(b);
    // Derive a variety of densities deterministically
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..20 {
        let res = b.apply(seq[i % seq.len()]);
        if res.changed {
            b = spawner.spawn(res.board).unwrap_or(res.board);
        }
        boards.push(b);
    }
    boards
}

fn bench_apply(c: &mut Criterion) {
    engine::warm();
    let boards = corpus();
    for dir in Move::ALL {
        c.bench_function(&format!("apply/{dir}"), |bch| {
            bch.iter(|| {
                let mut acc = 0u64;
                for &bd in &boards {
                    acc ^= bd.apply(dir).board.raw();
                }
                black_box(acc)
            })
        });
    }
}

fn bench_spawn(c: &mut Criterion) {
    c.bench_function("spawn/fill_board", |bch| {
        bch.iter_batched(
            || RandomSpawner::seeded(7),
            |mut spawner| {
                let mut bd = Board::EMPTY;
                while let Some(next) = spawner.spawn(bd) {
                    bd = next;
                }
                black_box(bd)
            },
            BatchSize::SmallInput,
        )
    });
}

fn bench_queries(c: &mut Criterion) {
    let boards = corpus();
    c.bench_function("query/count_occupied", |bch| {
        bch.iter(|| boards.iter().fold(0u32, |acc, bd| acc ^ bd.count_occupied()))
    });
    c.bench_function("query/is_game_over", |bch| {
        bch.iter(|| boards.iter().filter(|bd| bd.is_game_over()).count())
    });
}

criterion_group!(engine_ops, bench_apply, bench_spawn, bench_queries);
criterion_main!(engine_ops);
