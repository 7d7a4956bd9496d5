use auto_2048::agent::HeuristicAgent;
use auto_2048::engine::{Board, Move};
use auto_2048::game::{Game, HighScore};
use auto_2048::spawn::{RandomSpawner, TileSpawner};
use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use std::hint::black_box;

fn corpus() -> Vec<Board> {
    let mut spawner = RandomSpawner::seeded(1337);
    let mut boards = Vec::new();
    let mut b = Board::EMPTY;
    for _ in 0..2 {
        b = spawner.spawn(b).unwrap_or(b);
    }
    boards.push(b);
    let seq = [Move::Left, Move::Up, Move::Right, Move::Down];
    for i in 0..24 {
        let res = b.apply(seq[i % seq.len()]);
        if res.changed {
            b = spawner.spawn(res.board).unwrap_or(res.board);
        }
        boards.push(b);
    }
    boards
}

fn bench_select_move(c: &mut Criterion) {
    let boards = corpus();
    let mut agent = HeuristicAgent::new();
    c.bench_function("agent/select_move", |bch| {
        bch.iter(|| {
            let mut legal = 0usize;
            for &bd in &boards {
                if agent.select_move(bd).is_ok() {
                    legal += 1;
                }
            }
            black_box(legal)
        })
    });
}

fn bench_full_game(c: &mut Criterion) {
    let mut group = c.benchmark_group("game");
    group.sample_size(10);
    group.bench_function("play_to_end", |bch| {
        bch.iter_batched(
            || (Game::new(RandomSpawner::seeded(9)), HeuristicAgent::new()),
            |(mut game, mut agent)| black_box(game.play(&mut agent, &mut HighScore::default(), None)),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(agent, bench_select_move, bench_full_game);
criterion_main!(agent);
