//! Benchmarks for play resolution and hand refills.
//!
//! ```sh
//! cargo bench --bench play
//! ```

use std::hint;

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use rand::prelude::*;
use wraptile_core::{GameConfig, PlayEngine, ToPoint, iter_coords, random_hand_tile};

const SEEDS: [u64; 3] = [0, 0x5eed, 0xdead_beef];

/// First legal `(hand, board)` play, if any.
fn first_play(engine: &PlayEngine) -> Option<((u8, u8), (i32, i32))> {
    engine.hand().cells().find_map(|(coords, cell)| {
        let tile = cell.tile().filter(|_| cell.is_playable())?;
        iter_coords(engine.board().size())
            .map(ToPoint::to_point)
            .find(|&point| tile.can_play(engine.board(), point))
            .map(|point| (coords, point))
    })
}

fn bench_play(c: &mut Criterion) {
    for board_size in [4, 8, 16] {
        let config = GameConfig::new(board_size, (4, 2), 10, 1);
        for (i, seed) in SEEDS.into_iter().enumerate() {
            let Some((hand, point)) = first_play(&PlayEngine::new(config, seed)) else {
                continue;
            };
            c.bench_with_input(
                BenchmarkId::new(format!("play_{board_size}"), format!("seed_{i}")),
                &seed,
                |b, &seed| {
                    b.iter_batched(
                        || PlayEngine::new(config, seed),
                        |mut engine| engine.play_from_hand(hand, hint::black_box(point), 0),
                        BatchSize::SmallInput,
                    );
                },
            );
        }
    }
}

fn bench_refill(c: &mut Criterion) {
    for level in [1, 50, 500] {
        let mut rng = StdRng::seed_from_u64(u64::from(level));
        c.bench_function(&format!("refill_level_{level}"), |b| {
            b.iter(|| random_hand_tile(&mut rng, hint::black_box(level)));
        });
    }
}

criterion_group!(benches, bench_play, bench_refill);
criterion_main!(benches);
